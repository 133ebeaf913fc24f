use super::*;
use crate::settings::{Settings, SettingsUpdate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn report(holdings: BucketValues, contribution: Decimal) -> AllocationReport {
    AllocationEngine::permanent_portfolio()
        .unwrap()
        .evaluate(&AllocationSnapshot::new(holdings, dec!(100000)), contribution)
}

#[test]
fn test_balanced_portfolio_advice() {
    let report = report(
        BucketValues::new(dec!(25000), dec!(15000), dec!(10000), dec!(25000), dec!(25000)),
        Decimal::ZERO,
    );
    let text = render_advice(&report, &Settings::default());

    assert!(text.starts_with("Allocation is balanced"));
    assert!(text.contains("- Cash (reverse repo): 25.00% (target 25.00%)"));
    assert!(text.contains("S&P 500 ETF 60.00%, cash-flow ETF 40.00%"));
    assert!(!text.contains("New contribution"));
}

#[test]
fn test_transfer_advice_lists_each_move() {
    let report = report(
        BucketValues::new(dec!(40000), dec!(15000), dec!(10000), dec!(25000), dec!(10000)),
        Decimal::ZERO,
    );
    let text = render_advice(&report, &Settings::default());

    assert!(text.contains("Major classes: rebalancing needed"));
    assert!(text.contains("- Cash (reverse repo): over by 15000.00 CNY (current 40.00%, target 25.00%)"));
    assert!(text.contains("- Commodity (gold ETF): under by 15000.00 CNY"));
    assert!(text.contains("- sell 15000.00 CNY of Cash (reverse repo), buy Commodity (gold ETF)"));
}

#[test]
fn test_stock_deviation_shows_etf_breakdown() {
    let report = report(
        BucketValues::new(dec!(50000), Decimal::ZERO, Decimal::ZERO, dec!(25000), dec!(25000)),
        Decimal::ZERO,
    );
    let text = render_advice(&report, &Settings::default());
    assert!(text.contains("add about 15000.00 CNY of the S&P 500 ETF and 10000.00 CNY of the cash-flow ETF"));
}

#[test]
fn test_unfilled_shortage_is_reported() {
    let report = report(
        BucketValues::new(dec!(35000), dec!(20400), dec!(13600), dec!(17000), dec!(14000)),
        Decimal::ZERO,
    );
    let text = render_advice(&report, &Settings::default());
    assert!(text.contains("Commodity (gold ETF) still short by 1000.00 CNY after transfers"));
}

#[test]
fn test_stock_internal_advice() {
    let report = report(
        BucketValues::new(dec!(25000), dec!(20000), dec!(5000), dec!(25000), dec!(25000)),
        Decimal::ZERO,
    );
    let text = render_advice(&report, &Settings::default());

    assert!(text.contains("Major classes are within their bands."));
    assert!(text.contains("Inside stock: rebalancing needed (stock total 25000.00 CNY)"));
    assert!(text.contains("- S&P 500 ETF: 80.00% of stock, target 60.00%, over-weighted"));
    assert!(text.contains("sell 5000.00 CNY against the cash-flow ETF"));
    assert!(text.contains("buy 5000.00 CNY against the S&P 500 ETF"));
}

#[test]
fn test_initial_allocation_advice() {
    let report = report(BucketValues::default(), Decimal::ZERO);
    let text = render_advice(&report, &Settings::default());

    assert!(text.starts_with("No holdings yet. Suggested initial allocation of 100000.00 CNY"));
    assert!(text.contains("- Stock (S&P 500 ETF): 15.00% (15000.00 CNY)"));
    assert!(text.contains("- Commodity (gold ETF): 25.00% (25000.00 CNY)"));
}

#[test]
fn test_contribution_advice_uses_settings() {
    let settings = Settings::default()
        .apply(&SettingsUpdate {
            currency_unit: Some("USD".to_string()),
            percent_scale: Some(4),
            money_scale: Some(0),
            ..Default::default()
        })
        .unwrap();
    let report = report(
        BucketValues::new(dec!(25000), dec!(15000), dec!(10000), dec!(25000), dec!(25000)),
        dec!(10000),
    );
    let text = render_advice(&report, &settings);

    assert!(text.contains("New contribution of 10000 USD:"));
    assert!(text.contains("- Bond (10-year treasury): 25.0000% (2500 USD)"));
    assert!(text.contains("  - S&P 500 ETF: 1500 USD"));
    assert!(text.contains("  - cash-flow ETF: 1000 USD"));
}

#[test]
fn test_zero_contribution_says_nothing_to_allocate() {
    let report = report(
        BucketValues::new(dec!(40000), dec!(15000), dec!(10000), dec!(25000), dec!(10000)),
        Decimal::ZERO,
    );
    assert_eq!(report.contribution, ContributionPlan::NothingToAllocate);

    let text = render_advice(&report, &Settings::default());
    assert!(text.ends_with("\nNo new contribution to allocate.\n"));
    assert!(!text.contains("New contribution of"));
}
