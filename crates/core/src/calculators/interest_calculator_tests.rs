use super::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn input(kind: RateKind, value: Decimal, compounding: Compounding) -> RateInput {
    RateInput {
        kind,
        value,
        compounding,
        cpi_percent: Decimal::ZERO,
    }
}

fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} within {} of {}",
        actual,
        tolerance,
        expected
    );
}

#[test]
fn test_annual_rate_with_annual_compounding() {
    let result = convert_rate(&input(RateKind::Annual, dec!(3.65), Compounding::Annual)).unwrap();
    assert_eq!(result.effective_annual, dec!(3.65));
    assert_eq!(result.monthly, dec!(0.3042));
    assert_eq!(result.daily, dec!(0.01));
    assert_eq!(result.seven_day_yield, dec!(3.65));
    assert_eq!(result.income_per_ten_thousand, dec!(1));
    assert_eq!(result.real_annual, dec!(3.65));
}

#[test]
fn test_nominal_rate_compounded_monthly() {
    let result = convert_rate(&input(RateKind::Annual, dec!(12), Compounding::Monthly)).unwrap();
    // (1 + 0.12 / 12)^12 - 1
    assert_eq!(result.effective_annual, dec!(12.6825));
    assert_close(result.monthly, dec!(1), dec!(0.0005));
}

#[test]
fn test_nominal_rate_compounded_quarterly() {
    let result = convert_rate(&input(RateKind::Annual, dec!(8), Compounding::Quarterly)).unwrap();
    // 1.02^4 - 1 = 0.08243216
    assert_eq!(result.effective_annual, dec!(8.2432));
}

#[test]
fn test_monthly_rate_input() {
    let result = convert_rate(&input(RateKind::Monthly, dec!(1), Compounding::Annual)).unwrap();
    assert_eq!(result.effective_annual, dec!(12.6825));
}

#[test]
fn test_daily_rate_input() {
    let result = convert_rate(&input(RateKind::Daily, dec!(0.01), Compounding::Daily)).unwrap();
    // 1.0001^365 - 1 ~ 3.7172%
    assert_close(result.effective_annual, dec!(3.7172), dec!(0.0001));
    assert_close(result.daily, dec!(0.01), dec!(0.000005));
}

#[test]
fn test_income_per_ten_thousand_input() {
    let result = convert_rate(&input(
        RateKind::IncomePerTenThousand,
        dec!(1),
        Compounding::Annual,
    ))
    .unwrap();
    assert_eq!(result.effective_annual, dec!(3.65));
    assert_eq!(result.income_per_ten_thousand, dec!(1));
}

#[test]
fn test_yields_are_taken_as_annual() {
    for kind in [RateKind::SevenDayYield, RateKind::ReverseRepoYield] {
        let result = convert_rate(&input(kind, dec!(2.5), Compounding::Annual)).unwrap();
        assert_eq!(result.effective_annual, dec!(2.5));
        assert_eq!(result.seven_day_yield, dec!(2.5));
    }
}

#[test]
fn test_real_rate_after_inflation() {
    let mut rate = input(RateKind::Annual, dec!(5), Compounding::Annual);
    rate.cpi_percent = dec!(2);
    let result = convert_rate(&rate).unwrap();
    // 1.05 / 1.02 - 1
    assert_eq!(result.real_annual, dec!(2.9412));
}

#[test]
fn test_total_inflation_is_rejected() {
    let mut rate = input(RateKind::Annual, dec!(5), Compounding::Annual);
    rate.cpi_percent = dec!(-100);
    assert!(convert_rate(&rate).is_err());
}

#[test]
fn test_non_positive_rate_yields_zeros() {
    for value in [Decimal::ZERO, dec!(-1.5)] {
        let result = convert_rate(&input(RateKind::Annual, value, Compounding::Monthly)).unwrap();
        assert_eq!(result, RateConversion::default());
    }
}

#[test]
fn test_compounding_periods() {
    assert_eq!(Compounding::SemiAnnual.periods_per_year(), 2);
    assert_eq!(Compounding::Daily.periods_per_year(), 365);
}
