//! Human-readable advice for an [`AllocationReport`].
//!
//! Rendering only formats what the engine already decided; it never recomputes
//! amounts. Scales and the currency unit come from [`Settings`].

use rust_decimal::Decimal;

use crate::settings::Settings;
use crate::utils::decimal_utils::{format_decimal, to_percent};

use super::{
    AllocationReport, AssetBucket, BucketSuggestion, ClassDeviation, ContributionPlan,
    ContributionSplit, MajorAssetClass, RebalancingOutcome, RebalancingVerdict,
    StockInternalVerdict, TransferPlan, Weighting,
};

struct Formatter<'a> {
    settings: &'a Settings,
}

impl Formatter<'_> {
    fn money(&self, amount: Decimal) -> String {
        format!(
            "{} {}",
            format_decimal(amount, self.settings.money_scale),
            self.settings.currency_unit
        )
    }

    fn percent(&self, ratio: Decimal) -> String {
        format!(
            "{}%",
            format_decimal(
                to_percent(ratio, self.settings.percent_scale),
                self.settings.percent_scale
            )
        )
    }
}

/// Renders the whole report: rebalancing or initial allocation, then the
/// contribution split.
pub fn render_advice(report: &AllocationReport, settings: &Settings) -> String {
    let mut text = match &report.outcome {
        RebalancingOutcome::Evaluated(verdict) => render_rebalancing_advice(verdict, settings),
        RebalancingOutcome::InitialAllocation { basis, suggestions } => {
            render_initial_allocation(*basis, suggestions, settings)
        }
    };

    text.push('\n');
    match &report.contribution {
        ContributionPlan::Split(split) => {
            text.push_str(&render_contribution_advice(split, settings));
        }
        ContributionPlan::NothingToAllocate => {
            text.push_str("No new contribution to allocate.\n");
        }
    }
    text
}

/// Advice for a portfolio that already has holdings.
pub fn render_rebalancing_advice(verdict: &RebalancingVerdict, settings: &Settings) -> String {
    let fmt = Formatter { settings };
    let mut text = String::new();

    if !verdict.needs_rebalancing() {
        text.push_str("Allocation is balanced, no rebalancing needed.\n");
        for position in &verdict.major_classes {
            text.push_str(&format!(
                "- {}: {} (target {})\n",
                position.class.label(),
                fmt.percent(position.ratio),
                fmt.percent(position.target_ratio)
            ));
        }
        if let Some(sp500_ratio) = verdict.stock_internal.sp500_ratio {
            let cash_flow_ratio = verdict.stock_internal.cash_flow_ratio.unwrap_or_default();
            text.push_str(&format!(
                "- Inside stock: {} {}, {} {}\n",
                AssetBucket::Sp500Etf.short_label(),
                fmt.percent(sp500_ratio),
                AssetBucket::CashFlowEtf.short_label(),
                fmt.percent(cash_flow_ratio)
            ));
        }
        return text;
    }

    if verdict.needs_major_rebalancing() {
        text.push_str("Major classes: rebalancing needed\n\n");
        if !verdict.overweight.is_empty() {
            text.push_str("Over-weighted:\n");
            for deviation in &verdict.overweight {
                push_deviation(&mut text, &fmt, deviation, "over by", "reduce");
            }
            text.push('\n');
        }
        if !verdict.underweight.is_empty() {
            text.push_str("Under-weighted:\n");
            for deviation in &verdict.underweight {
                push_deviation(&mut text, &fmt, deviation, "under by", "add");
            }
            text.push('\n');
        }
        push_transfer_plan(&mut text, &fmt, &verdict.transfer_plan);
    } else {
        text.push_str("Major classes are within their bands.\n");
    }

    if verdict.stock_internal.needs_rebalancing {
        text.push('\n');
        text.push_str(&render_stock_internal(&verdict.stock_internal, settings));
    }
    text
}

fn push_deviation(
    text: &mut String,
    fmt: &Formatter<'_>,
    deviation: &ClassDeviation,
    direction: &str,
    action: &str,
) {
    text.push_str(&format!(
        "- {}: {} {} (current {}, target {})\n",
        deviation.class.label(),
        direction,
        fmt.money(deviation.amount),
        fmt.percent(deviation.current_ratio),
        fmt.percent(deviation.target_ratio)
    ));
    if let Some(split) = &deviation.stock_split {
        text.push_str(&format!(
            "  {} about {} of the {} and {} of the {}\n",
            action,
            fmt.money(split.sp500_etf),
            AssetBucket::Sp500Etf.short_label(),
            fmt.money(split.cash_flow_etf),
            AssetBucket::CashFlowEtf.short_label()
        ));
    }
}

fn push_transfer_plan(text: &mut String, fmt: &Formatter<'_>, plan: &TransferPlan) {
    match plan {
        TransferPlan::NotNeeded => {}
        TransferPlan::Transfers {
            transfers,
            unfilled,
        } => {
            text.push_str("Transfers (total invested amount stays the same):\n");
            for transfer in transfers {
                text.push_str(&format!(
                    "- sell {} of {}, buy {}\n",
                    fmt.money(transfer.amount),
                    transfer.from.label(),
                    transfer.to.label()
                ));
            }
            for residue in unfilled {
                text.push_str(&format!(
                    "- {} still short by {} after transfers\n",
                    residue.class.label(),
                    fmt.money(residue.amount)
                ));
            }
        }
        TransferPlan::TrimOverweight => {
            text.push_str(
                "Sell the over-weighted classes down and buy the others at their target ratio.\n",
            );
        }
        TransferPlan::TopUpUnderweight => {
            text.push_str(
                "Sell from the other classes to buy the under-weighted ones, \
                 or add new money if nothing can be sold.\n",
            );
        }
    }
}

fn render_stock_internal(verdict: &StockInternalVerdict, settings: &Settings) -> String {
    let fmt = Formatter { settings };
    let mut text = format!(
        "Inside stock: rebalancing needed (stock total {})\n",
        fmt.money(verdict.stock_amount)
    );
    for deviation in &verdict.deviations {
        let (state, action) = match deviation.weighting {
            Weighting::Overweight => ("over-weighted", "sell"),
            _ => ("under-weighted", "buy"),
        };
        let counterpart = match deviation.bucket {
            AssetBucket::Sp500Etf => AssetBucket::CashFlowEtf,
            _ => AssetBucket::Sp500Etf,
        };
        text.push_str(&format!(
            "- {}: {} of stock, target {}, {}\n",
            deviation.bucket.short_label(),
            fmt.percent(deviation.ratio_in_stock),
            fmt.percent(deviation.target_ratio),
            state
        ));
        text.push_str(&format!(
            "  ideal {}, current {}: {} {} against the {}\n",
            fmt.money(deviation.ideal_amount),
            fmt.money(deviation.current_amount),
            action,
            fmt.money(deviation.amount),
            counterpart.short_label()
        ));
    }
    text
}

fn render_initial_allocation(
    basis: Decimal,
    suggestions: &[BucketSuggestion],
    settings: &Settings,
) -> String {
    let fmt = Formatter { settings };
    let mut text = format!(
        "No holdings yet. Suggested initial allocation of {}:\n",
        fmt.money(basis)
    );
    for suggestion in suggestions {
        text.push_str(&format!(
            "- {}: {} ({})\n",
            suggestion.bucket.label(),
            fmt.percent(suggestion.target_ratio),
            fmt.money(suggestion.amount)
        ));
    }
    text
}

/// Advice for splitting new money by the static targets.
pub fn render_contribution_advice(split: &ContributionSplit, settings: &Settings) -> String {
    let fmt = Formatter { settings };
    let mut text = format!("New contribution of {}:\n", fmt.money(split.total));
    for class in &split.classes {
        text.push_str(&format!(
            "- {}: {} ({})\n",
            class.class.label(),
            fmt.percent(class.target_ratio),
            fmt.money(class.amount)
        ));
        if class.class == MajorAssetClass::Stock {
            for bucket in [AssetBucket::Sp500Etf, AssetBucket::CashFlowEtf] {
                text.push_str(&format!(
                    "  - {}: {}\n",
                    bucket.short_label(),
                    fmt.money(split.stock_split.get(bucket))
                ));
            }
        }
    }
    text
}
