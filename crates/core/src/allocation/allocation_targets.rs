//! Static target tables and rebalancing bands.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::{CalculatorError, Result};

use super::{AssetBucket, BucketValues, ClassValues, StockSplit};

/// Target ratios of the permanent portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetAllocation {
    /// Share of each major class in the whole portfolio.
    pub major: ClassValues,
    /// Share of each ETF inside the stock class.
    pub stock_split: StockSplit,
    /// Share of each bucket in the whole portfolio, shown before any holdings exist.
    pub buckets: BucketValues,
}

impl TargetAllocation {
    /// 25/25/25/25 across classes, stock split 60/40.
    pub fn permanent_portfolio() -> Self {
        Self {
            major: ClassValues {
                cash: dec!(0.25),
                stock: dec!(0.25),
                bond: dec!(0.25),
                commodity: dec!(0.25),
            },
            stock_split: StockSplit {
                sp500_etf: dec!(0.60),
                cash_flow_etf: dec!(0.40),
            },
            buckets: BucketValues {
                reverse_repo: dec!(0.25),
                sp500_etf: dec!(0.15),
                cash_flow_etf: dec!(0.10),
                treasury_10y: dec!(0.25),
                gold_etf: dec!(0.25),
            },
        }
    }

    /// Checks that every table is non-negative and sums to exactly one.
    pub fn validate(&self) -> Result<()> {
        check_table("major class", self.major.iter().map(|(_, v)| v))?;
        check_table(
            "stock split",
            [self.stock_split.sp500_etf, self.stock_split.cash_flow_etf].into_iter(),
        )?;
        check_table("bucket", self.buckets.iter().map(|(_, v)| v))?;
        Ok(())
    }
}

fn check_table(name: &str, ratios: impl Iterator<Item = Decimal>) -> Result<()> {
    let mut total = Decimal::ZERO;
    for ratio in ratios {
        if ratio.is_sign_negative() {
            return Err(CalculatorError::InvalidTargets(format!(
                "{} targets contain a negative ratio {}",
                name, ratio
            ))
            .into());
        }
        total += ratio;
    }
    if total != Decimal::ONE {
        return Err(CalculatorError::InvalidTargets(format!(
            "{} targets must sum to 1, got {}",
            name, total
        ))
        .into());
    }
    Ok(())
}

/// Inclusive ratio interval. A ratio on either edge is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioBand {
    pub lower: Decimal,
    pub upper: Decimal,
}

impl RatioBand {
    pub fn new(lower: Decimal, upper: Decimal) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, ratio: Decimal) -> bool {
        ratio >= self.lower && ratio <= self.upper
    }
}

/// When a deviation is large enough to act on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalancingBands {
    /// A major class is flagged at `target ± major_tolerance`, edges included.
    pub major_tolerance: Decimal,
    /// Allowed share of the S&P 500 ETF inside the stock class.
    pub sp500_band: RatioBand,
    /// Allowed share of the cash-flow ETF inside the stock class.
    pub cash_flow_band: RatioBand,
}

impl RebalancingBands {
    /// The stock bands are fixed literals, not derived from the 60/40 target.
    pub fn permanent_portfolio() -> Self {
        Self {
            major_tolerance: dec!(0.10),
            sp500_band: RatioBand::new(dec!(0.45), dec!(0.75)),
            cash_flow_band: RatioBand::new(dec!(0.25), dec!(0.55)),
        }
    }

    pub fn stock_band(&self, bucket: AssetBucket) -> Option<RatioBand> {
        match bucket {
            AssetBucket::Sp500Etf => Some(self.sp500_band),
            AssetBucket::CashFlowEtf => Some(self.cash_flow_band),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.major_tolerance <= Decimal::ZERO || self.major_tolerance >= Decimal::ONE {
            return Err(CalculatorError::InvalidTargets(format!(
                "major tolerance must be between 0 and 1, got {}",
                self.major_tolerance
            ))
            .into());
        }
        for (name, band) in [("sp500", self.sp500_band), ("cash flow", self.cash_flow_band)] {
            if band.lower.is_sign_negative() || band.lower > band.upper || band.upper > Decimal::ONE
            {
                return Err(CalculatorError::InvalidTargets(format!(
                    "{} band [{}, {}] is not a valid ratio interval",
                    name, band.lower, band.upper
                ))
                .into());
            }
        }
        debug!(
            "Rebalancing bands accepted: tolerance {}, sp500 [{}, {}], cash flow [{}, {}]",
            self.major_tolerance,
            self.sp500_band.lower,
            self.sp500_band.upper,
            self.cash_flow_band.lower,
            self.cash_flow_band.upper
        );
        Ok(())
    }
}
