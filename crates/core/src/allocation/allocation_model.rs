//! Allocation models for the permanent-portfolio engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Buckets and classes
// =============================================================================

/// One of the five holdings the permanent portfolio is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetBucket {
    ReverseRepo,
    Sp500Etf,
    CashFlowEtf,
    Treasury10y,
    GoldEtf,
}

impl AssetBucket {
    pub const ALL: [AssetBucket; 5] = [
        AssetBucket::ReverseRepo,
        AssetBucket::Sp500Etf,
        AssetBucket::CashFlowEtf,
        AssetBucket::Treasury10y,
        AssetBucket::GoldEtf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetBucket::ReverseRepo => "reverseRepo",
            AssetBucket::Sp500Etf => "sp500Etf",
            AssetBucket::CashFlowEtf => "cashFlowEtf",
            AssetBucket::Treasury10y => "treasury10y",
            AssetBucket::GoldEtf => "goldEtf",
        }
    }

    /// Returns a human-friendly label for this bucket.
    pub fn label(&self) -> &'static str {
        match self {
            AssetBucket::ReverseRepo => "Cash (treasury reverse repo)",
            AssetBucket::Sp500Etf => "Stock (S&P 500 ETF)",
            AssetBucket::CashFlowEtf => "Stock (cash-flow ETF)",
            AssetBucket::Treasury10y => "Bond (10-year treasury)",
            AssetBucket::GoldEtf => "Commodity (gold ETF)",
        }
    }

    /// Short name used inside the stock class breakdown.
    pub fn short_label(&self) -> &'static str {
        match self {
            AssetBucket::ReverseRepo => "reverse repo",
            AssetBucket::Sp500Etf => "S&P 500 ETF",
            AssetBucket::CashFlowEtf => "cash-flow ETF",
            AssetBucket::Treasury10y => "10-year treasury",
            AssetBucket::GoldEtf => "gold ETF",
        }
    }
}

impl std::fmt::Display for AssetBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The four top-level classes of the permanent portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MajorAssetClass {
    Cash,
    Stock,
    Bond,
    Commodity,
}

impl MajorAssetClass {
    pub const ALL: [MajorAssetClass; 4] = [
        MajorAssetClass::Cash,
        MajorAssetClass::Stock,
        MajorAssetClass::Bond,
        MajorAssetClass::Commodity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MajorAssetClass::Cash => "cash",
            MajorAssetClass::Stock => "stock",
            MajorAssetClass::Bond => "bond",
            MajorAssetClass::Commodity => "commodity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MajorAssetClass::Cash => "Cash (reverse repo)",
            MajorAssetClass::Stock => "Stock (S&P 500 ETF + cash-flow ETF)",
            MajorAssetClass::Bond => "Bond (10-year treasury)",
            MajorAssetClass::Commodity => "Commodity (gold ETF)",
        }
    }

    /// Buckets whose amounts add up to this class.
    pub fn buckets(&self) -> &'static [AssetBucket] {
        match self {
            MajorAssetClass::Cash => &[AssetBucket::ReverseRepo],
            MajorAssetClass::Stock => &[AssetBucket::Sp500Etf, AssetBucket::CashFlowEtf],
            MajorAssetClass::Bond => &[AssetBucket::Treasury10y],
            MajorAssetClass::Commodity => &[AssetBucket::GoldEtf],
        }
    }
}

impl std::fmt::Display for MajorAssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Value tables
// =============================================================================

/// One decimal per bucket. Used for amounts as well as for ratios.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketValues {
    pub reverse_repo: Decimal,
    pub sp500_etf: Decimal,
    pub cash_flow_etf: Decimal,
    pub treasury_10y: Decimal,
    pub gold_etf: Decimal,
}

impl BucketValues {
    pub fn new(
        reverse_repo: Decimal,
        sp500_etf: Decimal,
        cash_flow_etf: Decimal,
        treasury_10y: Decimal,
        gold_etf: Decimal,
    ) -> Self {
        Self {
            reverse_repo,
            sp500_etf,
            cash_flow_etf,
            treasury_10y,
            gold_etf,
        }
    }

    pub fn get(&self, bucket: AssetBucket) -> Decimal {
        match bucket {
            AssetBucket::ReverseRepo => self.reverse_repo,
            AssetBucket::Sp500Etf => self.sp500_etf,
            AssetBucket::CashFlowEtf => self.cash_flow_etf,
            AssetBucket::Treasury10y => self.treasury_10y,
            AssetBucket::GoldEtf => self.gold_etf,
        }
    }

    pub fn set(&mut self, bucket: AssetBucket, value: Decimal) {
        match bucket {
            AssetBucket::ReverseRepo => self.reverse_repo = value,
            AssetBucket::Sp500Etf => self.sp500_etf = value,
            AssetBucket::CashFlowEtf => self.cash_flow_etf = value,
            AssetBucket::Treasury10y => self.treasury_10y = value,
            AssetBucket::GoldEtf => self.gold_etf = value,
        }
    }

    /// Builds a table by evaluating `f` for each bucket.
    pub fn from_fn(mut f: impl FnMut(AssetBucket) -> Decimal) -> Self {
        let mut values = Self::default();
        for bucket in AssetBucket::ALL {
            values.set(bucket, f(bucket));
        }
        values
    }

    /// Iterates in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (AssetBucket, Decimal)> + '_ {
        AssetBucket::ALL.into_iter().map(move |b| (b, self.get(b)))
    }

    pub fn sum(&self) -> Decimal {
        self.iter().map(|(_, v)| v).sum()
    }

    /// Sum of the buckets that make up `class`.
    pub fn class_total(&self, class: MajorAssetClass) -> Decimal {
        class.buckets().iter().map(|b| self.get(*b)).sum()
    }
}

/// One decimal per major asset class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassValues {
    pub cash: Decimal,
    pub stock: Decimal,
    pub bond: Decimal,
    pub commodity: Decimal,
}

impl ClassValues {
    pub fn get(&self, class: MajorAssetClass) -> Decimal {
        match class {
            MajorAssetClass::Cash => self.cash,
            MajorAssetClass::Stock => self.stock,
            MajorAssetClass::Bond => self.bond,
            MajorAssetClass::Commodity => self.commodity,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MajorAssetClass, Decimal)> + '_ {
        MajorAssetClass::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn sum(&self) -> Decimal {
        self.iter().map(|(_, v)| v).sum()
    }
}

/// Split of a stock-class amount between its two ETFs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSplit {
    pub sp500_etf: Decimal,
    pub cash_flow_etf: Decimal,
}

impl StockSplit {
    pub fn get(&self, bucket: AssetBucket) -> Decimal {
        match bucket {
            AssetBucket::Sp500Etf => self.sp500_etf,
            AssetBucket::CashFlowEtf => self.cash_flow_etf,
            _ => Decimal::ZERO,
        }
    }

    pub fn sum(&self) -> Decimal {
        self.sp500_etf + self.cash_flow_etf
    }
}

// =============================================================================
// Input
// =============================================================================

/// Holdings as entered by the user, plus the nominal total used before any
/// holdings exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSnapshot {
    pub holdings: BucketValues,
    pub nominal_total: Decimal,
}

impl AllocationSnapshot {
    pub fn new(holdings: BucketValues, nominal_total: Decimal) -> Self {
        Self {
            holdings,
            nominal_total,
        }
    }

    /// Sum of the five holdings.
    pub fn actual_total(&self) -> Decimal {
        self.holdings.sum()
    }
}

// =============================================================================
// Report
// =============================================================================

/// Where the reported current ratios came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RatioBasis {
    /// Ratios were computed from the holdings.
    Holdings,
    /// No holdings exist; the bucket target table is shown instead.
    Targets,
}

/// Position of a ratio relative to its rebalancing band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weighting {
    Overweight,
    Underweight,
    WithinBand,
}

/// Ratio and band check for one major class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MajorClassPosition {
    pub class: MajorAssetClass,
    pub amount: Decimal,
    pub ratio: Decimal,
    pub target_ratio: Decimal,
    pub lower_bound: Decimal,
    pub upper_bound: Decimal,
    pub weighting: Weighting,
}

/// A class outside its band, with the amount needed to bring it back to target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDeviation {
    pub class: MajorAssetClass,
    /// Excess for over-weighted classes, shortage for under-weighted ones. Always > 0.
    pub amount: Decimal,
    pub current_ratio: Decimal,
    pub target_ratio: Decimal,
    /// ETF-level breakdown, present only for the stock class.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stock_split: Option<StockSplit>,
}

/// A stock ETF whose share of the stock class left its band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleeveDeviation {
    pub bucket: AssetBucket,
    pub ratio_in_stock: Decimal,
    pub target_ratio: Decimal,
    pub current_amount: Decimal,
    pub ideal_amount: Decimal,
    pub weighting: Weighting,
    /// Amount to sell (over-weighted) or buy (under-weighted).
    pub amount: Decimal,
}

/// Balance check between the two ETFs inside the stock class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockInternalVerdict {
    pub needs_rebalancing: bool,
    pub stock_amount: Decimal,
    /// `None` when nothing is invested in the stock class.
    pub sp500_ratio: Option<Decimal>,
    pub cash_flow_ratio: Option<Decimal>,
    pub deviations: Vec<SleeveDeviation>,
}

impl StockInternalVerdict {
    pub fn empty() -> Self {
        Self {
            needs_rebalancing: false,
            stock_amount: Decimal::ZERO,
            sp500_ratio: None,
            cash_flow_ratio: None,
            deviations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAmount {
    pub class: MajorAssetClass,
    pub amount: Decimal,
}

/// Sell `amount` of `from` and buy `to` with the proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub from: MajorAssetClass,
    pub to: MajorAssetClass,
    pub amount: Decimal,
}

/// How to move money between major classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferPlan {
    /// No class is outside its band.
    NotNeeded,
    /// Both over- and under-weighted classes exist.
    Transfers {
        transfers: Vec<Transfer>,
        /// Shortage left over once every donor share was drawn.
        unfilled: Vec<ClassAmount>,
    },
    /// Only over-weighted classes: sell them down and buy the rest at target.
    TrimOverweight,
    /// Only under-weighted classes: sell the others or add new money.
    TopUpUnderweight,
}

impl TransferPlan {
    pub fn transfers(&self) -> &[Transfer] {
        match self {
            TransferPlan::Transfers { transfers, .. } => transfers,
            _ => &[],
        }
    }
}

/// Rebalancing findings for a portfolio that has holdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalancingVerdict {
    pub major_classes: Vec<MajorClassPosition>,
    pub overweight: Vec<ClassDeviation>,
    pub underweight: Vec<ClassDeviation>,
    pub stock_internal: StockInternalVerdict,
    pub transfer_plan: TransferPlan,
}

impl RebalancingVerdict {
    pub fn needs_major_rebalancing(&self) -> bool {
        !self.overweight.is_empty() || !self.underweight.is_empty()
    }

    pub fn needs_rebalancing(&self) -> bool {
        self.needs_major_rebalancing() || self.stock_internal.needs_rebalancing
    }

    pub fn major_class(&self, class: MajorAssetClass) -> Option<&MajorClassPosition> {
        self.major_classes.iter().find(|p| p.class == class)
    }
}

/// Suggested amount for one bucket when starting from nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSuggestion {
    pub bucket: AssetBucket,
    pub target_ratio: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RebalancingOutcome {
    /// No holdings yet: how to split the nominal total.
    InitialAllocation {
        basis: Decimal,
        suggestions: Vec<BucketSuggestion>,
    },
    Evaluated(RebalancingVerdict),
}

impl RebalancingOutcome {
    pub fn verdict(&self) -> Option<&RebalancingVerdict> {
        match self {
            RebalancingOutcome::Evaluated(verdict) => Some(verdict),
            RebalancingOutcome::InitialAllocation { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAllocation {
    pub class: MajorAssetClass,
    pub target_ratio: Decimal,
    pub amount: Decimal,
}

/// A new contribution split by the static targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionSplit {
    pub total: Decimal,
    pub classes: Vec<ClassAllocation>,
    pub stock_split: StockSplit,
}

impl ContributionSplit {
    pub fn amount_for(&self, class: MajorAssetClass) -> Decimal {
        self.classes
            .iter()
            .find(|c| c.class == class)
            .map(|c| c.amount)
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContributionPlan {
    NothingToAllocate,
    Split(ContributionSplit),
}

/// Complete result of one `evaluate` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationReport {
    pub current_amounts: BucketValues,
    pub current_ratios: BucketValues,
    pub ratio_basis: RatioBasis,
    pub actual_total: Decimal,
    pub effective_total: Decimal,
    pub outcome: RebalancingOutcome,
    pub contribution: ContributionPlan,
}

impl AllocationReport {
    pub fn verdict(&self) -> Option<&RebalancingVerdict> {
        self.outcome.verdict()
    }

    /// False for the initial-allocation branch.
    pub fn needs_rebalancing(&self) -> bool {
        self.verdict()
            .map(RebalancingVerdict::needs_rebalancing)
            .unwrap_or(false)
    }
}
