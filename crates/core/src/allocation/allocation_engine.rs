//! Permanent-portfolio allocation engine.
//!
//! The engine is immutable once built: every `evaluate` call is a pure
//! recomputation from its arguments.

use log::debug;
use rust_decimal::Decimal;

use crate::constants::{CALCULATION_SCALE, DISPLAY_SCALE};
use crate::errors::Result;
use crate::utils::decimal_utils::{checked_ratio, round_half_up};

use super::{
    AllocationReport, AllocationSnapshot, AssetBucket, BucketSuggestion, BucketValues,
    ClassAllocation, ClassAmount, ClassDeviation, ContributionPlan, ContributionSplit,
    MajorAssetClass, MajorClassPosition, RatioBasis, RebalancingBands, RebalancingOutcome,
    RebalancingVerdict, SleeveDeviation, StockInternalVerdict, StockSplit, TargetAllocation,
    Transfer, TransferPlan, Weighting,
};

/// Trait for the allocation engine.
pub trait AllocationEngineTrait: Send + Sync {
    /// Computes ratios, the rebalancing verdict and the contribution split.
    ///
    /// Amounts are expected to be non-negative; rejecting negative input is the
    /// caller's job.
    fn evaluate(
        &self,
        snapshot: &AllocationSnapshot,
        additional_contribution: Decimal,
    ) -> AllocationReport;
}

/// Major-class findings before the transfer plan is drawn up.
struct MajorClassReview {
    positions: Vec<MajorClassPosition>,
    overweight: Vec<ClassDeviation>,
    underweight: Vec<ClassDeviation>,
}

pub struct AllocationEngine {
    targets: TargetAllocation,
    bands: RebalancingBands,
}

impl AllocationEngine {
    /// Builds an engine after checking that every target table sums to one.
    pub fn new(targets: TargetAllocation, bands: RebalancingBands) -> Result<Self> {
        targets.validate()?;
        bands.validate()?;
        Ok(Self { targets, bands })
    }

    /// Engine with the 25/25/25/25 targets and the standard bands.
    pub fn permanent_portfolio() -> Result<Self> {
        Self::new(
            TargetAllocation::permanent_portfolio(),
            RebalancingBands::permanent_portfolio(),
        )
    }

    fn ratio(amount: Decimal, total: Decimal) -> Decimal {
        checked_ratio(amount, total, CALCULATION_SCALE).unwrap_or(Decimal::ZERO)
    }

    fn money(value: Decimal) -> Decimal {
        round_half_up(value, DISPLAY_SCALE)
    }

    fn initial_allocation(&self, basis: Decimal) -> RebalancingOutcome {
        let basis = basis.max(Decimal::ZERO);
        let suggestions = self
            .targets
            .buckets
            .iter()
            .map(|(bucket, target_ratio)| BucketSuggestion {
                bucket,
                target_ratio,
                amount: Self::money(basis * target_ratio),
            })
            .collect();
        RebalancingOutcome::InitialAllocation { basis, suggestions }
    }

    /// Splits a stock-class amount the way the stock class is currently held,
    /// or by the 60/40 target when nothing is held yet.
    fn split_stock_amount(&self, amount: Decimal, holdings: &BucketValues) -> StockSplit {
        let stock_total = holdings.class_total(MajorAssetClass::Stock);
        if stock_total > Decimal::ZERO {
            StockSplit {
                sp500_etf: Self::money(Self::ratio(amount * holdings.sp500_etf, stock_total)),
                cash_flow_etf: Self::money(Self::ratio(
                    amount * holdings.cash_flow_etf,
                    stock_total,
                )),
            }
        } else {
            StockSplit {
                sp500_etf: Self::money(amount * self.targets.stock_split.sp500_etf),
                cash_flow_etf: Self::money(amount * self.targets.stock_split.cash_flow_etf),
            }
        }
    }

    fn review_major_classes(
        &self,
        holdings: &BucketValues,
        total: Decimal,
    ) -> MajorClassReview {
        let mut positions = Vec::with_capacity(MajorAssetClass::ALL.len());
        let mut overweight = Vec::new();
        let mut underweight = Vec::new();

        for class in MajorAssetClass::ALL {
            let amount = holdings.class_total(class);
            let ratio = Self::ratio(amount, total);
            let target_ratio = self.targets.major.get(class);
            let lower_bound = round_half_up(
                target_ratio - self.bands.major_tolerance,
                CALCULATION_SCALE,
            );
            let upper_bound = round_half_up(
                target_ratio + self.bands.major_tolerance,
                CALCULATION_SCALE,
            );
            let ideal = Self::money(total * target_ratio);

            let weighting = if ratio >= upper_bound {
                let excess = Self::money(amount - ideal);
                if excess > Decimal::ZERO {
                    overweight.push(self.deviation(class, excess, ratio, target_ratio, holdings));
                }
                Weighting::Overweight
            } else if ratio <= lower_bound {
                let shortage = Self::money(ideal - amount);
                if shortage > Decimal::ZERO {
                    underweight.push(self.deviation(
                        class,
                        shortage,
                        ratio,
                        target_ratio,
                        holdings,
                    ));
                }
                Weighting::Underweight
            } else {
                Weighting::WithinBand
            };

            positions.push(MajorClassPosition {
                class,
                amount,
                ratio,
                target_ratio,
                lower_bound,
                upper_bound,
                weighting,
            });
        }

        MajorClassReview {
            positions,
            overweight,
            underweight,
        }
    }

    fn deviation(
        &self,
        class: MajorAssetClass,
        amount: Decimal,
        current_ratio: Decimal,
        target_ratio: Decimal,
        holdings: &BucketValues,
    ) -> ClassDeviation {
        let stock_split = match class {
            MajorAssetClass::Stock => Some(self.split_stock_amount(amount, holdings)),
            _ => None,
        };
        ClassDeviation {
            class,
            amount,
            current_ratio,
            target_ratio,
            stock_split,
        }
    }

    fn review_stock_sleeves(&self, holdings: &BucketValues) -> StockInternalVerdict {
        let stock_amount = holdings.class_total(MajorAssetClass::Stock);
        if stock_amount <= Decimal::ZERO {
            return StockInternalVerdict::empty();
        }

        let sp500_ratio = Self::ratio(holdings.sp500_etf, stock_amount);
        let cash_flow_ratio = Self::ratio(holdings.cash_flow_etf, stock_amount);

        let mut deviations = Vec::new();
        for (bucket, ratio_in_stock) in [
            (AssetBucket::Sp500Etf, sp500_ratio),
            (AssetBucket::CashFlowEtf, cash_flow_ratio),
        ] {
            let in_band = self
                .bands
                .stock_band(bucket)
                .map(|band| band.contains(ratio_in_stock))
                .unwrap_or(true);
            if in_band {
                continue;
            }

            let target_ratio = self.targets.stock_split.get(bucket);
            let current_amount = holdings.get(bucket);
            let ideal_amount = Self::money(stock_amount * target_ratio);
            let (weighting, amount) = if ratio_in_stock > target_ratio {
                (Weighting::Overweight, Self::money(current_amount - ideal_amount))
            } else {
                (Weighting::Underweight, Self::money(ideal_amount - current_amount))
            };

            deviations.push(SleeveDeviation {
                bucket,
                ratio_in_stock,
                target_ratio,
                current_amount,
                ideal_amount,
                weighting,
                amount,
            });
        }

        StockInternalVerdict {
            needs_rebalancing: !deviations.is_empty(),
            stock_amount,
            sp500_ratio: Some(sp500_ratio),
            cash_flow_ratio: Some(cash_flow_ratio),
            deviations,
        }
    }

    /// Proportional draw: each under-weighted class takes from every donor in
    /// proportion to the donor's share of the total excess, never more than the
    /// donor has left. Cent rounding can leave a recipient short while donors
    /// still hold excess, so a second pass draws that residue from whatever
    /// capacity remains. Only a real lack of excess is reported as unfilled.
    fn plan_transfers(
        &self,
        overweight: &[ClassDeviation],
        underweight: &[ClassDeviation],
    ) -> TransferPlan {
        match (overweight.is_empty(), underweight.is_empty()) {
            (true, true) => return TransferPlan::NotNeeded,
            (false, true) => return TransferPlan::TrimOverweight,
            (true, false) => return TransferPlan::TopUpUnderweight,
            (false, false) => {}
        }

        let total_excess: Decimal = overweight.iter().map(|d| d.amount).sum();
        let proportions: Vec<Decimal> = overweight
            .iter()
            .map(|d| Self::ratio(d.amount, total_excess))
            .collect();
        let mut remaining: Vec<Decimal> = overweight.iter().map(|d| d.amount).collect();

        let mut transfers = Vec::new();
        let mut unfilled = Vec::new();

        for recipient in underweight {
            let mut still_needed = recipient.amount;
            let mut drawn = vec![Decimal::ZERO; overweight.len()];

            for (index, proportion) in proportions.iter().enumerate() {
                let share = Self::money(*proportion * recipient.amount);
                let amount = share.min(remaining[index]).min(still_needed);
                if amount > Decimal::ZERO {
                    drawn[index] += amount;
                    remaining[index] -= amount;
                    still_needed -= amount;
                }
            }

            for index in 0..overweight.len() {
                if still_needed <= Decimal::ZERO {
                    break;
                }
                let amount = still_needed.min(remaining[index]);
                if amount > Decimal::ZERO {
                    drawn[index] += amount;
                    remaining[index] -= amount;
                    still_needed -= amount;
                }
            }

            for (donor, amount) in overweight.iter().zip(drawn) {
                if amount > Decimal::ZERO {
                    transfers.push(Transfer {
                        from: donor.class,
                        to: recipient.class,
                        amount,
                    });
                }
            }

            if still_needed > Decimal::ZERO {
                unfilled.push(ClassAmount {
                    class: recipient.class,
                    amount: still_needed,
                });
            }
        }

        TransferPlan::Transfers {
            transfers,
            unfilled,
        }
    }

    fn review(&self, holdings: &BucketValues, total: Decimal) -> RebalancingVerdict {
        let MajorClassReview {
            positions: major_classes,
            overweight,
            underweight,
        } = self.review_major_classes(holdings, total);
        let stock_internal = self.review_stock_sleeves(holdings);
        let transfer_plan = self.plan_transfers(&overweight, &underweight);

        debug!(
            "Rebalancing review over {}: {} over-weighted, {} under-weighted, stock internal {}",
            total,
            overweight.len(),
            underweight.len(),
            stock_internal.needs_rebalancing
        );

        RebalancingVerdict {
            major_classes,
            overweight,
            underweight,
            stock_internal,
            transfer_plan,
        }
    }

    /// Splits new money by the static targets only, ignoring current deviation.
    fn split_contribution(&self, contribution: Decimal) -> ContributionPlan {
        if contribution <= Decimal::ZERO {
            return ContributionPlan::NothingToAllocate;
        }

        let classes: Vec<ClassAllocation> = self
            .targets
            .major
            .iter()
            .map(|(class, target_ratio)| ClassAllocation {
                class,
                target_ratio,
                amount: Self::money(contribution * target_ratio),
            })
            .collect();

        let stock_share = classes
            .iter()
            .find(|c| c.class == MajorAssetClass::Stock)
            .map(|c| c.amount)
            .unwrap_or(Decimal::ZERO);
        let stock_split = StockSplit {
            sp500_etf: Self::money(stock_share * self.targets.stock_split.sp500_etf),
            cash_flow_etf: Self::money(stock_share * self.targets.stock_split.cash_flow_etf),
        };

        ContributionPlan::Split(ContributionSplit {
            total: Self::money(contribution),
            classes,
            stock_split,
        })
    }
}

impl AllocationEngineTrait for AllocationEngine {
    fn evaluate(
        &self,
        snapshot: &AllocationSnapshot,
        additional_contribution: Decimal,
    ) -> AllocationReport {
        let holdings = snapshot.holdings;
        let actual_total = snapshot.actual_total();
        let has_holdings = actual_total > Decimal::ZERO;
        let effective_total = if has_holdings {
            actual_total
        } else {
            snapshot.nominal_total
        };

        let (current_ratios, ratio_basis, outcome) = if has_holdings {
            (
                BucketValues::from_fn(|b| Self::ratio(holdings.get(b), actual_total)),
                RatioBasis::Holdings,
                RebalancingOutcome::Evaluated(self.review(&holdings, actual_total)),
            )
        } else {
            debug!(
                "No holdings entered, showing initial allocation for {}",
                effective_total
            );
            (
                self.targets.buckets,
                RatioBasis::Targets,
                self.initial_allocation(effective_total),
            )
        };

        AllocationReport {
            current_amounts: holdings,
            current_ratios,
            ratio_basis,
            actual_total,
            effective_total,
            outcome,
            contribution: self.split_contribution(additional_contribution),
        }
    }
}
