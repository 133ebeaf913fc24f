use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::DISPLAY_SCALE;
use crate::errors::{Result, ValidationError};
use crate::utils::decimal_utils::truncate;

const FEE_RATE_SCALE: u32 = 6;
const COST_PER_SHARE_SCALE: u32 = 4;

/// A position bought twice, the second time at a lower price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostAverageInput {
    pub first_price: Decimal,
    pub first_quantity: Decimal,
    pub rebuy_price: Decimal,
    pub rebuy_quantity: Decimal,
    /// Broker commission, per ten thousand of the traded amount.
    pub commission_per_ten_thousand: Decimal,
    /// Stamp duty on sells, %.
    pub stamp_duty_percent: Decimal,
    /// Transfer fee on every trade, %.
    pub transfer_fee_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostAverageOutcome {
    pub total_quantity: Decimal,
    /// Break-even price including buy-side costs.
    pub cost_per_share: Decimal,
    /// Result of selling everything at the rebuy price, sell-side costs included.
    pub current_profit: Decimal,
}

struct FeeRates {
    commission: Decimal,
    stamp_duty: Decimal,
    transfer_fee: Decimal,
}

impl FeeRates {
    fn from_input(input: &CostAverageInput) -> Self {
        Self {
            commission: truncate(input.commission_per_ten_thousand / dec!(10000), FEE_RATE_SCALE),
            stamp_duty: truncate(input.stamp_duty_percent / Decimal::ONE_HUNDRED, FEE_RATE_SCALE),
            transfer_fee: truncate(
                input.transfer_fee_percent / Decimal::ONE_HUNDRED,
                FEE_RATE_SCALE,
            ),
        }
    }

    fn buy_cost(&self, amount: Decimal) -> Decimal {
        amount + amount * self.commission + amount * self.transfer_fee
    }

    fn sell_cost(&self, amount: Decimal) -> Decimal {
        amount * self.commission + amount * self.stamp_duty + amount * self.transfer_fee
    }
}

/// Average cost after a rebuy, and the result of selling at the rebuy price.
pub fn calculate_cost_average(input: &CostAverageInput) -> Result<CostAverageOutcome> {
    for (name, value) in [
        ("firstPrice", input.first_price),
        ("firstQuantity", input.first_quantity),
        ("rebuyPrice", input.rebuy_price),
        ("rebuyQuantity", input.rebuy_quantity),
    ] {
        if value <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "{} must be greater than zero, got {}",
                name, value
            ))
            .into());
        }
    }

    let fees = FeeRates::from_input(input);
    let total_quantity = input.first_quantity + input.rebuy_quantity;

    let total_cost = fees.buy_cost(input.first_price * input.first_quantity)
        + fees.buy_cost(input.rebuy_price * input.rebuy_quantity);
    let cost_per_share = truncate(total_cost / total_quantity, COST_PER_SHARE_SCALE);

    let market_value = input.rebuy_price * total_quantity;
    let current_profit = truncate(
        market_value - total_cost - fees.sell_cost(market_value),
        DISPLAY_SCALE,
    );

    debug!(
        "Cost average over {} shares: {} per share, profit at rebuy price {}",
        total_quantity, cost_per_share, current_profit
    );

    Ok(CostAverageOutcome {
        total_quantity,
        cost_per_share,
        current_profit,
    })
}
