use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DISPLAY_SCALE;
use crate::errors::{Result, ValidationError};
use crate::utils::decimal_utils::truncate;

/// Buy USDT with local currency, move it, sell it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdtRoundTrip {
    pub buy_price: Decimal,
    /// Local currency spent on the buy.
    pub spend_amount: Decimal,
    pub sell_price: Decimal,
    /// Network fee, in USDT.
    pub network_fee: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeResult {
    Profit,
    Loss,
    BreakEven,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdtOutcome {
    pub quantity: Decimal,
    pub proceeds: Decimal,
    pub fee_value: Decimal,
    /// Signed; negative on a loss.
    pub pnl: Decimal,
    pub result: TradeResult,
}

impl UsdtRoundTrip {
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("buyPrice", self.buy_price),
            ("spendAmount", self.spend_amount),
            ("sellPrice", self.sell_price),
        ] {
            if value <= Decimal::ZERO {
                return Err(ValidationError::InvalidInput(format!(
                    "{} must be greater than zero, got {}",
                    name, value
                ))
                .into());
            }
        }
        if self.network_fee.is_sign_negative() {
            return Err(ValidationError::NegativeAmount {
                field: "networkFee".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Profit or loss of a round trip. Every intermediate amount is truncated to
/// cents, never rounded up.
pub fn calculate_usdt_round_trip(trip: &UsdtRoundTrip) -> Result<UsdtOutcome> {
    trip.validate()?;

    let quantity = truncate(trip.spend_amount / trip.buy_price, DISPLAY_SCALE);
    let proceeds = truncate(trip.sell_price * quantity, DISPLAY_SCALE);
    let fee_value = truncate(trip.network_fee * trip.sell_price, DISPLAY_SCALE);
    let pnl = proceeds - trip.spend_amount - fee_value;

    let result = if pnl > Decimal::ZERO {
        TradeResult::Profit
    } else if pnl < Decimal::ZERO {
        TradeResult::Loss
    } else {
        TradeResult::BreakEven
    };

    Ok(UsdtOutcome {
        quantity,
        proceeds,
        fee_value,
        pnl,
        result,
    })
}
