use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DISPLAY_SCALE;
use crate::utils::decimal_utils::round_half_up;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    #[default]
    Long,
    Short,
}

impl PositionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSide::Long => "long",
            PositionSide::Short => "short",
        }
    }
}

impl std::fmt::Display for PositionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesPosition {
    pub contract_size: Decimal,
    pub quantity: Decimal,
    /// A leverage of zero is read as no leverage.
    pub leverage: Decimal,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    pub side: PositionSide,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesOutcome {
    pub margin: Decimal,
    pub profit: Decimal,
    /// Return on margin, in percent.
    pub roi_percent: Decimal,
}

/// Margin, profit and return on margin of a closed futures position.
pub fn calculate_futures(position: &FuturesPosition) -> FuturesOutcome {
    let leverage = if position.leverage.is_zero() {
        Decimal::ONE
    } else {
        position.leverage
    };

    let notional = position.contract_size * position.entry_price * position.quantity;
    let margin = notional
        .checked_div(leverage)
        .map(|m| round_half_up(m, DISPLAY_SCALE))
        .unwrap_or(Decimal::ZERO);

    let price_diff = match position.side {
        PositionSide::Long => position.exit_price - position.entry_price,
        PositionSide::Short => position.entry_price - position.exit_price,
    };
    let profit = round_half_up(
        position.contract_size * position.quantity * price_diff,
        DISPLAY_SCALE,
    );

    let roi_percent = if margin.is_zero() {
        Decimal::ZERO
    } else {
        round_half_up(
            round_half_up(profit / margin, 4) * Decimal::ONE_HUNDRED,
            DISPLAY_SCALE,
        )
    };

    FuturesOutcome {
        margin,
        profit,
        roi_percent,
    }
}
