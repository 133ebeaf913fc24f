//! Fixed-point helpers shared by the calculators.
//!
//! Every rounding in this crate goes through these functions so that the
//! half-up policy and the truncation policy stay in one place.

use std::str::FromStr;

use log::debug;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to `dp` fractional digits, ties away from zero (round half up).
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Drops everything past `dp` fractional digits.
pub fn truncate(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::ToZero)
}

/// Divides and rounds half up to `scale` digits.
/// Returns `None` when the denominator is zero or the quotient overflows.
pub fn checked_ratio(numerator: Decimal, denominator: Decimal, scale: u32) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }
    numerator
        .checked_div(denominator)
        .map(|q| round_half_up(q, scale))
}

/// Converts a fraction (0.25) to a percentage (25.00) at `dp` digits.
pub fn to_percent(ratio: Decimal, dp: u32) -> Decimal {
    round_half_up(ratio * Decimal::ONE_HUNDRED, dp)
}

/// Rounds half up and pads to exactly `dp` fractional digits for display.
pub fn format_decimal(value: Decimal, dp: u32) -> String {
    let mut rounded = round_half_up(value, dp);
    rounded.rescale(dp);
    rounded.to_string()
}

/// Permissive parser used by input sources: blank or unparseable text becomes zero.
///
/// The parsed value is rounded half up to `scale` digits.
pub fn parse_decimal_or_zero(input: &str, scale: u32) -> Decimal {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    match Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
        Ok(value) => round_half_up(value, scale),
        Err(e) => {
            debug!("Treating unparseable amount '{}' as zero: {}", trimmed, e);
            Decimal::ZERO
        }
    }
}
