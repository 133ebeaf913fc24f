//! Converts between the rate quotes banks and money-market funds publish.
//!
//! Every input is normalised to an effective annual rate first; all other
//! outputs are derived from it. Rates are percentages on both sides.

use log::debug;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::{CalculatorError, Result};
use crate::utils::decimal_utils::round_half_up;

const RATE_SCALE: u32 = 4;
const DAILY_RATE_SCALE: u32 = 6;
const DAYS_PER_YEAR: i64 = 365;
const UNITS_PER_INCOME_QUOTE: Decimal = dec!(10000);

/// What the entered number is quoted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateKind {
    /// Nominal annual rate, %.
    #[default]
    Annual,
    /// Monthly rate, %, compounded monthly.
    Monthly,
    /// Daily rate, %, compounded daily.
    Daily,
    /// Money-market fund 7-day annualised yield, %.
    SevenDayYield,
    /// Daily income per 10 000 units held.
    IncomePerTenThousand,
    /// Treasury reverse-repo annualised yield, %.
    ReverseRepoYield,
}

impl RateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateKind::Annual => "annual",
            RateKind::Monthly => "monthly",
            RateKind::Daily => "daily",
            RateKind::SevenDayYield => "seven-day-yield",
            RateKind::IncomePerTenThousand => "income-per-10k",
            RateKind::ReverseRepoYield => "reverse-repo-yield",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Compounding {
    #[default]
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
    Daily,
}

impl Compounding {
    pub fn periods_per_year(&self) -> i64 {
        match self {
            Compounding::Annual => 1,
            Compounding::SemiAnnual => 2,
            Compounding::Quarterly => 4,
            Compounding::Monthly => 12,
            Compounding::Daily => DAYS_PER_YEAR,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Compounding::Annual => "annual",
            Compounding::SemiAnnual => "semi-annual",
            Compounding::Quarterly => "quarterly",
            Compounding::Monthly => "monthly",
            Compounding::Daily => "daily",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateInput {
    pub kind: RateKind,
    pub value: Decimal,
    pub compounding: Compounding,
    /// Inflation, %. Zero leaves the real rate equal to the nominal one.
    #[serde(default)]
    pub cpi_percent: Decimal,
}

/// Every rate in percent, except `income_per_ten_thousand` which is money.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateConversion {
    pub effective_annual: Decimal,
    pub monthly: Decimal,
    pub daily: Decimal,
    pub seven_day_yield: Decimal,
    pub income_per_ten_thousand: Decimal,
    pub real_annual: Decimal,
}

fn overflow(what: &str) -> CalculatorError {
    CalculatorError::Calculation(format!("{} is out of range", what))
}

/// `(1 + rate)^exp - 1` for an integral exponent.
fn compound(rate: Decimal, exp: i64) -> Result<Decimal> {
    (Decimal::ONE + rate)
        .checked_powi(exp)
        .map(|v| v - Decimal::ONE)
        .ok_or_else(|| overflow("compounded rate").into())
}

/// `(1 + rate)^(num/den) - 1`.
fn fractional_compound(rate: Decimal, num: i64, den: i64) -> Result<Decimal> {
    let exp = Decimal::from(num) / Decimal::from(den);
    (Decimal::ONE + rate)
        .checked_powd(exp)
        .map(|v| v - Decimal::ONE)
        .ok_or_else(|| overflow("periodic rate").into())
}

fn effective_annual(input: &RateInput) -> Result<Decimal> {
    let rate = input.value / Decimal::ONE_HUNDRED;
    match input.kind {
        RateKind::Annual => match input.compounding {
            Compounding::Annual => Ok(rate),
            other => {
                let periods = other.periods_per_year();
                compound(rate / Decimal::from(periods), periods)
            }
        },
        RateKind::Monthly => compound(rate, 12),
        RateKind::Daily => compound(rate, DAYS_PER_YEAR),
        RateKind::SevenDayYield | RateKind::ReverseRepoYield => Ok(rate),
        RateKind::IncomePerTenThousand => {
            Ok(input.value / UNITS_PER_INCOME_QUOTE * Decimal::from(DAYS_PER_YEAR))
        }
    }
}

fn percent(fraction: Decimal, dp: u32) -> Decimal {
    round_half_up(fraction * Decimal::ONE_HUNDRED, dp)
}

/// Converts one quoted rate into every other quote.
///
/// A non-positive value yields all zeros.
pub fn convert_rate(input: &RateInput) -> Result<RateConversion> {
    if input.value <= Decimal::ZERO {
        return Ok(RateConversion::default());
    }

    let annual = effective_annual(input)?;

    let monthly = match input.compounding {
        Compounding::Annual => annual / dec!(12),
        Compounding::Daily => fractional_compound(annual, 30, DAYS_PER_YEAR)?,
        _ => fractional_compound(annual, 1, 12)?,
    };
    let daily = match input.compounding {
        Compounding::Annual => annual / Decimal::from(DAYS_PER_YEAR),
        Compounding::Monthly => fractional_compound(annual, 1, 360)?,
        _ => fractional_compound(annual, 1, DAYS_PER_YEAR)?,
    };
    let income = annual / Decimal::from(DAYS_PER_YEAR) * UNITS_PER_INCOME_QUOTE;

    let cpi = input.cpi_percent / Decimal::ONE_HUNDRED;
    let real = if cpi.is_zero() {
        annual
    } else {
        (Decimal::ONE + annual)
            .checked_div(Decimal::ONE + cpi)
            .map(|v| v - Decimal::ONE)
            .ok_or_else(|| {
                CalculatorError::Calculation(format!(
                    "inflation of {}% cannot deflate a rate",
                    input.cpi_percent
                ))
            })?
    };

    debug!(
        "Converted {} {} ({} compounding) to effective annual {}",
        input.value,
        input.kind.as_str(),
        input.compounding.as_str(),
        annual
    );

    Ok(RateConversion {
        effective_annual: percent(annual, RATE_SCALE),
        monthly: percent(monthly, RATE_SCALE),
        daily: percent(daily, DAILY_RATE_SCALE),
        seven_day_yield: percent(annual, RATE_SCALE),
        income_per_ten_thousand: round_half_up(income, RATE_SCALE),
        real_annual: percent(real, RATE_SCALE),
    })
}
