//! Household financial volatility index.
//!
//! Twelve months of income and expense are reduced to a single score `E` in
//! (0, 0.47]. Higher is steadier. The savings coefficient `S` maps `E` onto a
//! spend/save recommendation: positive favours saving, negative spending.

use log::debug;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::{CalculatorError, Result, ValidationError};
use crate::utils::decimal_utils::round_half_up;

pub const MONTHS_PER_YEAR: usize = 12;

const INDEX_CEILING: Decimal = dec!(0.47);
const INDEX_FLOOR: Decimal = dec!(0.425);
const INDEX_SCALE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolatilityTier {
    VeryStrong,
    Strong,
    Normal,
    SlightlyWeak,
    Weak,
    Crisis,
}

impl VolatilityTier {
    pub fn from_index(index: Decimal) -> Self {
        if index >= dec!(0.465) {
            VolatilityTier::VeryStrong
        } else if index >= dec!(0.455) {
            VolatilityTier::Strong
        } else if index >= dec!(0.445) {
            VolatilityTier::Normal
        } else if index >= dec!(0.435) {
            VolatilityTier::SlightlyWeak
        } else if index >= INDEX_FLOOR {
            VolatilityTier::Weak
        } else {
            VolatilityTier::Crisis
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VolatilityTier::VeryStrong => "Very strong",
            VolatilityTier::Strong => "Strong",
            VolatilityTier::Normal => "Normal",
            VolatilityTier::SlightlyWeak => "Slightly weak",
            VolatilityTier::Weak => "Weak",
            VolatilityTier::Crisis => "Crisis",
        }
    }
}

impl std::fmt::Display for VolatilityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCashFlow {
    pub income: Decimal,
    pub expense: Decimal,
    /// Defaults to `income - expense`.
    #[serde(default)]
    pub savings: Option<Decimal>,
}

impl MonthlyCashFlow {
    pub fn new(income: Decimal, expense: Decimal) -> Self {
        Self {
            income,
            expense,
            savings: None,
        }
    }

    pub fn savings(&self) -> Decimal {
        self.savings.unwrap_or(self.income - self.expense)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolatilityReport {
    /// Iv
    pub income_volatility: Decimal,
    /// Cv
    pub expense_volatility: Decimal,
    /// Sb
    pub savings_buffer: Decimal,
    /// E
    pub index: Decimal,
    /// S
    pub savings_coefficient: Decimal,
    pub tier: VolatilityTier,
}

fn mean(values: &[Decimal]) -> Decimal {
    values.iter().copied().sum::<Decimal>() / Decimal::from(values.len())
}

/// Population standard deviation over the mean. Zero when the mean is not positive.
fn coefficient_of_variation(values: &[Decimal]) -> Result<Decimal> {
    let mu = mean(values);
    if mu <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let variance = values
        .iter()
        .map(|v| (*v - mu) * (*v - mu))
        .sum::<Decimal>()
        / Decimal::from(values.len());
    let sigma = variance.sqrt().ok_or_else(|| {
        CalculatorError::Calculation(format!("cannot take the square root of {}", variance))
    })?;
    Ok(sigma / mu)
}

/// Scores twelve months of cash flow.
pub fn calculate_volatility(months: &[MonthlyCashFlow]) -> Result<VolatilityReport> {
    if months.len() != MONTHS_PER_YEAR {
        return Err(ValidationError::InvalidInput(format!(
            "volatility needs {} months of data, got {}",
            MONTHS_PER_YEAR,
            months.len()
        ))
        .into());
    }

    let incomes: Vec<Decimal> = months.iter().map(|m| m.income).collect();
    let expenses: Vec<Decimal> = months.iter().map(|m| m.expense).collect();
    let savings: Vec<Decimal> = months.iter().map(MonthlyCashFlow::savings).collect();

    let income_volatility = coefficient_of_variation(&incomes)?;
    let expense_volatility = coefficient_of_variation(&expenses)?;

    let mean_expense = mean(&expenses);
    let savings_buffer = if mean_expense > Decimal::ZERO {
        let growth = Decimal::ONE + mean(&savings).abs() / mean_expense;
        let ln = growth.checked_ln().ok_or_else(|| {
            CalculatorError::Calculation(format!("cannot take the logarithm of {}", growth))
        })?;
        Decimal::ONE + ln
    } else {
        Decimal::ONE
    };

    let index = INDEX_CEILING
        / (Decimal::ONE + (income_volatility + expense_volatility) / savings_buffer.abs());
    let savings_coefficient =
        -(dec!(2) * (index - INDEX_FLOOR) / (INDEX_CEILING - INDEX_FLOOR) - Decimal::ONE);
    let tier = VolatilityTier::from_index(index);

    debug!(
        "Volatility index {} (Iv {}, Cv {}, Sb {}): {}",
        index, income_volatility, expense_volatility, savings_buffer, tier
    );

    Ok(VolatilityReport {
        income_volatility: round_half_up(income_volatility, INDEX_SCALE),
        expense_volatility: round_half_up(expense_volatility, INDEX_SCALE),
        savings_buffer: round_half_up(savings_buffer, INDEX_SCALE),
        index: round_half_up(index, INDEX_SCALE),
        savings_coefficient: round_half_up(savings_coefficient, INDEX_SCALE),
        tier,
    })
}
