//! Display settings shared by every calculator.
//!
//! Settings are an explicit value handed to whoever renders results. Nothing in
//! this crate reads them from global state.

use std::path::Path;

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CURRENCY_UNIT, DISPLAY_SCALE, MAX_DISPLAY_SCALE, PERCENT_SCALE};
use crate::errors::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Unit appended to money amounts, e.g. "CNY".
    pub currency_unit: String,
    pub money_scale: u32,
    pub percent_scale: u32,
    /// Portfolio size used for the initial allocation when no holdings are given.
    pub default_nominal_total: Decimal,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_unit: DEFAULT_CURRENCY_UNIT.to_string(),
            money_scale: DISPLAY_SCALE,
            percent_scale: PERCENT_SCALE,
            default_nominal_total: dec!(100000),
        }
    }
}

/// Partial update. `None` keeps the current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub currency_unit: Option<String>,
    pub money_scale: Option<u32>,
    pub percent_scale: Option<u32>,
    pub default_nominal_total: Option<Decimal>,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.currency_unit.trim().is_empty() {
            return Err(Error::InvalidConfigValue(
                "currencyUnit cannot be empty".to_string(),
            ));
        }
        for (name, scale) in [
            ("moneyScale", self.money_scale),
            ("percentScale", self.percent_scale),
        ] {
            if scale > MAX_DISPLAY_SCALE {
                return Err(Error::InvalidConfigValue(format!(
                    "{} must be at most {}, got {}",
                    name, MAX_DISPLAY_SCALE, scale
                )));
            }
        }
        if self.default_nominal_total.is_sign_negative() {
            return Err(Error::InvalidConfigValue(format!(
                "defaultNominalTotal must not be negative, got {}",
                self.default_nominal_total
            )));
        }
        Ok(())
    }

    /// Parses settings from JSON. Missing keys take their default value.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(
                "Settings file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Returns a copy with `update` applied, validated.
    pub fn apply(&self, update: &SettingsUpdate) -> Result<Self> {
        let mut next = self.clone();
        if let Some(unit) = &update.currency_unit {
            next.currency_unit = unit.trim().to_string();
        }
        if let Some(scale) = update.money_scale {
            next.money_scale = scale;
        }
        if let Some(scale) = update.percent_scale {
            next.percent_scale = scale;
        }
        if let Some(total) = update.default_nominal_total {
            next.default_nominal_total = total;
        }
        next.validate()?;
        Ok(next)
    }
}
