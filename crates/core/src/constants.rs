/// Decimal places kept for intermediate ratios
pub const CALCULATION_SCALE: u32 = 8;

/// Decimal places for money amounts in results
pub const DISPLAY_SCALE: u32 = 2;

/// Decimal places for percentages in results
pub const PERCENT_SCALE: u32 = 2;

/// Largest scale a display setting may request
pub const MAX_DISPLAY_SCALE: u32 = CALCULATION_SCALE;

/// Currency unit used when no setting overrides it
pub const DEFAULT_CURRENCY_UNIT: &str = "CNY";
