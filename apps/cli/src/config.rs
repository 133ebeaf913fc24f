use std::path::PathBuf;

pub struct Config {
    /// JSON file holding [`permafolio_core::settings::Settings`].
    pub settings_file: Option<PathBuf>,
    /// Overrides the currency unit from the settings file.
    pub currency_unit: Option<String>,
    /// `text` or `json`.
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let settings_file = std::env::var("PERMAFOLIO_SETTINGS_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        let currency_unit = std::env::var("PERMAFOLIO_CURRENCY_UNIT")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let log_format =
            std::env::var("PERMAFOLIO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
        Self {
            settings_file,
            currency_unit,
            log_format,
        }
    }
}
