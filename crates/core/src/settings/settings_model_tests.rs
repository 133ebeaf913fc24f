use super::*;
use crate::errors::Error;
use rust_decimal_macros::dec;
use std::io::Write;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.currency_unit, "CNY");
    assert_eq!(settings.money_scale, 2);
    assert_eq!(settings.percent_scale, 2);
    assert_eq!(settings.default_nominal_total, dec!(100000));
    assert!(settings.validate().is_ok());
}

#[test]
fn test_from_json_fills_missing_keys() {
    let settings = Settings::from_json_str(r#"{"currencyUnit":"USD"}"#).unwrap();
    assert_eq!(settings.currency_unit, "USD");
    assert_eq!(settings.money_scale, 2);
    assert_eq!(settings.default_nominal_total, dec!(100000));
}

#[test]
fn test_from_json_reads_decimal_strings() {
    let settings =
        Settings::from_json_str(r#"{"defaultNominalTotal":"250000.50","percentScale":4}"#)
            .unwrap();
    assert_eq!(settings.default_nominal_total, dec!(250000.50));
    assert_eq!(settings.percent_scale, 4);
}

#[test]
fn test_from_json_rejects_large_scale() {
    let err = Settings::from_json_str(r#"{"moneyScale":12}"#).unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue(_)));
}

#[test]
fn test_from_json_rejects_malformed_document() {
    let err = Settings::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, Error::InvalidConfigValue(_)));
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("absent.json")).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_load_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"currencyUnit":"EUR","moneyScale":3}}"#).unwrap();
    let settings = Settings::load(file.path()).unwrap();
    assert_eq!(settings.currency_unit, "EUR");
    assert_eq!(settings.money_scale, 3);
}

#[test]
fn test_apply_update() {
    let update = SettingsUpdate {
        currency_unit: Some(" USD ".to_string()),
        default_nominal_total: Some(dec!(5000)),
        ..Default::default()
    };
    let settings = Settings::default().apply(&update).unwrap();
    assert_eq!(settings.currency_unit, "USD");
    assert_eq!(settings.default_nominal_total, dec!(5000));
    assert_eq!(settings.money_scale, 2);
}

#[test]
fn test_apply_rejects_empty_unit() {
    let update = SettingsUpdate {
        currency_unit: Some("  ".to_string()),
        ..Default::default()
    };
    assert!(Settings::default().apply(&update).is_err());
}

#[test]
fn test_apply_rejects_negative_nominal_total() {
    let update = SettingsUpdate {
        default_nominal_total: Some(dec!(-1)),
        ..Default::default()
    };
    assert!(Settings::default().apply(&update).is_err());
}
