use super::decimal_utils::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_round_half_up_rounds_ties_away_from_zero() {
    assert_eq!(round_half_up(dec!(2.345), 2), dec!(2.35));
    assert_eq!(round_half_up(dec!(2.344), 2), dec!(2.34));
    assert_eq!(round_half_up(dec!(-2.345), 2), dec!(-2.35));
    // Banker's rounding would give 0.12 here
    assert_eq!(round_half_up(dec!(0.125), 2), dec!(0.13));
}

#[test]
fn test_truncate_drops_extra_digits() {
    assert_eq!(truncate(dec!(1.999), 2), dec!(1.99));
    assert_eq!(truncate(dec!(-1.999), 2), dec!(-1.99));
}

#[test]
fn test_checked_ratio_handles_zero_denominator() {
    assert_eq!(checked_ratio(dec!(1), Decimal::ZERO, 8), None);
    assert_eq!(checked_ratio(dec!(1), dec!(3), 8), Some(dec!(0.33333333)));
    assert_eq!(checked_ratio(dec!(2), dec!(3), 8), Some(dec!(0.66666667)));
}

#[test]
fn test_to_percent() {
    assert_eq!(to_percent(dec!(0.25), 2), dec!(25.00));
    assert_eq!(to_percent(dec!(0.123456), 2), dec!(12.35));
}

#[test]
fn test_format_decimal_pads_scale() {
    assert_eq!(format_decimal(dec!(15000), 2), "15000.00");
    assert_eq!(format_decimal(dec!(0.1), 4), "0.1000");
    assert_eq!(format_decimal(dec!(1.005), 2), "1.01");
}

#[test]
fn test_parse_decimal_or_zero() {
    assert_eq!(parse_decimal_or_zero("", 2), Decimal::ZERO);
    assert_eq!(parse_decimal_or_zero("   ", 2), Decimal::ZERO);
    assert_eq!(parse_decimal_or_zero("abc", 2), Decimal::ZERO);
    assert_eq!(parse_decimal_or_zero("12.345", 2), dec!(12.35));
    assert_eq!(parse_decimal_or_zero(" 25000 ", 2), dec!(25000));
    assert_eq!(parse_decimal_or_zero("1e3", 2), dec!(1000));
}
