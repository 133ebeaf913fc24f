use super::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn position(side: PositionSide, leverage: Decimal, exit_price: Decimal) -> FuturesPosition {
    FuturesPosition {
        contract_size: dec!(10),
        quantity: dec!(2),
        leverage,
        entry_price: dec!(100),
        exit_price,
        side,
    }
}

#[test]
fn test_long_position_profit() {
    let outcome = calculate_futures(&position(PositionSide::Long, dec!(10), dec!(105)));
    assert_eq!(outcome.margin, dec!(200));
    assert_eq!(outcome.profit, dec!(100));
    assert_eq!(outcome.roi_percent, dec!(50));
}

#[test]
fn test_short_position_loses_when_price_rises() {
    let outcome = calculate_futures(&position(PositionSide::Short, dec!(10), dec!(105)));
    assert_eq!(outcome.profit, dec!(-100));
    assert_eq!(outcome.roi_percent, dec!(-50));
}

#[test]
fn test_zero_leverage_means_unleveraged() {
    let outcome = calculate_futures(&position(PositionSide::Long, Decimal::ZERO, dec!(101)));
    assert_eq!(outcome.margin, dec!(2000));
    assert_eq!(outcome.profit, dec!(20));
    assert_eq!(outcome.roi_percent, dec!(1));
}

#[test]
fn test_roi_rounds_through_four_digits() {
    let p = FuturesPosition {
        contract_size: dec!(1),
        quantity: dec!(3),
        leverage: dec!(1),
        entry_price: dec!(1),
        exit_price: dec!(2),
        side: PositionSide::Long,
    };
    // margin 3, profit 3
    assert_eq!(calculate_futures(&p).roi_percent, dec!(100));

    let p = FuturesPosition {
        contract_size: dec!(1),
        quantity: dec!(1),
        leverage: dec!(1),
        entry_price: dec!(3),
        exit_price: dec!(4),
        side: PositionSide::Long,
    };
    // 1 / 3 = 0.3333 -> 33.33
    assert_eq!(calculate_futures(&p).roi_percent, dec!(33.33));
}

#[test]
fn test_zero_margin_gives_zero_roi() {
    let mut p = position(PositionSide::Long, dec!(5), dec!(110));
    p.entry_price = Decimal::ZERO;
    let outcome = calculate_futures(&p);
    assert_eq!(outcome.margin, Decimal::ZERO);
    assert_eq!(outcome.roi_percent, Decimal::ZERO);
}
