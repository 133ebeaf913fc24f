use super::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn input() -> CostAverageInput {
    CostAverageInput {
        first_price: dec!(10),
        first_quantity: dec!(1000),
        rebuy_price: dec!(8),
        rebuy_quantity: dec!(1000),
        commission_per_ten_thousand: Decimal::ZERO,
        stamp_duty_percent: Decimal::ZERO,
        transfer_fee_percent: Decimal::ZERO,
    }
}

#[test]
fn test_average_without_fees() {
    let outcome = calculate_cost_average(&input()).unwrap();
    assert_eq!(outcome.total_quantity, dec!(2000));
    assert_eq!(outcome.cost_per_share, dec!(9));
    assert_eq!(outcome.current_profit, dec!(-2000));
}

#[test]
fn test_fees_raise_cost_and_deepen_loss() {
    let mut i = input();
    i.commission_per_ten_thousand = dec!(2.5);
    i.stamp_duty_percent = dec!(0.05);
    i.transfer_fee_percent = dec!(0.001);
    let outcome = calculate_cost_average(&i).unwrap();

    // buys: 18000 * (1 + 0.00025 + 0.00001) = 18004.68
    assert_eq!(outcome.cost_per_share, dec!(9.0023));
    // sell 16000: fees 16000 * 0.00076 = 12.16
    assert_eq!(outcome.current_profit, dec!(-2016.84));
}

#[test]
fn test_cost_per_share_truncates() {
    let mut i = input();
    i.first_price = dec!(10);
    i.first_quantity = dec!(100);
    i.rebuy_price = dec!(9);
    i.rebuy_quantity = dec!(200);
    // 2800 / 300 = 9.33333
    let outcome = calculate_cost_average(&i).unwrap();
    assert_eq!(outcome.cost_per_share, dec!(9.3333));
}

#[test]
fn test_non_positive_quantity_is_rejected() {
    let mut i = input();
    i.rebuy_quantity = Decimal::ZERO;
    assert!(calculate_cost_average(&i).is_err());
}
