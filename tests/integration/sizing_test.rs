//! Sizing and adjustment properties through the public API

use risk_keys::market::{Quote, SymbolSpec};
use risk_keys::risk::{
    normalize_volume, Direction, EntryMode, OpenPosition, PositionAdjuster, ProtectionAction,
    Rejection, RiskOrderCalculator, SizingRequest,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn symbol(pip_value: Decimal) -> SymbolSpec {
    SymbolSpec {
        name: "EURUSD".to_string(),
        pip_size: dec!(0.0001),
        pip_value,
        min_volume: dec!(1000),
        volume_step: dec!(1000),
    }
}

fn request(balance: Decimal, risk: Decimal, margin: Decimal, stop: Decimal, price: Decimal) -> SizingRequest {
    SizingRequest {
        account_balance: balance,
        risk_percent: risk,
        margin_percent: margin,
        stop_price: stop,
        symbol: symbol(dec!(10)),
        entry: EntryMode::Market(Quote::new(price, price)),
    }
}

#[test]
fn test_worked_example() {
    let calc = RiskOrderCalculator::default();
    let result = calc
        .compute(&request(dec!(10000), dec!(2), dec!(0), dec!(1.1000), dec!(1.1050)))
        .unwrap();

    assert_eq!(result.direction, Direction::Buy);
    assert_eq!(result.stop_distance_pips, dec!(50));
    assert_eq!(result.risk_amount, dec!(200));
    assert_eq!(result.raw_volume, dec!(0.4));
    assert_eq!(result.volume, dec!(1000));
}

#[test]
fn test_margin_at_or_above_risk_always_rejected() {
    let calc = RiskOrderCalculator::default();
    for (risk, margin) in [(dec!(2), dec!(2)), (dec!(1), dec!(3)), (dec!(0), dec!(0))] {
        for stop in [dec!(1.1050), dec!(1.0000), dec!(1.2000)] {
            let err = calc
                .compute(&request(dec!(10000), risk, margin, stop, dec!(1.1050)))
                .unwrap_err();
            assert!(matches!(err, Rejection::MarginExceedsRisk { .. }));
        }
    }
}

#[test]
fn test_sub_hundredth_pip_stop_always_rejected() {
    let calc = RiskOrderCalculator::default();
    for offset in [dec!(0), dec!(0.0000001), dec!(-0.0000009)] {
        let err = calc
            .compute(&request(dec!(10000), dec!(2), dec!(0), dec!(1.1050) + offset, dec!(1.1050)))
            .unwrap_err();
        assert!(matches!(err, Rejection::StopTooClose { .. }));
    }
}

#[test]
fn test_half_close_examples() {
    let adjuster = PositionAdjuster::new();
    assert_eq!(
        adjuster.half_close_volume(dec!(100000), dec!(1000), dec!(1000)),
        Ok(dec!(50000))
    );
    assert!(matches!(
        adjuster.half_close_volume(dec!(1500), dec!(1000), dec!(1000)),
        Err(Rejection::BelowMinimum { .. })
    ));
}

#[test]
fn test_shared_rounding_rule() {
    // Both call sites round down through the same step function
    assert_eq!(normalize_volume(dec!(750), dec!(1000)), Ok(dec!(0)));
    assert_eq!(normalize_volume(dec!(50000), dec!(1000)), Ok(dec!(50000)));

    // Both reject a step they cannot round to
    let adjuster = PositionAdjuster::new();
    assert_eq!(
        adjuster.half_close_volume(dec!(1500), dec!(100), dec!(0)),
        Err(Rejection::InvalidParameter("volume_step"))
    );
    let mut sizing = request(dec!(10000), dec!(2), dec!(0), dec!(1.1000), dec!(1.1050));
    sizing.symbol.volume_step = dec!(0);
    assert_eq!(
        RiskOrderCalculator::default().compute(&sizing).unwrap_err(),
        Rejection::InvalidParameter("volume_step")
    );
}

#[test]
fn test_break_even_example() {
    let adjuster = PositionAdjuster::new();
    let position = OpenPosition {
        id: Uuid::new_v4(),
        label: "RiskEntry".to_string(),
        symbol: "EURUSD".to_string(),
        direction: Direction::Buy,
        entry_price: dec!(1.1000),
        stop_loss: Some(dec!(1.0950)),
        take_profit: Some(dec!(1.1100)),
        volume: dec!(10000),
    };

    let adverse = adjuster.break_even_adjustment(&position, dec!(1.0990));
    assert_eq!(adverse.action, ProtectionAction::TargetToEntry);
    assert_eq!(adverse.stop_loss, Some(dec!(1.0950)));
    assert_eq!(adverse.take_profit, Some(dec!(1.1000)));

    let favorable = adjuster.break_even_adjustment(&position, dec!(1.1010));
    assert_eq!(favorable.action, ProtectionAction::StopToEntry);
    assert_eq!(favorable.stop_loss, Some(dec!(1.1000)));
    assert_eq!(favorable.take_profit, Some(dec!(1.1100)));
}
