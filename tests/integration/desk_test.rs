//! End-to-end desk tests against the paper engine

use risk_keys::cli::{run_session, SessionStep};
use risk_keys::config::Config;
use risk_keys::desk::{CommandError, CommandId, CommandReport, CommandTable, Desk};
use risk_keys::execution::{ExecutionEngine, FillKind, PaperEngine};
use risk_keys::host::{AccountSource, ChartLines, PaperMarket};
use risk_keys::market::Quote;
use risk_keys::risk::{Direction, ProtectionAction};
use rust_decimal_macros::dec;

fn config() -> Config {
    Config::from_toml(include_str!("../../config.toml.example")).unwrap()
}

#[tokio::test]
async fn test_full_trade_lifecycle() {
    let config = config();
    let table = CommandTable::new(&config.risk);
    let engine = PaperEngine::new(config.symbol.clone(), config.paper.initial_balance);
    let mut market = PaperMarket::new(config.symbol.clone());
    let mut chart = ChartLines::new();

    let quote = Quote::new(dec!(1.1048), dec!(1.1050));
    market.set_quote(quote);
    engine.on_quote(quote).await;
    chart.draw("SL", dec!(1.1000));

    {
        let desk = Desk::new(&config.risk, &chart, &market, &engine, &engine);
        let report = table.dispatch(CommandId::Enter, &desk).await.unwrap();
        let CommandReport::Entered { sizing, .. } = report else {
            panic!("expected entry");
        };
        assert_eq!(sizing.direction, Direction::Buy);
        assert_eq!(sizing.volume, dec!(40000));
    }

    let quote = Quote::new(dec!(1.1080), dec!(1.1082));
    market.set_quote(quote);
    engine.on_quote(quote).await;

    {
        let desk = Desk::new(&config.risk, &chart, &market, &engine, &engine);
        table.dispatch(CommandId::Half, &desk).await.unwrap();
        let report = table.dispatch(CommandId::BreakEven, &desk).await.unwrap();
        let CommandReport::Protected { update, .. } = report else {
            panic!("expected modification");
        };
        assert_eq!(update.action, ProtectionAction::StopToEntry);
    }

    // 30 pips on 20000 units at 0.0001 per pip
    assert_eq!(engine.balance().await.unwrap(), dec!(10060));

    // Price returns to entry and the break-even stop closes the rest flat
    let fills = engine.on_quote(Quote::new(dec!(1.1050), dec!(1.1052))).await;
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].kind, FillKind::StopLoss);
    assert_eq!(fills[0].realized_pnl, dec!(0));
    assert!(engine.find_position("RiskEntry", "EURUSD").await.unwrap().is_none());

    let desk = Desk::new(&config.risk, &chart, &market, &engine, &engine);
    let err = table.dispatch(CommandId::BreakEven, &desk).await.unwrap_err();
    assert!(matches!(err, CommandError::NoOpenPosition { .. }));
}

#[tokio::test]
async fn test_session_runs_script() {
    let steps = vec![
        "quote 1.1050 1.1052",
        "line ENTRY 1.1000",
        "line SL 1.0950",
        "click LIMIT",
        "quote 1.0998 1.1000",
        "status",
        "click HALF",
        "click BE",
        "erase SL",
        "click ENTER",
    ]
    .into_iter()
    .map(|line| line.parse::<SessionStep>().unwrap())
    .collect();

    let outcome = run_session(&config(), steps).await.unwrap();

    // Limit filled at 1.1000, half closed 2 pips down at the bid
    assert!(outcome.pending.is_empty());
    assert_eq!(outcome.balance, dec!(9996));
    assert_eq!(outcome.fills.len(), 2);
    assert_eq!(outcome.fills[0].kind, FillKind::Open);
    assert_eq!(outcome.fills[1].kind, FillKind::Close);
    assert_eq!(outcome.fills[1].realized_pnl, dec!(-4));

    // Price below entry, so BE pulled the target in; ENTER without SL did nothing
    assert_eq!(outcome.positions.len(), 1);
    let position = &outcome.positions[0];
    assert_eq!(position.direction, Direction::Buy);
    assert_eq!(position.volume, dec!(20000));
    assert_eq!(position.stop_loss, Some(dec!(1.0950)));
    assert_eq!(position.take_profit, Some(dec!(1.1000)));
}
