//! Configuration loading tests

use risk_keys::config::{Config, LogFormatConfig};
use rust_decimal_macros::dec;

#[test]
fn test_example_config_loads() {
    let config = Config::from_toml(include_str!("../../config.toml.example")).unwrap();

    assert_eq!(config.risk.risk_percent, dec!(2));
    assert_eq!(config.risk.stop_line_label, "SL");
    assert_eq!(config.symbol.name, "EURUSD");
    assert_eq!(config.symbol.volume_step, dec!(1000));
    assert_eq!(config.telemetry.log_format, LogFormatConfig::Pretty);
}

#[test]
fn test_config_file_roundtrip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("desk.toml");
    std::fs::write(
        &path,
        include_str!("../../config.toml.example").replace("risk_percent = 2", "risk_percent = 1"),
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.risk.risk_percent, dec!(1));
}
