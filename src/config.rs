//! Configuration types for risk-keys

use anyhow::bail;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::market::SymbolSpec;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub risk: RiskConfig,
    pub symbol: SymbolSpec,
    #[serde(default)]
    pub paper: PaperConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Risk and chart-line settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RiskConfig {
    /// Percent of balance risked per trade
    pub risk_percent: Decimal,

    /// Percent subtracted from the risk budget
    pub margin_percent: Decimal,

    /// Label of the horizontal line marking the stop
    #[serde(default = "default_stop_line_label")]
    pub stop_line_label: String,

    /// Label of the horizontal line marking a limit entry
    #[serde(default = "default_entry_line_label")]
    pub entry_line_label: String,

    /// Label attached to positions opened by the desk
    #[serde(default = "default_position_label")]
    pub position_label: String,

    /// Stops closer than this are rejected
    #[serde(default = "default_min_stop_distance_pips")]
    pub min_stop_distance_pips: Decimal,
}

fn default_stop_line_label() -> String {
    "SL".to_string()
}
fn default_entry_line_label() -> String {
    "ENTRY".to_string()
}
fn default_position_label() -> String {
    "RiskEntry".to_string()
}
fn default_min_stop_distance_pips() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_percent: Decimal::new(2, 0),
            margin_percent: Decimal::ZERO,
            stop_line_label: default_stop_line_label(),
            entry_line_label: default_entry_line_label(),
            position_label: default_position_label(),
            min_stop_distance_pips: default_min_stop_distance_pips(),
        }
    }
}

/// Paper trading settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaperConfig {
    /// Starting balance of the simulated account
    #[serde(default = "default_initial_balance")]
    pub initial_balance: Decimal,
}

fn default_initial_balance() -> Decimal {
    Decimal::new(10000, 0)
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            initial_balance: default_initial_balance(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormatConfig,
}

/// Log output format as written in the config file
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatConfig {
    #[default]
    Pretty,
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormatConfig::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the sizing core cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.risk.risk_percent <= Decimal::ZERO {
            bail!("risk.risk_percent must be positive");
        }
        if self.risk.margin_percent < Decimal::ZERO {
            bail!("risk.margin_percent must not be negative");
        }
        if self.risk.min_stop_distance_pips < Decimal::ZERO {
            bail!("risk.min_stop_distance_pips must not be negative");
        }
        if self.symbol.pip_size <= Decimal::ZERO {
            bail!("symbol.pip_size must be positive");
        }
        if self.symbol.pip_value <= Decimal::ZERO {
            bail!("symbol.pip_value must be positive");
        }
        if self.symbol.volume_step <= Decimal::ZERO {
            bail!("symbol.volume_step must be positive");
        }
        if self.symbol.min_volume < Decimal::ZERO {
            bail!("symbol.min_volume must not be negative");
        }
        if self.paper.initial_balance <= Decimal::ZERO {
            bail!("paper.initial_balance must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const MINIMAL: &str = r#"
        [risk]
        risk_percent = 2
        margin_percent = 0

        [symbol]
        name = "EURUSD"
        pip_size = 0.0001
        pip_value = 0.0001
        min_volume = 1000
        volume_step = 1000
    "#;

    #[test]
    fn test_config_deserialize_with_defaults() {
        let config = Config::from_toml(MINIMAL).unwrap();

        assert_eq!(config.risk.risk_percent, dec!(2));
        assert_eq!(config.risk.stop_line_label, "SL");
        assert_eq!(config.risk.entry_line_label, "ENTRY");
        assert_eq!(config.risk.position_label, "RiskEntry");
        assert_eq!(config.risk.min_stop_distance_pips, dec!(0.01));
        assert_eq!(config.symbol.name, "EURUSD");
        assert_eq!(config.symbol.pip_size, dec!(0.0001));
        assert_eq!(config.paper.initial_balance, dec!(10000));
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.log_format, LogFormatConfig::Pretty);
    }

    #[test]
    fn test_config_full() {
        let toml = r#"
            [risk]
            risk_percent = 1.5
            margin_percent = 0.25
            stop_line_label = "STOP"
            entry_line_label = "IN"
            position_label = "Desk"
            min_stop_distance_pips = 0.5

            [symbol]
            name = "GBPJPY"
            pip_size = 0.01
            pip_value = 0.0067
            min_volume = 1000
            volume_step = 100

            [paper]
            initial_balance = 2500

            [telemetry]
            log_level = "debug"
            log_format = "json"
        "#;

        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.risk.margin_percent, dec!(0.25));
        assert_eq!(config.risk.stop_line_label, "STOP");
        assert_eq!(config.symbol.volume_step, dec!(100));
        assert_eq!(config.paper.initial_balance, dec!(2500));
        assert_eq!(config.telemetry.log_format, LogFormatConfig::Json);
    }

    #[test]
    fn test_config_rejects_zero_pip_size() {
        let toml = MINIMAL.replace("pip_size = 0.0001", "pip_size = 0");
        let err = Config::from_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("pip_size"));
    }

    #[test]
    fn test_config_rejects_negative_margin() {
        let toml = MINIMAL.replace("margin_percent = 0", "margin_percent = -1");
        assert!(Config::from_toml(&toml).is_err());
    }

    #[test]
    fn test_config_missing_symbol() {
        let toml = r#"
            [risk]
            risk_percent = 2
            margin_percent = 0
        "#;
        assert!(Config::from_toml(toml).is_err());
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, MINIMAL).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.symbol.min_volume, dec!(1000));
    }

    #[test]
    fn test_risk_config_default() {
        let config = RiskConfig::default();
        assert_eq!(config.risk_percent, dec!(2));
        assert_eq!(config.margin_percent, dec!(0));
        assert_eq!(config.stop_line_label, "SL");
    }
}
