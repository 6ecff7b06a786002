//! Desk metrics
//!
//! Counters and gauges are emitted through the `metrics` facade; whichever
//! recorder the host installs receives them.

use crate::desk::CommandId;

/// How a command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Order placed or position modified
    Executed,
    /// Refused by validation before reaching the engine
    Rejected,
    /// The engine refused the request
    Failed,
}

impl CommandOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandOutcome::Executed => "executed",
            CommandOutcome::Rejected => "rejected",
            CommandOutcome::Failed => "failed",
        }
    }
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Account balance
    Balance,
    /// Open position count
    OpenPositions,
    /// Pending limit order count
    PendingOrders,
}

/// Count a handled command
pub fn record_command(command: CommandId, outcome: CommandOutcome) {
    ::metrics::counter!(
        "riskkeys_commands_total",
        "command" => command.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);

    tracing::debug!(
        metric = "riskkeys_commands_total",
        command = command.as_str(),
        outcome = outcome.as_str(),
        "Recording command"
    );
}

/// Count a validation rejection by reason code
pub fn record_rejection(reason: &'static str) {
    ::metrics::counter!("riskkeys_rejections_total", "reason" => reason).increment(1);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = match metric {
        GaugeMetric::Balance => "riskkeys_balance",
        GaugeMetric::OpenPositions => "riskkeys_open_positions",
        GaugeMetric::PendingOrders => "riskkeys_pending_orders",
    };

    ::metrics::gauge!(metric_name).set(value);
    tracing::trace!(metric = metric_name, value = value, "Setting gauge");
}
