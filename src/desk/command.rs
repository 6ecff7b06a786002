//! Command identifiers and the dispatch table

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::handlers::{BreakEven, CloseHalf, EnterLimit, EnterMarket};
use super::{CommandError, CommandReport, Desk};
use crate::config::RiskConfig;
use crate::telemetry::{record_command, record_rejection, CommandOutcome};

/// A desk button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandId {
    /// Market entry sized from the stop line
    Enter,
    /// Limit entry at the entry line, sized from the stop line
    EnterLimit,
    /// Close half of the open position
    Half,
    /// Break-even adjustment
    BreakEven,
}

impl CommandId {
    pub const ALL: [CommandId; 4] = [
        CommandId::Enter,
        CommandId::EnterLimit,
        CommandId::Half,
        CommandId::BreakEven,
    ];

    /// Metric/log label
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandId::Enter => "enter",
            CommandId::EnterLimit => "limit",
            CommandId::Half => "half",
            CommandId::BreakEven => "break_even",
        }
    }

    /// Button caption
    pub fn caption(&self) -> &'static str {
        match self {
            CommandId::Enter => "ENTER",
            CommandId::EnterLimit => "LIMIT",
            CommandId::Half => "HALF",
            CommandId::BreakEven => "BE",
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.caption())
    }
}

impl FromStr for CommandId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandId::ALL
            .into_iter()
            .find(|id| s.eq_ignore_ascii_case(id.caption()) || s.eq_ignore_ascii_case(id.as_str()))
            .ok_or_else(|| anyhow::anyhow!("unknown command {:?}", s))
    }
}

/// Handler behind one button
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Run the command to completion against `desk`
    async fn handle(&self, desk: &Desk<'_>) -> Result<CommandReport, CommandError>;
}

/// Immutable mapping from command to handler
///
/// One slot per [`CommandId`], so every button always has a handler.
pub struct CommandTable {
    enter: Box<dyn CommandHandler>,
    enter_limit: Box<dyn CommandHandler>,
    half: Box<dyn CommandHandler>,
    break_even: Box<dyn CommandHandler>,
}

impl CommandTable {
    /// Build the table with every desk command
    pub fn new(config: &RiskConfig) -> Self {
        Self {
            enter: Box::new(EnterMarket::from_config(config)),
            enter_limit: Box::new(EnterLimit::from_config(config)),
            half: Box::new(CloseHalf::new()),
            break_even: Box::new(BreakEven::new()),
        }
    }

    /// Registered commands in button order
    pub fn commands(&self) -> Vec<CommandId> {
        CommandId::ALL.to_vec()
    }

    fn handler(&self, command: CommandId) -> &dyn CommandHandler {
        match command {
            CommandId::Enter => self.enter.as_ref(),
            CommandId::EnterLimit => self.enter_limit.as_ref(),
            CommandId::Half => self.half.as_ref(),
            CommandId::BreakEven => self.break_even.as_ref(),
        }
    }

    /// Run `command` against `desk`, logging and counting the outcome
    pub async fn dispatch(
        &self,
        command: CommandId,
        desk: &Desk<'_>,
    ) -> Result<CommandReport, CommandError> {
        let handler = self.handler(command);

        let result = handler.handle(desk).await;
        match &result {
            Ok(report) => {
                info!(%command, report = %report, "Command executed");
                record_command(command, CommandOutcome::Executed);
            }
            Err(CommandError::Rejected(rejection)) => {
                warn!(%command, reason = rejection.code(), "Command rejected: {}", rejection);
                record_rejection(rejection.code());
                record_command(command, CommandOutcome::Rejected);
            }
            Err(err) if err.is_operator_error() => {
                warn!(%command, "Command rejected: {}", err);
                record_command(command, CommandOutcome::Rejected);
            }
            Err(err) => {
                error!(%command, "Command failed: {}", err);
                record_command(command, CommandOutcome::Failed);
            }
        }
        result
    }
}
