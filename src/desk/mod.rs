//! Trading desk
//!
//! Turns button clicks into sizing, order and position calls. A [`Desk`]
//! bundles the host capabilities a click runs against; the
//! [`CommandTable`] routes each [`CommandId`] to its handler.

mod command;
mod handlers;

pub use command::{CommandHandler, CommandId, CommandTable};
pub use handlers::{BreakEven, CloseHalf, EnterLimit, EnterMarket};

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::RiskConfig;
use crate::execution::{ExecutionEngine, Fill, OrderTicket};
use crate::host::{AccountSource, MarketSource, PriceLevelSource};
use crate::market::{Quote, SymbolSpec};
use crate::risk::{
    EntryMode, LevelRole, OpenPosition, PriceLevel, ProtectionUpdate, Rejection, SizingRequest,
    SizingResult,
};

/// Why a command did not complete
#[derive(Debug, Error)]
pub enum CommandError {
    /// The line the command needs is not on the chart
    #[error("no horizontal line labelled {0:?} on the chart")]
    MissingLine(String),
    /// Sizing or adjustment validation failed
    #[error(transparent)]
    Rejected(#[from] Rejection),
    /// Nothing to act on
    #[error("no open position labelled {label:?} on {symbol}")]
    NoOpenPosition { label: String, symbol: String },
    /// The execution engine refused the request
    #[error("order failed: {0}")]
    OrderFailed(String),
    /// Quote or balance could not be read
    #[error("host data unavailable: {0}")]
    HostUnavailable(String),
}

impl CommandError {
    /// Errors the operator fixes by redrawing or re-parameterizing
    pub fn is_operator_error(&self) -> bool {
        matches!(
            self,
            CommandError::MissingLine(_)
                | CommandError::Rejected(_)
                | CommandError::NoOpenPosition { .. }
        )
    }
}

/// What a command did
#[derive(Debug, Clone)]
pub enum CommandReport {
    /// Order submitted from a sizing result
    Entered {
        sizing: SizingResult,
        ticket: OrderTicket,
    },
    /// Part of the position closed
    HalfClosed { fill: Fill },
    /// Stop/target replaced
    Protected {
        update: ProtectionUpdate,
        position: OpenPosition,
    },
}

impl fmt::Display for CommandReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandReport::Entered { sizing, ticket } => {
                let state = match ticket {
                    OrderTicket::Filled(_) => "filled",
                    OrderTicket::Pending(_) => "pending",
                };
                write!(
                    f,
                    "{} {} units, stop {} pips at {}, risk {}% ({})",
                    sizing.direction,
                    sizing.volume,
                    sizing.stop_distance_pips.round_dp(2),
                    sizing.stop_price,
                    sizing.adjusted_risk_percent,
                    state
                )
            }
            CommandReport::HalfClosed { fill } => write!(
                f,
                "closed {} units at {}, realized {}",
                fill.volume,
                fill.price,
                fill.realized_pnl.round_dp(2)
            ),
            CommandReport::Protected { update, position } => write!(
                f,
                "{:?}: stop {} target {}",
                update.action,
                fmt_level(position.stop_loss),
                fmt_level(position.take_profit)
            ),
        }
    }
}

fn fmt_level(level: Option<Decimal>) -> String {
    level.map_or_else(|| "none".to_string(), |p| p.to_string())
}

/// Host capabilities and settings a command runs against
pub struct Desk<'a> {
    pub settings: &'a RiskConfig,
    pub chart: &'a dyn PriceLevelSource,
    pub market: &'a dyn MarketSource,
    pub account: &'a dyn AccountSource,
    pub engine: &'a dyn ExecutionEngine,
}

impl<'a> Desk<'a> {
    pub fn new(
        settings: &'a RiskConfig,
        chart: &'a dyn PriceLevelSource,
        market: &'a dyn MarketSource,
        account: &'a dyn AccountSource,
        engine: &'a dyn ExecutionEngine,
    ) -> Self {
        Self {
            settings,
            chart,
            market,
            account,
            engine,
        }
    }

    pub fn symbol(&self) -> &SymbolSpec {
        self.market.symbol()
    }

    /// Resolve a labelled chart line
    pub fn resolve_level(&self, label: &str, role: LevelRole) -> Result<PriceLevel, CommandError> {
        self.chart
            .find_line(label)
            .map(|price| PriceLevel::new(price, role))
            .ok_or_else(|| CommandError::MissingLine(label.to_string()))
    }

    pub fn quote(&self) -> Result<Quote, CommandError> {
        self.market
            .quote()
            .map_err(|e| CommandError::HostUnavailable(format!("{:#}", e)))
    }

    pub async fn balance(&self) -> Result<Decimal, CommandError> {
        self.account
            .balance()
            .await
            .map_err(|e| CommandError::HostUnavailable(format!("{:#}", e)))
    }

    /// The position this desk manages
    pub async fn open_position(&self) -> Result<OpenPosition, CommandError> {
        let label = &self.settings.position_label;
        let symbol = &self.symbol().name;
        self.engine
            .find_position(label, symbol)
            .await
            .map_err(order_failed)?
            .ok_or_else(|| CommandError::NoOpenPosition {
                label: label.clone(),
                symbol: symbol.clone(),
            })
    }

    /// Sizing request from the configured risk settings
    pub fn sizing_request(&self, balance: Decimal, stop: PriceLevel, entry: EntryMode) -> SizingRequest {
        SizingRequest {
            account_balance: balance,
            risk_percent: self.settings.risk_percent,
            margin_percent: self.settings.margin_percent,
            stop_price: stop.price,
            symbol: self.symbol().clone(),
            entry,
        }
    }
}

fn order_failed(err: anyhow::Error) -> CommandError {
    CommandError::OrderFailed(format!("{:#}", err))
}
