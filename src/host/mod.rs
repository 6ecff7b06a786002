//! Host capabilities
//!
//! The desk never talks to a charting platform directly. Everything it
//! reads from the outside world comes through these traits: drawn lines,
//! quotes and instrument metadata, and the account balance. Order routing
//! lives in [`crate::execution`].

mod chart;
mod market;

pub use chart::ChartLines;
pub use market::PaperMarket;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::market::{Quote, SymbolSpec};

/// Resolves named price levels drawn on the chart
#[cfg_attr(test, mockall::automock)]
pub trait PriceLevelSource: Send + Sync {
    /// Price of the first horizontal line labelled `label`
    fn find_line(&self, label: &str) -> Option<Decimal>;
}

/// Live market data for the traded instrument
#[cfg_attr(test, mockall::automock)]
pub trait MarketSource: Send + Sync {
    /// Current bid/ask
    fn quote(&self) -> anyhow::Result<Quote>;
    /// Instrument metadata
    fn symbol(&self) -> &SymbolSpec;
}

/// Trading account
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// Current balance in account currency
    async fn balance(&self) -> anyhow::Result<Decimal>;
}
