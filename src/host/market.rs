//! Simulated market data source

use anyhow::anyhow;

use super::MarketSource;
use crate::market::{Quote, SymbolSpec};

/// Quote holder driven by the paper session
#[derive(Debug, Clone)]
pub struct PaperMarket {
    symbol: SymbolSpec,
    quote: Option<Quote>,
}

impl PaperMarket {
    pub fn new(symbol: SymbolSpec) -> Self {
        Self {
            symbol,
            quote: None,
        }
    }

    /// Replace the current quote
    pub fn set_quote(&mut self, quote: Quote) {
        self.quote = Some(quote);
    }
}

impl MarketSource for PaperMarket {
    fn quote(&self) -> anyhow::Result<Quote> {
        self.quote
            .ok_or_else(|| anyhow!("no quote received for {}", self.symbol.name))
    }

    fn symbol(&self) -> &SymbolSpec {
        &self.symbol
    }
}
