//! Risk core types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::market::{Quote, SymbolSpec};

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Long
    Buy,
    /// Short
    Sell,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Buy => Direction::Sell,
            Direction::Sell => Direction::Buy,
        }
    }

    /// Whether `price` is on the losing side of `reference` for this direction
    pub fn is_adverse(&self, price: Decimal, reference: Decimal) -> bool {
        match self {
            Direction::Buy => price < reference,
            Direction::Sell => price > reference,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Buy => write!(f, "Buy"),
            Direction::Sell => write!(f, "Sell"),
        }
    }
}

/// What a drawn price level stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelRole {
    /// Protective stop
    StopLoss,
    /// Fixed entry for limit orders
    Entry,
}

/// A price level read from the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Decimal,
    pub role: LevelRole,
}

impl PriceLevel {
    pub fn new(price: Decimal, role: LevelRole) -> Self {
        Self { price, role }
    }
}

/// Where the entry price of a sized order comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryMode {
    /// Enter now at the live quote
    Market(Quote),
    /// Enter at a fixed price; the quote only decides the direction
    Limit { entry_price: Decimal, quote: Quote },
}

/// Inputs to the risk-based order sizing calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingRequest {
    /// Current account balance
    pub account_balance: Decimal,
    /// Percent of balance to risk, e.g. 2 = 2%
    pub risk_percent: Decimal,
    /// Percent held back from the risk budget
    pub margin_percent: Decimal,
    /// Stop-loss price
    pub stop_price: Decimal,
    /// Instrument metadata
    pub symbol: SymbolSpec,
    /// Entry source
    pub entry: EntryMode,
}

impl SizingRequest {
    /// Risk percent left after the margin is taken out
    pub fn adjusted_risk_percent(&self) -> Decimal {
        self.risk_percent - self.margin_percent
    }

    pub fn is_limit_order(&self) -> bool {
        matches!(self.entry, EntryMode::Limit { .. })
    }
}

/// Order instruction produced by the calculator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingResult {
    /// Trade direction
    pub direction: Direction,
    /// Entry price the distance was measured from
    pub entry_price: Decimal,
    /// Stop-loss price
    pub stop_price: Decimal,
    /// Stop distance in pips, passed to the order as stop-loss distance
    pub stop_distance_pips: Decimal,
    /// Risk percent actually used
    pub adjusted_risk_percent: Decimal,
    /// Money at risk before volume rounding
    pub risk_amount: Decimal,
    /// Volume before broker normalization
    pub raw_volume: Decimal,
    /// Volume to submit
    pub volume: Decimal,
    /// Set when the rounded volume was raised to the broker minimum
    pub promoted_to_minimum: bool,
}

/// Validation rejections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Margin swallows the whole risk budget
    #[error("margin {margin_percent}% leaves no risk budget out of {risk_percent}%")]
    MarginExceedsRisk {
        risk_percent: Decimal,
        margin_percent: Decimal,
    },
    /// Stop too close to the entry price
    #[error("stop is {distance_pips} pips from entry, below the {min_pips} pip minimum")]
    StopTooClose {
        distance_pips: Decimal,
        min_pips: Decimal,
    },
    /// Stop on the wrong side of a limit entry
    #[error("stop {stop_price} is on the wrong side of the {direction} entry at {entry_price}")]
    InvalidStopSide {
        direction: Direction,
        entry_price: Decimal,
        stop_price: Decimal,
    },
    /// Resulting volume below what the venue accepts
    #[error("volume {volume} is below the minimum {min_volume}")]
    BelowMinimum { volume: Decimal, min_volume: Decimal },
    /// A request field that must be strictly positive is not
    #[error("invalid {0}: must be positive")]
    InvalidParameter(&'static str),
    /// Bid above ask
    #[error("crossed quote: bid {bid} above ask {ask}")]
    CrossedQuote { bid: Decimal, ask: Decimal },
    /// An intermediate value does not fit in a Decimal
    #[error("{0} is outside the representable range")]
    OutOfRange(&'static str),
}

impl Rejection {
    /// Stable reason code for logs and metrics
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::MarginExceedsRisk { .. } => "margin_exceeds_risk",
            Rejection::StopTooClose { .. } => "stop_too_close",
            Rejection::InvalidStopSide { .. } => "invalid_stop_side",
            Rejection::BelowMinimum { .. } => "below_minimum",
            Rejection::InvalidParameter(_) => "invalid_parameter",
            Rejection::CrossedQuote { .. } => "crossed_quote",
            Rejection::OutOfRange(_) => "out_of_range",
        }
    }
}
