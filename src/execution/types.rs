//! Execution types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::risk::{Direction, OpenPosition};

/// Order identifier
pub type OrderId = Uuid;

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// Market order (immediate execution)
    Market,
    /// Limit order resting at `price`
    Limit { price: Decimal },
}

/// An order to be submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Symbol name
    pub symbol: String,
    /// Trade direction
    pub direction: Direction,
    /// Volume in units
    pub volume: Decimal,
    /// Label the resulting position is tagged with
    pub label: String,
    /// Order type
    pub order_type: OrderType,
    /// Stop-loss distance from the fill price, in pips
    pub stop_loss_pips: Option<Decimal>,
    /// Take-profit distance from the fill price, in pips
    pub take_profit_pips: Option<Decimal>,
}

/// A limit order waiting for the market to reach it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingOrder {
    /// Order ID
    pub id: OrderId,
    /// Submitted order
    pub order: Order,
    /// Limit price
    pub price: Decimal,
    /// Submission timestamp
    pub created_at: DateTime<Utc>,
}

/// What the engine did with a submitted order
#[derive(Debug, Clone)]
pub enum OrderTicket {
    /// Filled, position opened
    Filled(OpenPosition),
    /// Accepted as a pending order
    Pending(PendingOrder),
}

/// Why a fill happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillKind {
    /// Position opened
    Open,
    /// Volume closed on request
    Close,
    /// Stop-loss touched
    StopLoss,
    /// Take-profit touched
    TakeProfit,
}

/// A fill (executed trade)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fill {
    /// Order ID, for fills that came from an order
    pub order_id: Option<OrderId>,
    /// Position affected
    pub position_id: Uuid,
    /// Symbol name
    pub symbol: String,
    /// Direction of the position
    pub direction: Direction,
    /// Fill price
    pub price: Decimal,
    /// Fill volume
    pub volume: Decimal,
    /// Fill kind
    pub kind: FillKind,
    /// Realized P&L, zero for opening fills
    pub realized_pnl: Decimal,
    /// Fill timestamp
    pub timestamp: DateTime<Utc>,
}
