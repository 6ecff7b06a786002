//! Execution engine module
//!
//! Order routing and the position registry (paper mode)

mod paper;
mod types;

pub use paper::PaperEngine;
pub use types::{Fill, FillKind, Order, OrderId, OrderTicket, OrderType, PendingOrder};

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::risk::OpenPosition;

/// Trait for execution engine implementations
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    /// Submit a market or limit order
    async fn submit_order(&self, order: Order) -> anyhow::Result<OrderTicket>;
    /// Cancel a pending order
    async fn cancel_order(&self, id: OrderId) -> anyhow::Result<()>;
    /// Open position with `label` on `symbol`, if any
    async fn find_position(&self, label: &str, symbol: &str) -> anyhow::Result<Option<OpenPosition>>;
    /// Close `volume` units of a position
    async fn close_position(&self, id: Uuid, volume: Decimal) -> anyhow::Result<Fill>;
    /// Replace a position's stop and target
    async fn modify_position(
        &self,
        id: Uuid,
        stop_loss: Option<Decimal>,
        take_profit: Option<Decimal>,
    ) -> anyhow::Result<OpenPosition>;
    /// Get all fills
    async fn get_fills(&self) -> anyhow::Result<Vec<Fill>>;
}
