//! Paper trading execution engine

use super::{ExecutionEngine, Fill, FillKind, Order, OrderId, OrderTicket, OrderType, PendingOrder};
use crate::host::AccountSource;
use crate::market::{Quote, SymbolSpec};
use crate::risk::{Direction, OpenPosition};
use crate::telemetry::{set_gauge, GaugeMetric};
use anyhow::{anyhow, bail};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug)]
struct PaperState {
    balance: Decimal,
    last_quote: Option<Quote>,
    positions: Vec<OpenPosition>,
    pending: Vec<PendingOrder>,
    fills: Vec<Fill>,
}

/// Single-symbol paper engine with simulated fills
pub struct PaperEngine {
    symbol: SymbolSpec,
    state: RwLock<PaperState>,
}

impl PaperEngine {
    /// Create a new paper trading engine
    pub fn new(symbol: SymbolSpec, initial_balance: Decimal) -> Self {
        Self {
            symbol,
            state: RwLock::new(PaperState {
                balance: initial_balance,
                last_quote: None,
                positions: vec![],
                pending: vec![],
                fills: vec![],
            }),
        }
    }

    /// Feed a new quote
    ///
    /// Fills pending limits the quote reaches, then closes positions whose
    /// stop or target it touches. Returns the fills this produced.
    pub async fn on_quote(&self, quote: Quote) -> Vec<Fill> {
        let mut state = self.state.write().await;
        state.last_quote = Some(quote);

        let mut fills = vec![];

        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut state.pending)
            .into_iter()
            .partition(|pending| limit_reached(pending, quote));
        state.pending = waiting;
        for pending in ready {
            let (_, fill) = self.open_position(&mut state, &pending.order, pending.price, Some(pending.id));
            fills.push(fill);
        }

        let mut triggered = vec![];
        for position in &state.positions {
            let exit = quote.exit_price(position.direction);
            if let Some(kind) = protection_hit(position, exit) {
                triggered.push((position.id, exit, kind));
            }
        }
        for (id, exit, kind) in triggered {
            if let Some(fill) = self.reduce_position(&mut state, id, None, exit, kind) {
                fills.push(fill);
            }
        }

        self.publish_gauges(&state);
        fills
    }

    /// Pending limit orders
    pub async fn pending_orders(&self) -> Vec<PendingOrder> {
        self.state.read().await.pending.clone()
    }

    /// Open positions
    pub async fn positions(&self) -> Vec<OpenPosition> {
        self.state.read().await.positions.clone()
    }

    fn open_position(
        &self,
        state: &mut PaperState,
        order: &Order,
        price: Decimal,
        order_id: Option<OrderId>,
    ) -> (OpenPosition, Fill) {
        let sign = direction_sign(order.direction);
        let position = OpenPosition {
            id: Uuid::new_v4(),
            label: order.label.clone(),
            symbol: order.symbol.clone(),
            direction: order.direction,
            entry_price: price,
            stop_loss: order
                .stop_loss_pips
                .map(|pips| price - sign * self.symbol.from_pips(pips)),
            take_profit: order
                .take_profit_pips
                .map(|pips| price + sign * self.symbol.from_pips(pips)),
            volume: order.volume,
        };

        let fill = Fill {
            order_id,
            position_id: position.id,
            symbol: position.symbol.clone(),
            direction: position.direction,
            price,
            volume: position.volume,
            kind: FillKind::Open,
            realized_pnl: Decimal::ZERO,
            timestamp: Utc::now(),
        };

        tracing::info!(
            position_id = %position.id,
            direction = %position.direction,
            %price,
            volume = %position.volume,
            stop_loss = ?position.stop_loss,
            "Paper position opened"
        );

        state.positions.push(position.clone());
        state.fills.push(fill.clone());
        (position, fill)
    }

    /// Close `volume` (all when `None`) of a position at `price`
    fn reduce_position(
        &self,
        state: &mut PaperState,
        id: Uuid,
        volume: Option<Decimal>,
        price: Decimal,
        kind: FillKind,
    ) -> Option<Fill> {
        let index = state.positions.iter().position(|p| p.id == id)?;
        let position = &mut state.positions[index];
        let closed = volume.unwrap_or(position.volume).min(position.volume);

        let move_pips = self
            .symbol
            .to_pips((price - position.entry_price) * direction_sign(position.direction));
        let realized_pnl = move_pips * self.symbol.pip_value * closed;

        position.volume -= closed;
        let fill = Fill {
            order_id: None,
            position_id: id,
            symbol: position.symbol.clone(),
            direction: position.direction,
            price,
            volume: closed,
            kind,
            realized_pnl,
            timestamp: Utc::now(),
        };

        if position.volume <= Decimal::ZERO {
            state.positions.remove(index);
        }
        state.balance += realized_pnl;

        tracing::info!(
            position_id = %id,
            ?kind,
            %price,
            volume = %closed,
            %realized_pnl,
            "Paper position reduced"
        );

        state.fills.push(fill.clone());
        Some(fill)
    }

    fn publish_gauges(&self, state: &PaperState) {
        set_gauge(GaugeMetric::Balance, state.balance.to_f64().unwrap_or_default());
        set_gauge(GaugeMetric::OpenPositions, state.positions.len() as f64);
        set_gauge(GaugeMetric::PendingOrders, state.pending.len() as f64);
    }

    fn check_order(&self, order: &Order) -> anyhow::Result<()> {
        if order.symbol != self.symbol.name {
            bail!("unknown symbol {}", order.symbol);
        }
        if order.volume <= Decimal::ZERO || order.volume < self.symbol.min_volume {
            bail!(
                "volume {} below minimum {}",
                order.volume,
                self.symbol.min_volume
            );
        }
        Ok(())
    }
}

fn direction_sign(direction: Direction) -> Decimal {
    match direction {
        Direction::Buy => Decimal::ONE,
        Direction::Sell => Decimal::NEGATIVE_ONE,
    }
}

fn limit_reached(pending: &PendingOrder, quote: Quote) -> bool {
    match pending.order.direction {
        Direction::Buy => quote.ask <= pending.price,
        Direction::Sell => quote.bid >= pending.price,
    }
}

fn protection_hit(position: &OpenPosition, exit: Decimal) -> Option<FillKind> {
    let direction = position.direction;
    if let Some(stop) = position.stop_loss {
        if direction.is_adverse(exit, stop) || exit == stop {
            return Some(FillKind::StopLoss);
        }
    }
    if let Some(target) = position.take_profit {
        if !direction.is_adverse(exit, target) {
            return Some(FillKind::TakeProfit);
        }
    }
    None
}

#[async_trait]
impl ExecutionEngine for PaperEngine {
    async fn submit_order(&self, order: Order) -> anyhow::Result<OrderTicket> {
        self.check_order(&order)?;
        let mut state = self.state.write().await;
        let quote = state
            .last_quote
            .ok_or_else(|| anyhow!("no quote received for {}", order.symbol))?;

        let ticket = match order.order_type {
            OrderType::Market => {
                let price = quote.entry_price(order.direction);
                let (position, _) = self.open_position(&mut state, &order, price, Some(OrderId::new_v4()));
                OrderTicket::Filled(position)
            }
            OrderType::Limit { price } => {
                let pending = PendingOrder {
                    id: OrderId::new_v4(),
                    order,
                    price,
                    created_at: Utc::now(),
                };
                if limit_reached(&pending, quote) {
                    let (position, _) =
                        self.open_position(&mut state, &pending.order, price, Some(pending.id));
                    OrderTicket::Filled(position)
                } else {
                    tracing::info!(order_id = %pending.id, %price, "Paper limit order resting");
                    state.pending.push(pending.clone());
                    OrderTicket::Pending(pending)
                }
            }
        };

        self.publish_gauges(&state);
        Ok(ticket)
    }

    async fn cancel_order(&self, id: OrderId) -> anyhow::Result<()> {
        let mut state = self.state.write().await;
        let before = state.pending.len();
        state.pending.retain(|p| p.id != id);
        if state.pending.len() == before {
            bail!("no pending order {}", id);
        }
        tracing::info!(?id, "Paper order cancelled");
        self.publish_gauges(&state);
        Ok(())
    }

    async fn find_position(&self, label: &str, symbol: &str) -> anyhow::Result<Option<OpenPosition>> {
        let state = self.state.read().await;
        Ok(state
            .positions
            .iter()
            .find(|p| p.label == label && p.symbol == symbol)
            .cloned())
    }

    async fn close_position(&self, id: Uuid, volume: Decimal) -> anyhow::Result<Fill> {
        let mut state = self.state.write().await;
        let quote = state
            .last_quote
            .ok_or_else(|| anyhow!("no quote received for {}", self.symbol.name))?;
        let position = state
            .positions
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| anyhow!("no open position {}", id))?;
        if volume <= Decimal::ZERO || volume > position.volume {
            bail!("cannot close {} of a {} position", volume, position.volume);
        }

        let exit = quote.exit_price(position.direction);
        let fill = self
            .reduce_position(&mut state, id, Some(volume), exit, FillKind::Close)
            .ok_or_else(|| anyhow!("no open position {}", id))?;
        self.publish_gauges(&state);
        Ok(fill)
    }

    async fn modify_position(
        &self,
        id: Uuid,
        stop_loss: Option<Decimal>,
        take_profit: Option<Decimal>,
    ) -> anyhow::Result<OpenPosition> {
        let mut state = self.state.write().await;
        let position = state
            .positions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| anyhow!("no open position {}", id))?;

        position.stop_loss = stop_loss;
        position.take_profit = take_profit;
        tracing::info!(position_id = %id, ?stop_loss, ?take_profit, "Paper position modified");
        Ok(position.clone())
    }

    async fn get_fills(&self) -> anyhow::Result<Vec<Fill>> {
        let state = self.state.read().await;
        Ok(state.fills.clone())
    }
}

#[async_trait]
impl AccountSource for PaperEngine {
    async fn balance(&self) -> anyhow::Result<Decimal> {
        Ok(self.state.read().await.balance)
    }
}
