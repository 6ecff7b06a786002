//! Button handlers

use async_trait::async_trait;
use tracing::{info, warn};

use super::{order_failed, CommandError, CommandHandler, CommandReport, Desk};
use crate::config::RiskConfig;
use crate::execution::{Order, OrderType};
use crate::risk::{
    EntryMode, LevelRole, PositionAdjuster, RiskOrderCalculator, SizingResult,
};

/// Market entry risking the configured percent to the stop line
#[derive(Debug, Clone)]
pub struct EnterMarket {
    calculator: RiskOrderCalculator,
}

impl EnterMarket {
    pub fn new(calculator: RiskOrderCalculator) -> Self {
        Self { calculator }
    }

    pub fn from_config(config: &RiskConfig) -> Self {
        Self::new(RiskOrderCalculator::from_config(config))
    }
}

#[async_trait]
impl CommandHandler for EnterMarket {
    async fn handle(&self, desk: &Desk<'_>) -> Result<CommandReport, CommandError> {
        let stop = desk.resolve_level(&desk.settings.stop_line_label, LevelRole::StopLoss)?;
        let quote = desk.quote()?;
        let balance = desk.balance().await?;

        let request = desk.sizing_request(balance, stop, EntryMode::Market(quote));
        let sizing = self.calculator.compute(&request)?;
        log_sizing(&sizing);

        let order = entry_order(desk, &sizing, OrderType::Market);
        let ticket = desk.engine.submit_order(order).await.map_err(order_failed)?;

        Ok(CommandReport::Entered { sizing, ticket })
    }
}

/// Limit entry at the entry line, stop at the stop line
#[derive(Debug, Clone)]
pub struct EnterLimit {
    calculator: RiskOrderCalculator,
}

impl EnterLimit {
    pub fn new(calculator: RiskOrderCalculator) -> Self {
        Self { calculator }
    }

    pub fn from_config(config: &RiskConfig) -> Self {
        Self::new(RiskOrderCalculator::from_config(config))
    }
}

#[async_trait]
impl CommandHandler for EnterLimit {
    async fn handle(&self, desk: &Desk<'_>) -> Result<CommandReport, CommandError> {
        let entry = desk.resolve_level(&desk.settings.entry_line_label, LevelRole::Entry)?;
        let stop = desk.resolve_level(&desk.settings.stop_line_label, LevelRole::StopLoss)?;
        let quote = desk.quote()?;
        let balance = desk.balance().await?;

        let request = desk.sizing_request(
            balance,
            stop,
            EntryMode::Limit {
                entry_price: entry.price,
                quote,
            },
        );
        let sizing = self.calculator.compute(&request)?;
        log_sizing(&sizing);

        let order = entry_order(desk, &sizing, OrderType::Limit { price: entry.price });
        let ticket = desk.engine.submit_order(order).await.map_err(order_failed)?;

        Ok(CommandReport::Entered { sizing, ticket })
    }
}

/// Close half of the desk's position
#[derive(Debug, Clone, Default)]
pub struct CloseHalf {
    adjuster: PositionAdjuster,
}

impl CloseHalf {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommandHandler for CloseHalf {
    async fn handle(&self, desk: &Desk<'_>) -> Result<CommandReport, CommandError> {
        let position = desk.open_position().await?;
        let symbol = desk.symbol();

        let volume =
            self.adjuster
                .half_close_volume(position.volume, symbol.min_volume, symbol.volume_step)?;

        info!(position_id = %position.id, %volume, "Closing half of the position");
        let fill = desk
            .engine
            .close_position(position.id, volume)
            .await
            .map_err(order_failed)?;

        Ok(CommandReport::HalfClosed { fill })
    }
}

/// Break-even stop, or target pulled to entry when price is adverse
#[derive(Debug, Clone, Default)]
pub struct BreakEven {
    adjuster: PositionAdjuster,
}

impl BreakEven {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommandHandler for BreakEven {
    async fn handle(&self, desk: &Desk<'_>) -> Result<CommandReport, CommandError> {
        let position = desk.open_position().await?;
        let quote = desk.quote()?;
        let current_price = quote.exit_price(position.direction);

        let update = self.adjuster.break_even_adjustment(&position, current_price);
        let position = desk
            .engine
            .modify_position(position.id, update.stop_loss, update.take_profit)
            .await
            .map_err(order_failed)?;

        Ok(CommandReport::Protected { update, position })
    }
}

fn entry_order(desk: &Desk<'_>, sizing: &SizingResult, order_type: OrderType) -> Order {
    Order {
        symbol: desk.symbol().name.clone(),
        direction: sizing.direction,
        volume: sizing.volume,
        label: desk.settings.position_label.clone(),
        order_type,
        stop_loss_pips: Some(sizing.stop_distance_pips),
        take_profit_pips: None,
    }
}

fn log_sizing(sizing: &SizingResult) {
    info!(
        direction = %sizing.direction,
        volume = %sizing.volume,
        stop_pips = %sizing.stop_distance_pips,
        stop_price = %sizing.stop_price,
        risk_pct = %sizing.adjusted_risk_percent,
        "Order sized"
    );
    if sizing.promoted_to_minimum {
        warn!(
            raw_volume = %sizing.raw_volume,
            volume = %sizing.volume,
            "Volume raised to broker minimum, risk exceeds the configured percent"
        );
    }
}
