//! Adjustments to an already open position
//!
//! Half-close sizing and the break-even rule. Both read a snapshot of the
//! position and propose new values; applying them is the engine's job.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::types::{Direction, Rejection};
use super::volume::normalize_volume;

/// Snapshot of a position owned by the execution engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPosition {
    /// Engine-assigned identifier
    pub id: Uuid,
    /// Label the position was opened with
    pub label: String,
    /// Symbol name
    pub symbol: String,
    /// Trade direction
    pub direction: Direction,
    /// Average entry price
    pub entry_price: Decimal,
    /// Protective stop, if any
    pub stop_loss: Option<Decimal>,
    /// Take-profit target, if any
    pub take_profit: Option<Decimal>,
    /// Volume in units
    pub volume: Decimal,
}

/// Which leg the break-even rule moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtectionAction {
    /// Price favorable or flat: stop moved to entry
    StopToEntry,
    /// Price adverse: target moved to entry, stop left alone
    TargetToEntry,
}

/// Proposed stop/target pair for a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionUpdate {
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
    pub action: ProtectionAction,
}

/// Stateless rules for managing an open position
#[derive(Debug, Clone, Default)]
pub struct PositionAdjuster;

impl PositionAdjuster {
    pub fn new() -> Self {
        Self
    }

    /// Volume to close when halving a position
    ///
    /// Half the volume, rounded down to the volume step. Rejected when that
    /// is below the broker minimum or the step is not positive.
    pub fn half_close_volume(
        &self,
        current_volume: Decimal,
        min_volume: Decimal,
        volume_step: Decimal,
    ) -> Result<Decimal, Rejection> {
        let half = normalize_volume(current_volume / dec!(2), volume_step)?;
        if half < min_volume || half <= Decimal::ZERO {
            return Err(Rejection::BelowMinimum {
                volume: half,
                min_volume,
            });
        }
        Ok(half)
    }

    /// Break-even decision for `position` at `current_price`
    ///
    /// Adverse price keeps the stop and pulls the target to entry.
    /// Favorable or flat price moves the stop to entry and keeps the target.
    pub fn break_even_adjustment(
        &self,
        position: &OpenPosition,
        current_price: Decimal,
    ) -> ProtectionUpdate {
        let entry = position.entry_price;

        let update = if position.direction.is_adverse(current_price, entry) {
            ProtectionUpdate {
                stop_loss: position.stop_loss,
                take_profit: Some(entry),
                action: ProtectionAction::TargetToEntry,
            }
        } else {
            ProtectionUpdate {
                stop_loss: Some(entry),
                take_profit: position.take_profit,
                action: ProtectionAction::StopToEntry,
            }
        };

        debug!(
            position_id = %position.id,
            direction = %position.direction,
            %current_price,
            %entry,
            action = ?update.action,
            "Break-even evaluated"
        );

        update
    }
}
