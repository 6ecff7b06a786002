//! Risk core
//!
//! Risk-normalized order sizing and open-position adjustments. Everything
//! here is pure: inputs in, an order instruction or a rejection out.

mod adjust;
mod sizing;
mod types;
mod volume;

pub use adjust::{OpenPosition, PositionAdjuster, ProtectionAction, ProtectionUpdate};
pub use sizing::{compute_limit_sizing, compute_market_sizing, RiskOrderCalculator};
pub use types::{
    Direction, EntryMode, LevelRole, PriceLevel, Rejection, SizingRequest, SizingResult,
};
pub use volume::{normalize_volume, normalize_with_minimum};
