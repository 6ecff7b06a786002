//! Market data types
//!
//! Live quotes and the instrument metadata the sizing core needs

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::risk::Direction;

/// Current top of book for the traded instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Best bid
    pub bid: Decimal,
    /// Best ask
    pub ask: Decimal,
}

impl Quote {
    /// Create a new quote
    pub fn new(bid: Decimal, ask: Decimal) -> Self {
        Self { bid, ask }
    }

    /// Mid price between bid and ask
    pub fn mid(&self) -> Decimal {
        (self.bid + self.ask) / dec!(2)
    }

    /// Spread between ask and bid
    pub fn spread(&self) -> Decimal {
        self.ask - self.bid
    }

    /// Bid above ask
    pub fn is_crossed(&self) -> bool {
        self.bid > self.ask
    }

    /// Price at which a new position in `direction` would be opened
    pub fn entry_price(&self, direction: Direction) -> Decimal {
        match direction {
            Direction::Buy => self.ask,
            Direction::Sell => self.bid,
        }
    }

    /// Price at which an open position in `direction` would be closed
    pub fn exit_price(&self, direction: Direction) -> Decimal {
        match direction {
            Direction::Buy => self.bid,
            Direction::Sell => self.ask,
        }
    }
}

/// Instrument metadata declared by the trading venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSpec {
    /// Symbol name, e.g. "EURUSD"
    pub name: String,
    /// Size of one pip in price units
    pub pip_size: Decimal,
    /// Account-currency value of a one pip move per unit of volume
    pub pip_value: Decimal,
    /// Smallest tradable volume in units
    pub min_volume: Decimal,
    /// Increment by which volume may be adjusted
    pub volume_step: Decimal,
}

impl SymbolSpec {
    /// Convert a price distance into pips
    pub fn to_pips(&self, distance: Decimal) -> Decimal {
        distance / self.pip_size
    }

    /// [`to_pips`](Self::to_pips), `None` on a zero pip size or overflow
    pub fn checked_to_pips(&self, distance: Decimal) -> Option<Decimal> {
        distance.checked_div(self.pip_size)
    }

    /// Convert a pip distance back into a price distance
    pub fn from_pips(&self, pips: Decimal) -> Decimal {
        pips * self.pip_size
    }
}
