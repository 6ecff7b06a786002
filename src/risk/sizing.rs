//! Risk-based order sizing
//!
//! Fixed-fractional sizing: the volume is chosen so that a stop-out loses
//! `balance * (risk% - margin%)`. Volume never depends on a target.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::types::{Direction, EntryMode, Rejection, SizingRequest, SizingResult};
use super::volume::normalize_with_minimum;
use crate::config::RiskConfig;
use crate::market::Quote;

/// Converts a risk budget and a stop level into an order volume
#[derive(Debug, Clone)]
pub struct RiskOrderCalculator {
    /// Stops closer than this many pips are rejected
    pub min_stop_distance_pips: Decimal,
}

impl RiskOrderCalculator {
    /// Create a new calculator
    pub fn new(min_stop_distance_pips: Decimal) -> Self {
        Self {
            min_stop_distance_pips,
        }
    }

    /// Create from RiskConfig
    pub fn from_config(config: &RiskConfig) -> Self {
        Self::new(config.min_stop_distance_pips)
    }

    /// Size an order from either entry mode
    pub fn compute(&self, request: &SizingRequest) -> Result<SizingResult, Rejection> {
        match request.entry {
            EntryMode::Market(quote) => self.compute_market_sizing(request, quote),
            EntryMode::Limit { entry_price, quote } => {
                self.compute_limit_sizing(request, entry_price, quote)
            }
        }
    }

    /// Size a market order against the live quote
    ///
    /// Buys at the ask when the ask is above the stop, otherwise sells at
    /// the bid.
    pub fn compute_market_sizing(
        &self,
        request: &SizingRequest,
        quote: Quote,
    ) -> Result<SizingResult, Rejection> {
        let direction = if quote.ask > request.stop_price {
            Direction::Buy
        } else {
            Direction::Sell
        };
        let entry_price = quote.entry_price(direction);

        self.size(request, quote, direction, entry_price)
    }

    /// Size a limit order resting at `entry_price`
    ///
    /// An entry below the mid is a buy, above the mid a sell. An entry
    /// exactly at the mid takes its direction from the stop side. The stop
    /// must sit below a buy entry and above a sell entry.
    pub fn compute_limit_sizing(
        &self,
        request: &SizingRequest,
        entry_price: Decimal,
        quote: Quote,
    ) -> Result<SizingResult, Rejection> {
        let mid = quote.mid();
        let direction = if entry_price < mid {
            Direction::Buy
        } else if entry_price > mid {
            Direction::Sell
        } else if request.stop_price < entry_price {
            Direction::Buy
        } else {
            Direction::Sell
        };

        let result = self.size(request, quote, direction, entry_price)?;

        let stop_on_correct_side = match direction {
            Direction::Buy => request.stop_price < entry_price,
            Direction::Sell => request.stop_price > entry_price,
        };
        if !stop_on_correct_side {
            return Err(Rejection::InvalidStopSide {
                direction,
                entry_price,
                stop_price: request.stop_price,
            });
        }

        Ok(result)
    }

    /// Shared arithmetic once direction and entry are known
    fn size(
        &self,
        request: &SizingRequest,
        quote: Quote,
        direction: Direction,
        entry_price: Decimal,
    ) -> Result<SizingResult, Rejection> {
        let adjusted_risk_percent = request.adjusted_risk_percent();
        if adjusted_risk_percent <= Decimal::ZERO {
            return Err(Rejection::MarginExceedsRisk {
                risk_percent: request.risk_percent,
                margin_percent: request.margin_percent,
            });
        }

        validate_parameters(request, quote)?;

        let symbol = &request.symbol;
        let stop_distance_pips = entry_price
            .checked_sub(request.stop_price)
            .and_then(|distance| symbol.checked_to_pips(distance.abs()))
            .ok_or(Rejection::OutOfRange("stop_distance_pips"))?;
        if stop_distance_pips < self.min_stop_distance_pips {
            return Err(Rejection::StopTooClose {
                distance_pips: stop_distance_pips,
                min_pips: self.min_stop_distance_pips,
            });
        }

        let risk_amount = request
            .account_balance
            .checked_mul(adjusted_risk_percent)
            .map(|amount| amount / dec!(100))
            .ok_or(Rejection::OutOfRange("risk_amount"))?;
        // A tiny pip value can round the per-unit risk down to zero
        let risk_per_unit = stop_distance_pips
            .checked_mul(symbol.pip_value)
            .filter(|value| !value.is_zero())
            .ok_or(Rejection::OutOfRange("pip_value"))?;
        let raw_volume = risk_amount
            .checked_div(risk_per_unit)
            .ok_or(Rejection::OutOfRange("raw_volume"))?;
        let (volume, promoted_to_minimum) =
            normalize_with_minimum(raw_volume, symbol.min_volume, symbol.volume_step)?;

        debug!(
            %direction,
            %entry_price,
            %stop_distance_pips,
            %risk_amount,
            %raw_volume,
            %volume,
            "Order sized"
        );

        Ok(SizingResult {
            direction,
            entry_price,
            stop_price: request.stop_price,
            stop_distance_pips,
            adjusted_risk_percent,
            risk_amount,
            raw_volume,
            volume,
            promoted_to_minimum,
        })
    }
}

impl Default for RiskOrderCalculator {
    fn default() -> Self {
        Self {
            min_stop_distance_pips: dec!(0.01),
        }
    }
}

fn validate_parameters(request: &SizingRequest, quote: Quote) -> Result<(), Rejection> {
    let symbol = &request.symbol;
    let positive = [
        ("account_balance", request.account_balance),
        ("pip_size", symbol.pip_size),
        ("pip_value", symbol.pip_value),
        ("volume_step", symbol.volume_step),
    ];
    for (field, value) in positive {
        if value <= Decimal::ZERO {
            return Err(Rejection::InvalidParameter(field));
        }
    }
    if symbol.min_volume < Decimal::ZERO {
        return Err(Rejection::InvalidParameter("min_volume"));
    }
    if quote.bid <= Decimal::ZERO {
        return Err(Rejection::InvalidParameter("bid"));
    }
    if quote.is_crossed() {
        return Err(Rejection::CrossedQuote {
            bid: quote.bid,
            ask: quote.ask,
        });
    }
    Ok(())
}

/// Size a market order with the default calculator
pub fn compute_market_sizing(request: &SizingRequest, quote: Quote) -> Result<SizingResult, Rejection> {
    RiskOrderCalculator::default().compute_market_sizing(request, quote)
}

/// Size a limit order with the default calculator
pub fn compute_limit_sizing(
    request: &SizingRequest,
    entry_price: Decimal,
    quote: Quote,
) -> Result<SizingResult, Rejection> {
    RiskOrderCalculator::default().compute_limit_sizing(request, entry_price, quote)
}
