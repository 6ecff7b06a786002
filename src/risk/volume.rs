//! Broker volume normalization
//!
//! Sizing and half-close both round through here: volumes are rounded down
//! to a whole number of volume steps.

use rust_decimal::Decimal;

use super::types::Rejection;

/// Round `volume` down to a multiple of `step`
///
/// The step must be strictly positive.
pub fn normalize_volume(volume: Decimal, step: Decimal) -> Result<Decimal, Rejection> {
    if step <= Decimal::ZERO {
        return Err(Rejection::InvalidParameter("volume_step"));
    }
    volume
        .checked_div(step)
        .and_then(|steps| steps.floor().checked_mul(step))
        .ok_or(Rejection::OutOfRange("volume"))
}

/// Round down to the step, then raise to `min_volume` if below it
///
/// Returns the volume and whether the minimum clamp was applied.
pub fn normalize_with_minimum(
    volume: Decimal,
    min_volume: Decimal,
    step: Decimal,
) -> Result<(Decimal, bool), Rejection> {
    let normalized = normalize_volume(volume, step)?;
    if normalized < min_volume {
        Ok((min_volume, true))
    } else {
        Ok((normalized, false))
    }
}
