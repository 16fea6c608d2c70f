//! Numeric conversion helpers.
//!
//! Tick counters are integers while simulated time is `f32`; these helpers
//! keep the lossy conversions in one place.

/// Simulated seconds after `tick` steps of `dt`.
#[expect(
    clippy::cast_precision_loss,
    reason = "Tick counts stay far below the f32 mantissa limit."
)]
#[must_use]
pub fn elapsed_seconds(tick: u64, dt: f32) -> f32 {
    tick as f32 * dt
}

/// Number of whole ticks of `dt` needed to cover `seconds`.
///
/// Returns `None` for non-positive or non-finite input.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The ceiling is validated against the u32 domain."
)]
#[must_use]
pub fn ticks_for(seconds: f32, dt: f32) -> Option<u32> {
    if !seconds.is_finite() || !dt.is_finite() || seconds < 0.0 || dt <= 0.0 {
        return None;
    }
    let ticks = (f64::from(seconds) / f64::from(dt)).ceil();
    if ticks > f64::from(u32::MAX) {
        return None;
    }
    Some(ticks as u32)
}
