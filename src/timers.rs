//! Count-up timers owned by the behavioural states.

use serde::Serialize;

/// Monotonic count-up timer.
///
/// Only advances by non-negative, finite steps, so `elapsed` is never
/// negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Stopwatch {
    elapsed: f32,
}

impl Stopwatch {
    /// A stopped timer at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { elapsed: 0.0 }
    }

    /// Seconds accumulated since the last reset.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Sets the timer back to zero.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Adds `dt` seconds; invalid steps are ignored.
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    /// True once the timer has run strictly past `threshold`.
    #[must_use]
    pub fn exceeded(&self, threshold: f32) -> bool {
        self.elapsed > threshold
    }
}

/// Timers owned by the `Wait`, `Chase` and `ChargeSearch` states.
///
/// The charge cooldown lives with the charge subsystem because its lifetime
/// spans several states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StateTimers {
    /// Time spent chasing without seeing the quarry.
    pub chase: Stopwatch,
    /// Time spent idling in `Wait`.
    pub wait: Stopwatch,
    /// Time spent scanning in `ChargeSearch`.
    pub charge_search: Stopwatch,
}
