//! Utility helpers for tests.
//!
//! Scripted collaborators that let behaviour tests place quarries and read
//! back every command the pursuer issued, plus builders for common set-ups.

pub mod body;
pub mod builders;
pub mod world;

pub use body::RecordingBody;
pub use builders::{drive, pursuer, pursuer_with, quarry_at_yaw, TestPursuer};
pub use world::ScriptedWorld;

/// Assert that two floats agree within `tolerance`.
///
/// # Panics
/// Panics with both values when they differ by more than `tolerance`.
pub fn assert_close(actual: f32, expected: f32, tolerance: f32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} (±{tolerance}), got {actual}"
    );
}
