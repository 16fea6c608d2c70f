//! Builders for pursuers wired to the scripted collaborators.

use glam::Vec3;
use stalker::geometry::forward_from_yaw;
use stalker::{BehaviourState, Pursuer, PursuerConfig, PursuitEvent};

use crate::{RecordingBody, ScriptedWorld};

/// Pursuer wired to the test doubles.
pub type TestPursuer = Pursuer<ScriptedWorld, RecordingBody, Vec<PursuitEvent>>;

/// Pursuer with `config` at the origin facing `+Z`.
///
/// # Panics
/// Panics if `config` is invalid.
#[must_use]
pub fn pursuer_with(config: PursuerConfig, world: ScriptedWorld, seed: u64) -> TestPursuer {
    Pursuer::new(config, world, RecordingBody::default(), Vec::new(), seed)
        .unwrap_or_else(|err| panic!("test configuration rejected: {err}"))
}

/// Pursuer with default tuning at the origin facing `+Z`.
///
/// # Panics
/// Panics if the default configuration is invalid.
#[must_use]
pub fn pursuer(world: ScriptedWorld) -> TestPursuer {
    pursuer_with(PursuerConfig::default(), world, 0)
}

/// Ground-plane point `distance` away from the origin at `yaw_deg`.
#[must_use]
pub fn quarry_at_yaw(yaw_deg: f32, distance: f32) -> Vec3 {
    forward_from_yaw(yaw_deg) * distance
}

/// Ticks `pursuer` `ticks` times with `dt` and returns the states seen.
pub fn drive(pursuer: &mut TestPursuer, ticks: usize, dt: f32) -> Vec<BehaviourState> {
    (0..ticks).map(|_| pursuer.tick(dt)).collect()
}
