//! Read-only view of a pursuer for traces and debug tooling.

use glam::Vec3;
use serde::Serialize;

use crate::charge::ChargeLock;
use crate::perception::PerceptionResult;
use crate::state::BehaviourState;
use crate::timers::StateTimers;

/// Everything observable about a pursuer after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PursuerSnapshot {
    /// Ticks processed so far.
    pub tick: u64,
    /// Active behaviour.
    pub state: BehaviourState,
    /// Quarry perceptible this tick.
    pub detecting: bool,
    /// Quarry caught and not yet released by a wait timeout.
    pub caught: bool,
    /// Agent position.
    pub position: Vec3,
    /// Agent facing.
    pub forward: Vec3,
    /// Id of the tracked quarry.
    pub target_id: Option<u64>,
    /// Last known quarry position.
    pub target: Option<Vec3>,
    /// Active charge lock.
    pub charge: Option<ChargeLock>,
    /// Charges currently blocked.
    pub cooldown_active: bool,
    /// Seconds since the cooldown last started.
    pub cooldown_elapsed: f32,
    /// State-owned timers.
    pub timers: StateTimers,
    /// Raw perception of the last tick.
    pub perception: PerceptionResult,
}
