//! Locomotion seam.
//!
//! The controller never moves the agent itself. It hands a speed, a
//! destination and a facing to a [`Locomotion`] implementation (a navmesh
//! agent in a game, [`crate::sim::KinematicBody`] headless) and reads the
//! resulting pose back each tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Position and facing of the agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World position.
    pub position: Vec3,
    /// Facing direction; need not be normalised.
    pub forward: Vec3,
}

impl Pose {
    /// Builds a pose from a position and facing.
    #[must_use]
    pub const fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z)
    }
}

/// Body the pursuer steers.
///
/// The pursuer is the only writer of destination, speed, facing and the
/// stopped flag.
#[cfg_attr(test, mockall::automock)]
pub trait Locomotion {
    /// Current pose of the agent.
    fn pose(&self) -> Pose;
    /// Turns the agent to face `forward`.
    fn set_facing(&mut self, forward: Vec3);
    /// Point the agent moves towards.
    fn set_destination(&mut self, destination: Vec3);
    /// Movement speed in units per second.
    fn set_speed(&mut self, speed: f32);
    /// Freezes (`true`) or releases (`false`) movement.
    fn set_stopped(&mut self, stopped: bool);
    /// Path distance left to the destination.
    fn remaining_distance(&self) -> f32;
    /// Distance at which the body considers a destination reached.
    fn stopping_distance(&self) -> f32;
}
