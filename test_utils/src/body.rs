//! Locomotion double that records every command.

use glam::Vec3;
use stalker::{Locomotion, Pose};

/// Body that never moves on its own and remembers what it was told.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingBody {
    /// Pose reported to the controller; tests move it directly.
    pub pose: Pose,
    /// Last destination set.
    pub destination: Vec3,
    /// Last speed set.
    pub speed: f32,
    /// Last stopped flag set.
    pub stopped: bool,
    /// Every facing set, oldest first.
    pub facings: Vec<Vec3>,
    /// Every destination set, oldest first.
    pub destinations: Vec<Vec3>,
    /// Overrides the computed remaining distance.
    pub remaining_override: Option<f32>,
    /// Arrival tolerance reported to the controller.
    pub stopping: f32,
}

impl RecordingBody {
    /// Body standing at `position` facing `+Z`.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self::new(Pose::new(position, Vec3::Z))
    }

    /// Body standing at `pose`.
    #[must_use]
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            destination: pose.position,
            speed: 0.0,
            stopped: false,
            facings: Vec::new(),
            destinations: Vec::new(),
            remaining_override: None,
            stopping: 0.0,
        }
    }

    /// Teleports the body towards its destination by `distance`.
    pub fn walk(&mut self, distance: f32) {
        let offset = self.destination - self.pose.position;
        let step = offset.length().min(distance.max(0.0));
        if let Some(direction) = offset.try_normalize() {
            self.pose.position += direction * step;
        }
    }
}

impl Default for RecordingBody {
    fn default() -> Self {
        Self::new(Pose::default())
    }
}

impl Locomotion for RecordingBody {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn set_facing(&mut self, forward: Vec3) {
        self.pose.forward = forward;
        self.facings.push(forward);
    }

    fn set_destination(&mut self, destination: Vec3) {
        self.destination = destination;
        self.destinations.push(destination);
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining_override
            .unwrap_or_else(|| self.pose.position.distance(self.destination))
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping
    }
}
