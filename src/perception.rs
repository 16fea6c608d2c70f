//! Perception: what the pursuer can see this tick.
//!
//! One broad spatial query per tick returns the candidates around the agent.
//! The nearest candidate is evaluated against the peripheral cone, the
//! extended forward cone and the narrower charge cone. [`Perception::sense`]
//! only measures; the controller decides what the measurements mean for the
//! active state.

use glam::Vec3;
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::config::{LayerMask, PursuerConfig};
use crate::charge::in_charge_window;
use crate::geometry::{angle_to_deg, has_line_of_sight, in_cone, within_range};
use crate::locomotion::Pose;

/// An entity returned by the spatial index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntityRef {
    /// Stable identifier owned by the caller.
    pub id: u64,
    /// Position at query time.
    pub position: Vec3,
}

/// Spatial index and occlusion oracle.
#[cfg_attr(test, mockall::automock)]
pub trait SpatialQuery {
    /// Entities on `mask` layers within `radius` of `center`, in any order.
    fn find_entities_in_radius(&self, center: Vec3, radius: f32, mask: LayerMask) -> Vec<EntityRef>;
    /// True when nothing on `occluders` blocks the segment `from`–`to`.
    fn has_clear_path(&self, from: Vec3, to: Vec3, occluders: LayerMask) -> bool;
}

/// Which part of the field of view a candidate falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum VisionZone {
    /// Inside the forward cone; the extended radius applies.
    Forward,
    /// Inside the peripheral cone only; the base radius applies.
    Peripheral,
    /// Outside both cones, or the angle is undefined.
    #[default]
    Outside,
}

/// A cone of `half_angle_deg` around the facing, reaching `radius`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisionCone {
    /// Half of the full cone width, in degrees.
    pub half_angle_deg: f32,
    /// Reach of the cone.
    pub radius: f32,
}

impl VisionCone {
    /// Builds a cone from its full width in degrees.
    #[must_use]
    pub fn from_full_angle(full_angle_deg: f32, radius: f32) -> Self {
        Self {
            half_angle_deg: full_angle_deg / 2.0,
            radius,
        }
    }

    /// True when `target` lies strictly inside the cone's angle, ignoring
    /// its reach.
    #[must_use]
    pub fn admits(&self, pose: Pose, target: Vec3) -> bool {
        in_cone(pose.position, pose.forward, target, self.half_angle_deg)
    }

    /// True when `target` is inside the cone and within its reach.
    #[must_use]
    pub fn contains(&self, pose: Pose, target: Vec3) -> bool {
        self.admits(pose, target) && within_range(pose.position, target, self.radius)
    }
}

/// Measurements for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PerceptionResult {
    /// Nearest entity returned by the broad query.
    pub candidate: Option<EntityRef>,
    /// Distance to the candidate; zero without one.
    pub distance: f32,
    /// Angle from the facing to the candidate, when defined.
    pub angle_deg: Option<f32>,
    /// Cone the candidate falls in.
    pub zone: VisionZone,
    /// Nothing blocks the view of the candidate.
    pub line_of_sight: bool,
    /// Seen through the peripheral or extended forward cone.
    pub in_vision: bool,
    /// Seen through the charge cone at a chargeable distance.
    pub in_charge_vision: bool,
}

/// Vision parameters derived from a [`PursuerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Perception {
    peripheral: VisionCone,
    forward: VisionCone,
    charge: VisionCone,
    charge_min_distance: f32,
    query_radius: f32,
    target_mask: LayerMask,
    obstacle_mask: LayerMask,
}

impl Perception {
    /// Derives cones and masks from `config`.
    #[must_use]
    pub fn new(config: &PursuerConfig) -> Self {
        Self {
            peripheral: VisionCone::from_full_angle(config.view_angle, config.view_radius),
            forward: VisionCone::from_full_angle(
                config.forward_vision_angle,
                config.extended_view_radius(),
            ),
            charge: VisionCone::from_full_angle(
                config.charge_forward_vision_angle,
                config.charge_max_distance,
            ),
            charge_min_distance: config.charge_min_distance,
            query_radius: config.perception_radius(),
            target_mask: config.target_mask,
            obstacle_mask: config.obstacle_mask,
        }
    }

    /// Classifies `target` into a vision zone, forward cone first.
    #[must_use]
    fn zone_for(&self, pose: Pose, target: Vec3) -> VisionZone {
        if self.forward.admits(pose, target) {
            VisionZone::Forward
        } else if self.peripheral.admits(pose, target) {
            VisionZone::Peripheral
        } else {
            VisionZone::Outside
        }
    }

    /// Whether `target` is within the reach of the cone `zone` names.
    #[must_use]
    fn sees_in(&self, zone: VisionZone, pose: Pose, target: Vec3) -> bool {
        match zone {
            VisionZone::Forward => self.forward.contains(pose, target),
            VisionZone::Peripheral => self.peripheral.contains(pose, target),
            VisionZone::Outside => false,
        }
    }

    /// Queries `world` around `pose` and measures the nearest candidate.
    #[must_use]
    pub fn sense<Q>(&self, world: &Q, pose: Pose) -> PerceptionResult
    where
        Q: SpatialQuery + ?Sized,
    {
        let candidates =
            world.find_entities_in_radius(pose.position, self.query_radius, self.target_mask);
        let Some(candidate) = nearest(pose.position, &candidates) else {
            return PerceptionResult::default();
        };

        let distance = pose.position.distance(candidate.position);
        let angle_deg = angle_to_deg(pose.position, pose.forward, candidate.position);
        let line_of_sight = has_line_of_sight(pose.position, candidate.position, |from, to| {
            world.has_clear_path(from, to, self.obstacle_mask)
        });

        let target = candidate.position;
        let zone = self.zone_for(pose, target);
        let in_vision = line_of_sight && self.sees_in(zone, pose, target);
        let in_charge_vision = line_of_sight
            && self.charge.contains(pose, target)
            && in_charge_window(distance, self.charge_min_distance, self.charge.radius);

        log::debug!(
            "sensed quarry {} at {distance:.2} (angle {angle_deg:?}, {zone:?}, los {line_of_sight}, vision {in_vision}, charge {in_charge_vision})",
            candidate.id
        );

        PerceptionResult {
            candidate: Some(candidate),
            distance,
            angle_deg,
            zone,
            line_of_sight,
            in_vision,
            in_charge_vision,
        }
    }
}

/// Nearest candidate to `origin`, lowest id on ties.
fn nearest(origin: Vec3, candidates: &[EntityRef]) -> Option<EntityRef> {
    candidates
        .iter()
        .filter(|entity| entity.position.is_finite())
        .min_by_key(|entity| (OrderedFloat(origin.distance_squared(entity.position)), entity.id))
        .copied()
}
