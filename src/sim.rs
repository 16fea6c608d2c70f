//! Headless reference world.
//!
//! [`Arena`] stands in for a physics scene: quarries on scripted paths and
//! circular pillars that block sight on the ground plane. [`KinematicBody`]
//! stands in for a navmesh agent. [`run`] drives a [`Pursuer`] through a
//! [`Scenario`] and records a trace frame per tick.

use glam::Vec3;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, LayerMask, PursuerConfig};
use crate::constants::{OBSTACLE_LAYER, QUARRY_LAYER};
use crate::controller::Pursuer;
use crate::events::PursuitEvent;
use crate::geometry::{forward_from_yaw, vec_normalize};
use crate::locomotion::{Locomotion, Pose};
use crate::numeric::elapsed_seconds;
use crate::perception::{EntityRef, SpatialQuery};
use crate::snapshot::PursuerSnapshot;

/// Waypoints a quarry walks through at constant speed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuarryPath {
    /// Points visited in order.
    pub waypoints: Vec<Vec3>,
    /// Walking speed.
    pub speed: f32,
    /// Start over after the last waypoint.
    pub looping: bool,
    #[serde(skip)]
    next: usize,
}

impl QuarryPath {
    /// Walks `waypoints` at `speed`.
    #[must_use]
    pub fn new(waypoints: Vec<Vec3>, speed: f32, looping: bool) -> Self {
        Self {
            waypoints,
            speed,
            looping,
            next: 0,
        }
    }

    /// Moves `position` along the path for `dt` seconds.
    pub fn advance(&mut self, position: Vec3, dt: f32) -> Vec3 {
        let mut position = position;
        let mut budget = self.speed.max(0.0) * dt;
        let mut idle_hops = 0;
        while budget > 0.0 && idle_hops <= self.waypoints.len() {
            if self.next >= self.waypoints.len() {
                if self.looping && !self.waypoints.is_empty() {
                    self.next = 0;
                } else {
                    break;
                }
            }
            let Some(&waypoint) = self.waypoints.get(self.next) else {
                break;
            };
            let gap = position.distance(waypoint);
            if gap <= budget {
                idle_hops = if gap > 0.0 { 0 } else { idle_hops + 1 };
                position = waypoint;
                budget -= gap;
                self.next += 1;
            } else {
                position += vec_normalize(waypoint - position) * budget;
                budget = 0.0;
            }
        }
        position
    }
}

/// A pursuable entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quarry {
    /// Identifier reported by the spatial query.
    pub id: u64,
    /// Current position.
    pub position: Vec3,
    /// Layers the quarry occupies.
    pub layer: LayerMask,
    /// Scripted movement.
    pub path: QuarryPath,
}

impl Default for Quarry {
    fn default() -> Self {
        Self {
            id: 1,
            position: Vec3::ZERO,
            layer: LayerMask(QUARRY_LAYER),
            path: QuarryPath::default(),
        }
    }
}

/// Vertical cylinder blocking sight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Obstacle {
    /// Centre on the ground plane; `y` is ignored.
    pub center: Vec3,
    /// Cylinder radius.
    pub radius: f32,
    /// Layers the obstacle occupies.
    pub layer: LayerMask,
}

impl Default for Obstacle {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 1.0,
            layer: LayerMask(OBSTACLE_LAYER),
        }
    }
}

impl Obstacle {
    /// True when the ground-plane segment `from`–`to` passes through the
    /// cylinder.
    #[must_use]
    pub fn blocks(&self, from: Vec3, to: Vec3) -> bool {
        let flat = |v: Vec3| Vec3::new(v.x, 0.0, v.z);
        let (a, b, c) = (flat(from), flat(to), flat(self.center));
        let segment = b - a;
        let length_sq = segment.length_squared();
        let t = if length_sq > 0.0 {
            ((c - a).dot(segment) / length_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (a + segment * t).distance(c) < self.radius
    }
}

/// In-memory scene answering spatial queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Arena {
    /// Quarries in insertion order.
    pub quarries: Vec<Quarry>,
    /// Sight blockers.
    pub obstacles: Vec<Obstacle>,
}

impl Arena {
    /// Moves every quarry along its path.
    pub fn step(&mut self, dt: f32) {
        for quarry in &mut self.quarries {
            quarry.position = quarry.path.advance(quarry.position, dt);
        }
    }
}

impl SpatialQuery for Arena {
    fn find_entities_in_radius(&self, center: Vec3, radius: f32, mask: LayerMask) -> Vec<EntityRef> {
        self.quarries
            .iter()
            .filter(|quarry| quarry.layer.intersects(mask))
            .filter(|quarry| quarry.position.distance(center) <= radius)
            .map(|quarry| EntityRef {
                id: quarry.id,
                position: quarry.position,
            })
            .collect()
    }

    fn has_clear_path(&self, from: Vec3, to: Vec3, occluders: LayerMask) -> bool {
        !self
            .obstacles
            .iter()
            .filter(|obstacle| obstacle.layer.intersects(occluders))
            .any(|obstacle| obstacle.blocks(from, to))
    }
}

/// Point-mass agent that walks straight to its destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KinematicBody {
    pose: Pose,
    destination: Vec3,
    speed: f32,
    stopped: bool,
    stopping_distance: f32,
    face_movement: bool,
}

impl KinematicBody {
    /// Body standing at `pose` with its destination underfoot.
    #[must_use]
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            destination: pose.position,
            speed: 0.0,
            stopped: false,
            stopping_distance: 0.0,
            face_movement: false,
        }
    }

    /// Arrival tolerance reported to the controller.
    #[must_use]
    pub fn with_stopping_distance(mut self, distance: f32) -> Self {
        self.stopping_distance = distance.max(0.0);
        self
    }

    /// Turn the body to face where it walks, as a navmesh agent with
    /// automatic rotation would.
    #[must_use]
    pub fn facing_movement(mut self, enabled: bool) -> Self {
        self.face_movement = enabled;
        self
    }

    /// Current destination.
    #[must_use]
    pub const fn destination(&self) -> Vec3 {
        self.destination
    }

    /// Current speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// True while frozen.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Moves towards the destination for `dt` seconds without overshooting.
    pub fn integrate(&mut self, dt: f32) {
        if self.stopped || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let offset = self.destination - self.pose.position;
        let gap = offset.length();
        if gap <= f32::EPSILON {
            return;
        }
        let step = (self.speed * dt).min(gap);
        let heading = vec_normalize(offset);
        self.pose.position += heading * step;
        if self.face_movement && heading != Vec3::ZERO {
            self.pose.forward = heading;
        }
    }
}

impl Locomotion for KinematicBody {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn set_facing(&mut self, forward: Vec3) {
        if forward.is_finite() && forward != Vec3::ZERO {
            self.pose.forward = forward;
        }
    }

    fn set_destination(&mut self, destination: Vec3) {
        if destination.is_finite() {
            self.destination = destination;
        }
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    fn remaining_distance(&self) -> f32 {
        self.pose.position.distance(self.destination)
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }
}

/// Where and how the pursuer starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuerStart {
    /// Spawn position.
    pub position: Vec3,
    /// Spawn yaw in degrees; zero faces `+Z`.
    pub yaw: f32,
    /// Arrival tolerance of the body.
    pub stopping_distance: f32,
}

impl Default for PursuerStart {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            stopping_distance: 0.2,
        }
    }
}

/// A complete, replayable simulation set-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Controller tuning.
    pub config: PursuerConfig,
    /// Pursuer spawn.
    pub pursuer: PursuerStart,
    /// Scene contents.
    pub arena: Arena,
    /// Number of ticks to run.
    pub ticks: u32,
    /// Seconds per tick.
    pub dt: f32,
    /// Seed for the pursuer's charge rolls.
    pub seed: u64,
    /// Tick on which the pursuer is killed.
    pub kill_at: Option<u64>,
    /// Tick on which the pursuer is alerted.
    pub alert_at: Option<u64>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            config: PursuerConfig::default(),
            pursuer: PursuerStart::default(),
            arena: Arena {
                quarries: vec![Quarry {
                    id: 1,
                    position: Vec3::new(2.0, 0.0, 6.0),
                    path: QuarryPath::new(
                        vec![
                            Vec3::new(10.0, 0.0, 12.0),
                            Vec3::new(-6.0, 0.0, 14.0),
                            Vec3::new(2.0, 0.0, 6.0),
                        ],
                        3.0,
                        true,
                    ),
                    ..Quarry::default()
                }],
                obstacles: vec![Obstacle {
                    center: Vec3::new(-3.0, 0.0, 8.0),
                    radius: 1.5,
                    ..Obstacle::default()
                }],
            },
            ticks: 600,
            dt: 1.0 / 30.0,
            seed: 0,
            kill_at: None,
            alert_at: None,
        }
    }
}

impl Scenario {
    /// Parses a scenario from JSON; missing fields take defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One tick of a recorded run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceFrame {
    /// Simulated seconds at the end of the tick.
    pub time: f32,
    /// Pursuer state after the tick.
    pub pursuer: PursuerSnapshot,
    /// Quarry positions after the tick.
    pub quarries: Vec<EntityRef>,
}

/// Output of [`run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Per-tick trace.
    pub frames: Vec<TraceFrame>,
    /// Every event the pursuer emitted.
    pub events: Vec<PursuitEvent>,
}

impl SimulationReport {
    /// Number of `Caught` events.
    #[must_use]
    pub fn catches(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, PursuitEvent::Caught { .. }))
            .count()
    }
}

/// Pursuer wired to the reference world.
pub type SimPursuer = Pursuer<Arena, KinematicBody, Vec<PursuitEvent>>;

/// Builds the pursuer described by `scenario`.
///
/// # Errors
/// Returns the validation error of the scenario's configuration.
pub fn build(scenario: &Scenario) -> Result<SimPursuer, ConfigError> {
    let pose = Pose::new(
        scenario.pursuer.position,
        forward_from_yaw(scenario.pursuer.yaw),
    );
    let body = KinematicBody::new(pose)
        .with_stopping_distance(scenario.pursuer.stopping_distance)
        .facing_movement(!scenario.config.use_custom_rotation);
    Pursuer::new(
        scenario.config.clone(),
        scenario.arena.clone(),
        body,
        Vec::new(),
        scenario.seed,
    )
}

/// Most trace frames reserved up front; longer runs grow the buffer.
const TRACE_RESERVE: usize = 4096;

fn trace_capacity(ticks: u32) -> usize {
    usize::try_from(ticks).map_or(TRACE_RESERVE, |count| count.min(TRACE_RESERVE))
}

/// Runs `scenario` to completion.
///
/// Each tick the quarries move, the pursuer decides and the body integrates.
///
/// # Errors
/// Returns the validation error of the scenario's configuration.
pub fn run(scenario: &Scenario) -> Result<SimulationReport, ConfigError> {
    let mut pursuer = build(scenario)?;
    let dt = scenario.dt;
    let mut frames = Vec::with_capacity(trace_capacity(scenario.ticks));
    info!(
        "running scenario: {} ticks of {dt}s, seed {}",
        scenario.ticks, scenario.seed
    );

    for tick in 1..=u64::from(scenario.ticks) {
        pursuer.spatial_mut().step(dt);
        if scenario.alert_at == Some(tick) {
            pursuer.alert();
        }
        if scenario.kill_at == Some(tick) {
            pursuer.kill();
        }
        pursuer.tick(dt);
        pursuer.body_mut().integrate(dt);

        let snapshot = pursuer.snapshot();
        debug!("tick {tick}: {} at {:?}", snapshot.state, snapshot.position);
        frames.push(TraceFrame {
            time: elapsed_seconds(tick, dt),
            pursuer: snapshot,
            quarries: pursuer
                .spatial()
                .quarries
                .iter()
                .map(|quarry| EntityRef {
                    id: quarry.id,
                    position: quarry.position,
                })
                .collect(),
        });
    }

    Ok(SimulationReport {
        frames,
        events: pursuer.events().clone(),
    })
}
