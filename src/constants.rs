//! Default tuning for the pursuer.
//!
//! These values mirror the tuning the antagonist shipped with and seed
//! [`crate::config::PursuerConfig::default`].
pub const CHASE_SPEED: f32 = 5.0;
pub const MAX_TIME_CHASING: f32 = 8.0;
pub const MAX_TIME_WAITING: f32 = 3.0;
pub const RADIUS_HIT: f32 = 1.5;
pub const LOSE_TARGET_DISTANCE: f32 = 15.0;
pub const MIN_CHASE_DISTANCE: f32 = 2.0;
/// Speed multiplier applied once the quarry is within the minimum chase
/// distance.
pub const CLOSE_CHASE_SPEED_FACTOR: f32 = 0.7;

/// Turn rate in degrees per second.
pub const ROTATION_SPEED: f32 = 120.0;
pub const CHASE_TURN_FACTOR: f32 = 1.5;

pub const VIEW_RADIUS: f32 = 12.0;
/// Full cone angle in degrees.
pub const VIEW_ANGLE: f32 = 90.0;
pub const FORWARD_VISION_BONUS: f32 = 5.0;
pub const FORWARD_VISION_ANGLE: f32 = 45.0;

pub const CHARGE_SPEED: f32 = 20.0;
/// Furthest a single charge may travel.
pub const CHARGE_DISTANCE: f32 = 25.0;
pub const CHARGE_MIN_DISTANCE: f32 = 8.0;
pub const CHARGE_MAX_DISTANCE: f32 = 25.0;
pub const CHARGE_FORWARD_VISION_ANGLE: f32 = 30.0;
pub const CHARGE_COOLDOWN: f32 = 4.0;
pub const CHARGE_SEARCH_TIMEOUT: f32 = 1.5;
pub const CHARGE_SEARCH_ROTATION_SPEED: f32 = 90.0;
pub const CHARGE_CHANCE_PER_SECOND: f32 = 0.5;
pub const DIRECT_CHARGE_CHANCE: f32 = 0.7;

/// Floor applied to the locomotion stopping distance when deciding that a
/// charge has arrived.
pub const MIN_STOPPING_DISTANCE: f32 = 0.5;

/// Default layer bit carrying quarries.
pub const QUARRY_LAYER: u32 = 1 << 0;
/// Default layer bit carrying vision occluders.
pub const OBSTACLE_LAYER: u32 = 1 << 1;
