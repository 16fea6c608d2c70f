//! Pursuer configuration.
//!
//! [`PursuerConfig`] gathers every tunable of the controller in one
//! serde-loadable struct. It is validated once, before an agent is built, so a
//! malformed file never reaches the tick loop.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CHARGE_CHANCE_PER_SECOND, CHARGE_COOLDOWN, CHARGE_DISTANCE, CHARGE_FORWARD_VISION_ANGLE,
    CHARGE_MAX_DISTANCE, CHARGE_MIN_DISTANCE, CHARGE_SEARCH_ROTATION_SPEED,
    CHARGE_SEARCH_TIMEOUT, CHARGE_SPEED, CHASE_SPEED, CLOSE_CHASE_SPEED_FACTOR,
    DIRECT_CHARGE_CHANCE, FORWARD_VISION_ANGLE, FORWARD_VISION_BONUS, LOSE_TARGET_DISTANCE,
    MAX_TIME_CHASING, MAX_TIME_WAITING, MIN_CHASE_DISTANCE, MIN_STOPPING_DISTANCE,
    OBSTACLE_LAYER, QUARRY_LAYER, RADIUS_HIT, ROTATION_SPEED, VIEW_ANGLE, VIEW_RADIUS,
};

/// Bit mask selecting spatial layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Mask matching nothing.
    pub const NONE: Self = Self(0);

    /// True when the masks share at least one layer.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl From<u32> for LayerMask {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

/// Errors raised while loading or validating a [`PursuerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A parameter was NaN or infinite.
    #[error("`{field}` must be finite, got {value}")]
    NonFinite {
        /// Offending parameter.
        field: &'static str,
        /// Supplied value.
        value: f32,
    },
    /// A magnitude that must not be negative was.
    #[error("`{field}` must not be negative, got {value}")]
    Negative {
        /// Offending parameter.
        field: &'static str,
        /// Supplied value.
        value: f32,
    },
    /// A parameter that must be strictly positive was not.
    #[error("`{field}` must be greater than zero, got {value}")]
    NotPositive {
        /// Offending parameter.
        field: &'static str,
        /// Supplied value.
        value: f32,
    },
    /// Two parameters describing a range were inverted.
    #[error("`{lower_field}` ({lower}) must not exceed `{upper_field}` ({upper})")]
    InvertedRange {
        /// Parameter expected to be the smaller bound.
        lower_field: &'static str,
        /// Its value.
        lower: f32,
        /// Parameter expected to be the larger bound.
        upper_field: &'static str,
        /// Its value.
        upper: f32,
    },
    /// A cone angle was outside `(0, 360]` degrees.
    #[error("`{field}` must lie in (0, 360] degrees, got {value}")]
    AngleOutOfRange {
        /// Offending parameter.
        field: &'static str,
        /// Supplied value.
        value: f32,
    },
    /// A probability was outside `[0, 1]`.
    #[error("`{field}` must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange {
        /// Offending parameter.
        field: &'static str,
        /// Supplied value.
        value: f32,
    },
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration text was not valid JSON for [`PursuerConfig`].
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Every tunable of the pursuit controller.
///
/// Distances are world units, times are seconds, angles are full cone widths
/// in degrees and rotation speeds are degrees per second. Missing JSON fields
/// fall back to the defaults in [`crate::constants`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PursuerConfig {
    /// Movement speed while chasing.
    pub chase_speed: f32,
    /// Seconds the chase may continue without seeing the quarry.
    pub max_time_chasing: f32,
    /// Seconds spent idling before a charge search starts.
    pub max_time_waiting: f32,
    /// Distance at which the quarry counts as caught.
    pub radius_hit: f32,
    /// Chase is abandoned beyond this distance.
    pub lose_target_distance: f32,
    /// Inside this distance the chase slows down.
    pub min_chase_distance: f32,
    /// Multiplier applied to `chase_speed` inside `min_chase_distance`.
    pub close_chase_speed_factor: f32,

    /// Base turn rate used when facing the target.
    pub rotation_speed: f32,
    /// When false the controller never steers facing outside charge states.
    pub use_custom_rotation: bool,

    /// Radius of the peripheral vision cone.
    pub view_radius: f32,
    /// Width of the peripheral vision cone.
    pub view_angle: f32,
    /// Extra radius granted inside the forward cone.
    pub forward_vision_bonus: f32,
    /// Width of the forward, extended-range cone.
    pub forward_vision_angle: f32,
    /// Layers carrying quarries.
    pub target_mask: LayerMask,
    /// Layers that block line of sight.
    pub obstacle_mask: LayerMask,

    /// Movement speed while charging.
    pub charge_speed: f32,
    /// Furthest a single charge travels from its start.
    pub charge_distance: f32,
    /// Closest the quarry may be for a charge to start.
    pub charge_min_distance: f32,
    /// Furthest the quarry may be for a charge to start; also the charge
    /// vision radius.
    pub charge_max_distance: f32,
    /// Width of the cone that locks a charge target.
    pub charge_forward_vision_angle: f32,
    /// Seconds before another charge may start.
    pub charge_cooldown: f32,
    /// Seconds spent scanning for a charge target.
    pub charge_search_timeout: f32,
    /// Scan turn rate while searching for a charge target.
    pub charge_search_rotation_speed: f32,
    /// Chance per second of a charge while chasing inside the charge window.
    pub charge_chance_per_second: f32,
    /// Chance of a charge when the quarry is first spotted from `Wait`.
    pub direct_charge_chance: f32,
    /// Lower bound on the arrival tolerance of a charge.
    pub min_stopping_distance: f32,
}

impl Default for PursuerConfig {
    fn default() -> Self {
        Self {
            chase_speed: CHASE_SPEED,
            max_time_chasing: MAX_TIME_CHASING,
            max_time_waiting: MAX_TIME_WAITING,
            radius_hit: RADIUS_HIT,
            lose_target_distance: LOSE_TARGET_DISTANCE,
            min_chase_distance: MIN_CHASE_DISTANCE,
            close_chase_speed_factor: CLOSE_CHASE_SPEED_FACTOR,
            rotation_speed: ROTATION_SPEED,
            use_custom_rotation: true,
            view_radius: VIEW_RADIUS,
            view_angle: VIEW_ANGLE,
            forward_vision_bonus: FORWARD_VISION_BONUS,
            forward_vision_angle: FORWARD_VISION_ANGLE,
            target_mask: LayerMask(QUARRY_LAYER),
            obstacle_mask: LayerMask(OBSTACLE_LAYER),
            charge_speed: CHARGE_SPEED,
            charge_distance: CHARGE_DISTANCE,
            charge_min_distance: CHARGE_MIN_DISTANCE,
            charge_max_distance: CHARGE_MAX_DISTANCE,
            charge_forward_vision_angle: CHARGE_FORWARD_VISION_ANGLE,
            charge_cooldown: CHARGE_COOLDOWN,
            charge_search_timeout: CHARGE_SEARCH_TIMEOUT,
            charge_search_rotation_speed: CHARGE_SEARCH_ROTATION_SPEED,
            charge_chance_per_second: CHARGE_CHANCE_PER_SECOND,
            direct_charge_chance: DIRECT_CHARGE_CHANCE,
            min_stopping_distance: MIN_STOPPING_DISTANCE,
        }
    }
}

fn finite(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if finite(field, value)? < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if finite(field, value)? <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

fn cone_angle(field: &'static str, value: f32) -> Result<(), ConfigError> {
    let angle = finite(field, value)?;
    if angle <= 0.0 || angle > 360.0 {
        return Err(ConfigError::AngleOutOfRange { field, value });
    }
    Ok(())
}

fn probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&finite(field, value)?) {
        return Err(ConfigError::ProbabilityOutOfRange { field, value });
    }
    Ok(())
}

fn ordered(
    lower_field: &'static str,
    lower: f32,
    upper_field: &'static str,
    upper: f32,
) -> Result<(), ConfigError> {
    if lower > upper {
        return Err(ConfigError::InvertedRange {
            lower_field,
            lower,
            upper_field,
            upper,
        });
    }
    Ok(())
}

impl PursuerConfig {
    /// Checks every parameter and the relations between them.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("chase_speed", self.chase_speed),
            ("max_time_chasing", self.max_time_chasing),
            ("max_time_waiting", self.max_time_waiting),
            ("min_chase_distance", self.min_chase_distance),
            ("rotation_speed", self.rotation_speed),
            ("view_radius", self.view_radius),
            ("forward_vision_bonus", self.forward_vision_bonus),
            ("charge_speed", self.charge_speed),
            ("charge_min_distance", self.charge_min_distance),
            ("charge_cooldown", self.charge_cooldown),
            ("charge_search_timeout", self.charge_search_timeout),
            ("charge_search_rotation_speed", self.charge_search_rotation_speed),
            ("charge_chance_per_second", self.charge_chance_per_second),
            ("min_stopping_distance", self.min_stopping_distance),
        ] {
            non_negative(field, value)?;
        }

        positive("radius_hit", self.radius_hit)?;
        positive("lose_target_distance", self.lose_target_distance)?;
        positive("charge_distance", self.charge_distance)?;
        positive("charge_max_distance", self.charge_max_distance)?;

        cone_angle("view_angle", self.view_angle)?;
        cone_angle("forward_vision_angle", self.forward_vision_angle)?;
        cone_angle("charge_forward_vision_angle", self.charge_forward_vision_angle)?;

        probability("close_chase_speed_factor", self.close_chase_speed_factor)?;
        probability("direct_charge_chance", self.direct_charge_chance)?;

        ordered(
            "charge_min_distance",
            self.charge_min_distance,
            "charge_max_distance",
            self.charge_max_distance,
        )?;
        ordered(
            "radius_hit",
            self.radius_hit,
            "lose_target_distance",
            self.lose_target_distance,
        )?;
        ordered(
            "min_chase_distance",
            self.min_chase_distance,
            "lose_target_distance",
            self.lose_target_distance,
        )?;
        Ok(())
    }

    /// Radius of the extended forward vision cone.
    #[must_use]
    pub fn extended_view_radius(&self) -> f32 {
        self.view_radius + self.forward_vision_bonus
    }

    /// Radius of the single broad query issued each tick.
    #[must_use]
    pub fn perception_radius(&self) -> f32 {
        self.extended_view_radius().max(self.charge_max_distance)
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation
    /// error for out-of-range values.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`Self::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_are_valid() {
        assert!(PursuerConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_charge_window() {
        let config = PursuerConfig {
            charge_min_distance: 30.0,
            charge_max_distance: 10.0,
            ..PursuerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange {
                lower_field: "charge_min_distance",
                ..
            })
        ));
    }

    #[rstest]
    #[case::nan_speed(PursuerConfig { chase_speed: f32::NAN, ..PursuerConfig::default() })]
    #[case::negative_cooldown(PursuerConfig { charge_cooldown: -1.0, ..PursuerConfig::default() })]
    #[case::zero_hit_radius(PursuerConfig { radius_hit: 0.0, ..PursuerConfig::default() })]
    #[case::wide_cone(PursuerConfig { view_angle: 400.0, ..PursuerConfig::default() })]
    #[case::chance_above_one(PursuerConfig { direct_charge_chance: 1.5, ..PursuerConfig::default() })]
    #[case::lose_inside_hit(PursuerConfig { lose_target_distance: 1.0, ..PursuerConfig::default() })]
    fn rejects_malformed_values(#[case] config: PursuerConfig) {
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = PursuerConfig::from_json_str(r#"{ "chase_speed": 7.5, "target_mask": 4 }"#);
        let Ok(config) = config else {
            panic!("partial config should parse: {config:?}");
        };
        assert!((config.chase_speed - 7.5).abs() < f32::EPSILON);
        assert_eq!(config.target_mask, LayerMask(4));
        assert!((config.view_radius - VIEW_RADIUS).abs() < f32::EPSILON);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            PursuerConfig::from_json_str(r#"{ "chase_sped": 1.0 }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn perception_radius_covers_both_cones() {
        let config = PursuerConfig::default();
        assert!((config.perception_radius() - CHARGE_MAX_DISTANCE).abs() < f32::EPSILON);
    }
}
