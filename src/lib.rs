//! Pursuit and charge-attack behaviour for a single antagonist agent.
//!
//! A [`Pursuer`] waits and scans, detects its quarry through vision cones
//! and line-of-sight checks, chases, and now and then commits to a
//! high-speed charge at a locked point. The world is reached only through
//! the [`SpatialQuery`] and [`Locomotion`] traits, and observers hear about
//! catches and state changes through an [`EventSink`].
//!
//! ```rust
//! use stalker::prelude::*;
//! use stalker::sim::{Arena, KinematicBody};
//!
//! let mut pursuer = Pursuer::new(
//!     PursuerConfig::default(),
//!     Arena::default(),
//!     KinematicBody::new(Pose::default()),
//!     NullSink,
//!     7,
//! )?;
//! assert_eq!(pursuer.tick(0.1), BehaviourState::Wait);
//! # Ok::<(), stalker::ConfigError>(())
//! ```
pub mod charge;
pub mod config;
pub mod constants;
pub mod controller;
pub mod events;
pub mod geometry;
pub mod locomotion;
pub mod logging;
pub mod numeric;
pub mod perception;
pub mod sim;
pub mod snapshot;
pub mod state;
pub mod timers;

pub use charge::{ChargeLock, ChargeOutcome, Cooldown};
pub use config::{ConfigError, LayerMask, PursuerConfig};
pub use controller::Pursuer;
pub use events::{EventSink, NullSink, PursuitEvent};
pub use geometry::{angle_between_deg, has_line_of_sight, in_cone, vec_normalize, within_range};
pub use locomotion::{Locomotion, Pose};
pub use logging::init as init_logging;
pub use perception::{EntityRef, PerceptionResult, SpatialQuery, VisionZone};
pub use snapshot::PursuerSnapshot;
pub use state::BehaviourState;

pub mod prelude {
    //! Prelude exports used in documentation examples and tests.
    //!
    //! ```rust,no_run
    //! use stalker::prelude::*;
    //! ```

    pub use crate::BehaviourState;
    pub use crate::EntityRef;
    pub use crate::EventSink;
    pub use crate::LayerMask;
    pub use crate::Locomotion;
    pub use crate::NullSink;
    pub use crate::Pose;
    pub use crate::Pursuer;
    pub use crate::PursuerConfig;
    pub use crate::PursuitEvent;
    pub use crate::SpatialQuery;
    pub use glam::Vec3;
}
