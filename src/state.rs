//! Behavioural states of the pursuer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The single active behaviour of a pursuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BehaviourState {
    /// Holding position and scanning.
    #[default]
    Wait,
    /// Running after the quarry.
    Chase,
    /// Standing still and sweeping for a charge target.
    ChargeSearch,
    /// Rushing a locked point.
    Charge,
    /// Absorbing terminal state.
    Dying,
}

impl BehaviourState {
    /// True for the two states driven by the charge subsystem.
    #[must_use]
    pub const fn is_charge(self) -> bool {
        matches!(self, Self::ChargeSearch | Self::Charge)
    }

    /// True for the absorbing state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Dying)
    }
}

impl fmt::Display for BehaviourState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Wait => "wait",
            Self::Chase => "chase",
            Self::ChargeSearch => "charge-search",
            Self::Charge => "charge",
            Self::Dying => "dying",
        };
        f.write_str(name)
    }
}
