//! Events published by the pursuer.
//!
//! The controller reports catches and state changes through an injected
//! [`EventSink`]. Game-over handling, audio cues and animation selection live
//! behind that seam.

use std::sync::mpsc::Sender;

use glam::Vec3;
use serde::Serialize;

use crate::state::BehaviourState;

/// Something observable happened to the pursuer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PursuitEvent {
    /// The quarry came within the hit radius. Fired once per catch.
    Caught {
        /// Entity that was caught.
        quarry: u64,
        /// Where the pursuer stood.
        position: Vec3,
    },
    /// The behavioural state changed.
    StateChanged {
        /// Previous state.
        from: BehaviourState,
        /// New state.
        to: BehaviourState,
    },
}

/// Receiver of [`PursuitEvent`]s.
pub trait EventSink {
    /// Accepts one event. Must not call back into the pursuer.
    fn emit(&mut self, event: PursuitEvent);
}

/// Collects events for later inspection.
impl EventSink for Vec<PursuitEvent> {
    fn emit(&mut self, event: PursuitEvent) {
        self.push(event);
    }
}

/// Forwards events to another thread; a hung-up receiver is ignored.
impl EventSink for Sender<PursuitEvent> {
    fn emit(&mut self, event: PursuitEvent) {
        if self.send(event).is_err() {
            log::debug!("event receiver dropped; discarding {event:?}");
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: PursuitEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn channel_sink_survives_dropped_receiver() {
        let (mut tx, rx) = mpsc::channel();
        tx.emit(PursuitEvent::StateChanged {
            from: BehaviourState::Wait,
            to: BehaviourState::Chase,
        });
        assert_eq!(rx.try_iter().count(), 1);
        drop(rx);
        tx.emit(PursuitEvent::Caught {
            quarry: 1,
            position: Vec3::ZERO,
        });
    }
}
