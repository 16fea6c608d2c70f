//! Tests for event delivery through the `EventSink` seam.

use std::sync::mpsc;

use glam::Vec3;
use mockall::mock;
use mockall::predicate::function;
use stalker::{BehaviourState, EventSink, Pursuer, PursuerConfig, PursuitEvent};
use test_utils::{RecordingBody, ScriptedWorld};

mock! {
    pub Sink {}
    impl EventSink for Sink {
        fn emit(&mut self, event: PursuitEvent);
    }
}

#[test]
fn caught_is_emitted_once_per_catch() {
    let mut sink = MockSink::new();
    sink.expect_emit()
        .with(function(|event: &PursuitEvent| {
            matches!(event, PursuitEvent::Caught { quarry: 4, .. })
        }))
        .times(1)
        .return_const(());
    sink.expect_emit()
        .with(function(|event: &PursuitEvent| {
            matches!(event, PursuitEvent::StateChanged { .. })
        }))
        .times(1)
        .return_const(());

    let world = ScriptedWorld::new().with_quarry(4, Vec3::new(0.0, 0.0, 1.0));
    let Ok(mut pursuer) = Pursuer::new(
        PursuerConfig::default(),
        world,
        RecordingBody::default(),
        sink,
        0,
    ) else {
        panic!("default config is valid");
    };
    for _ in 0..10 {
        pursuer.tick(0.1);
    }
    assert_eq!(pursuer.state(), BehaviourState::Chase);
}

#[test]
fn channel_sink_delivers_transitions_in_order() {
    let (tx, rx) = mpsc::channel();
    let Ok(mut pursuer) = Pursuer::new(
        PursuerConfig::default(),
        ScriptedWorld::new(),
        RecordingBody::default(),
        tx,
        0,
    ) else {
        panic!("default config is valid");
    };
    pursuer.alert();
    pursuer.tick(0.1);
    pursuer.kill();
    let received: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        received,
        vec![
            PursuitEvent::StateChanged {
                from: BehaviourState::Wait,
                to: BehaviourState::Chase,
            },
            PursuitEvent::StateChanged {
                from: BehaviourState::Chase,
                to: BehaviourState::Wait,
            },
            PursuitEvent::StateChanged {
                from: BehaviourState::Wait,
                to: BehaviourState::Dying,
            },
        ]
    );
}
