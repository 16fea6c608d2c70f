//! Transition table tests for the pursuit state machine.

use glam::Vec3;
use rstest::{fixture, rstest};
use stalker::{BehaviourState, PursuerConfig, PursuitEvent};
use test_utils::{assert_close, drive, pursuer, pursuer_with, quarry_at_yaw, ScriptedWorld};

const QUARRY: u64 = 1;

#[fixture]
fn fixed_facing() -> PursuerConfig {
    PursuerConfig {
        use_custom_rotation: false,
        ..PursuerConfig::default()
    }
}

#[test]
fn chase_without_quarry_returns_to_wait() {
    let mut p = pursuer(ScriptedWorld::new());
    p.alert();
    assert_eq!(p.tick(0.1), BehaviourState::Wait);
    assert_eq!(p.target(), None);
}

#[test]
fn chase_gives_up_beyond_lose_distance() {
    // Peripheral cone only reaches 12, so the quarry is tracked but unseen.
    let world = ScriptedWorld::new().with_quarry(QUARRY, quarry_at_yaw(30.0, 16.0));
    let mut p = pursuer(world);
    p.alert();
    assert_eq!(p.tick(0.1), BehaviourState::Wait);
    assert!(!p.is_detecting());
}

#[rstest]
#[case::far(5.0, 5.0)]
#[case::close(1.8, 3.5)]
fn chase_speed_depends_on_distance(#[case] distance: f32, #[case] expected: f32) {
    let world = ScriptedWorld::new().with_quarry(QUARRY, Vec3::new(0.0, 0.0, distance));
    let mut p = pursuer(world);
    p.alert();
    p.tick(0.1);
    assert_eq!(p.state(), BehaviourState::Chase);
    assert_close(p.body().speed, expected, 1e-5);
    assert_eq!(p.body().destination, Vec3::new(0.0, 0.0, distance));
    assert!(!p.body().stopped);
}

#[rstest]
fn unseen_chase_times_out(fixed_facing: PursuerConfig) {
    let world = ScriptedWorld::new().with_quarry(QUARRY, quarry_at_yaw(180.0, 6.0));
    let mut p = pursuer_with(fixed_facing, world, 0);
    p.alert();
    let states = drive(&mut p, 10, 1.0);
    let chasing = states
        .iter()
        .filter(|state| **state == BehaviourState::Chase)
        .count();
    assert_eq!(chasing, 9);
    assert_eq!(states.last(), Some(&BehaviourState::Wait));
}

#[test]
fn wait_checks_after_advancing_but_charge_search_checks_before() {
    use BehaviourState::{ChargeSearch, Wait};
    let mut p = pursuer(ScriptedWorld::new());
    // Wait expires in the tick its timer passes 3s; the search needs one
    // more tick after passing 1.5s.
    assert_eq!(
        drive(&mut p, 7, 1.0),
        vec![Wait, Wait, Wait, ChargeSearch, ChargeSearch, ChargeSearch, Wait]
    );
}

#[test]
fn seen_quarry_keeps_chase_timer_at_zero() {
    let world = ScriptedWorld::new().with_quarry(QUARRY, Vec3::new(0.0, 0.0, 5.0));
    let mut p = pursuer(world);
    p.alert();
    let states = drive(&mut p, 20, 1.0);
    assert!(states.iter().all(|state| *state == BehaviourState::Chase));
    assert_close(p.timers().chase.elapsed(), 0.0, f32::EPSILON);
}

#[rstest]
#[case::certain(100.0, BehaviourState::ChargeSearch)]
#[case::disabled(0.0, BehaviourState::Chase)]
fn chase_rolls_for_a_charge_inside_the_window(
    #[case] chance: f32,
    #[case] expected: BehaviourState,
) {
    let config = PursuerConfig {
        charge_chance_per_second: chance,
        ..PursuerConfig::default()
    };
    // Outside the charge cone, inside the peripheral one.
    let world = ScriptedWorld::new().with_quarry(QUARRY, quarry_at_yaw(30.0, 10.0));
    let mut p = pursuer_with(config, world, 0);
    p.alert();
    assert_eq!(p.tick(0.1), expected);
}

#[rstest]
#[case::certain(1.0, BehaviourState::ChargeSearch)]
#[case::disabled(0.0, BehaviourState::Chase)]
fn wait_may_charge_on_first_sight(#[case] chance: f32, #[case] expected: BehaviourState) {
    let config = PursuerConfig {
        direct_charge_chance: chance,
        ..PursuerConfig::default()
    };
    let world = ScriptedWorld::new().with_quarry(QUARRY, quarry_at_yaw(30.0, 10.0));
    let mut p = pursuer_with(config, world, 0);
    assert_eq!(p.tick(0.1), expected);
}

#[test]
fn charge_search_sweeps_until_the_quarry_enters_the_charge_cone() {
    let config = PursuerConfig {
        direct_charge_chance: 1.0,
        ..PursuerConfig::default()
    };
    let quarry = quarry_at_yaw(30.0, 10.0);
    let world = ScriptedWorld::new().with_quarry(QUARRY, quarry);
    let mut p = pursuer_with(config, world, 0);
    assert_eq!(p.tick(0.25), BehaviourState::ChargeSearch);
    assert_eq!(p.tick(0.25), BehaviourState::ChargeSearch);
    assert!(p.body().stopped);
    assert_eq!(p.tick(0.25), BehaviourState::Charge);
    assert_eq!(p.charge_target(), Some(quarry));
}

#[test]
fn charge_vision_short_circuits_from_chase() {
    let quarry = Vec3::new(0.0, 0.0, 12.0);
    let world = ScriptedWorld::new().with_quarry(QUARRY, quarry);
    let mut p = pursuer(world);
    p.alert();
    assert_eq!(p.tick(0.1), BehaviourState::Charge);
    assert_eq!(p.charge_target(), Some(quarry));
    assert_eq!(p.body().destination, quarry);
    assert!(!p.is_detecting());
    assert!(!p.cooldown().is_active());
    assert_eq!(
        p.events().last(),
        Some(&PursuitEvent::StateChanged {
            from: BehaviourState::Chase,
            to: BehaviourState::Charge,
        })
    );
}

#[test]
fn occluded_quarry_is_ignored() {
    let mut world = ScriptedWorld::new().with_quarry(QUARRY, Vec3::new(0.0, 0.0, 5.0));
    world.block_sight(true);
    let mut p = pursuer(world);
    assert_eq!(p.tick(0.1), BehaviourState::Wait);
    assert!(!p.is_detecting());
    assert_eq!(p.target(), Some(Vec3::new(0.0, 0.0, 5.0)));
}

#[rstest]
#[case::from_wait(false)]
#[case::from_chase(true)]
fn kill_is_absorbing(#[case] chase_first: bool) {
    let world = ScriptedWorld::new().with_quarry(QUARRY, Vec3::new(0.0, 0.0, 5.0));
    let mut p = pursuer(world);
    if chase_first {
        p.alert();
        p.tick(0.1);
    }
    p.kill();
    let events_at_death = p.events().len();
    p.alert();
    p.kill();
    assert!(drive(&mut p, 5, 0.1)
        .iter()
        .all(|state| *state == BehaviourState::Dying));
    assert_eq!(p.events().len(), events_at_death);
    assert!(!p.is_detecting());
    assert!(p.body().stopped);
}

#[test]
fn entering_a_state_leaves_its_timer_at_zero() {
    let mut p = pursuer(ScriptedWorld::new());
    drive(&mut p, 3, 0.5);
    assert_close(p.timers().wait.elapsed(), 1.5, 1e-5);
    p.alert();
    assert_close(p.timers().chase.elapsed(), 0.0, f32::EPSILON);
    p.tick(0.5);
    assert_eq!(p.state(), BehaviourState::Wait);
    assert_close(p.timers().wait.elapsed(), 0.0, f32::EPSILON);
}

#[test]
fn repeated_alert_does_not_restart_timers() {
    let world = ScriptedWorld::new().with_quarry(QUARRY, quarry_at_yaw(180.0, 6.0));
    let mut p = pursuer_with(
        PursuerConfig {
            use_custom_rotation: false,
            ..PursuerConfig::default()
        },
        world,
        0,
    );
    p.alert();
    drive(&mut p, 2, 1.0);
    p.alert();
    assert_close(p.timers().chase.elapsed(), 2.0, 1e-5);
}

#[test]
fn chase_turns_towards_the_quarry() {
    let world = ScriptedWorld::new().with_quarry(QUARRY, quarry_at_yaw(90.0, 5.0));
    let mut p = pursuer(world);
    p.alert();
    p.tick(0.1);
    // 120 deg/s scaled by 1.5 for a tenth of a second.
    let facing = p.body().pose.forward;
    assert_close(facing.x, 18.0_f32.to_radians().sin(), 1e-4);
    assert_close(facing.z, 18.0_f32.to_radians().cos(), 1e-4);
}

#[test]
fn first_sighting_turns_at_the_chase_rate() {
    let world = ScriptedWorld::new().with_quarry(QUARRY, quarry_at_yaw(30.0, 5.0));
    let mut p = pursuer(world);
    assert_eq!(p.tick(0.1), BehaviourState::Chase);
    assert_eq!(p.body().facings.len(), 1);
    let facing = p.body().pose.forward;
    assert_close(facing.x, 18.0_f32.to_radians().sin(), 1e-4);
    assert_close(facing.z, 18.0_f32.to_radians().cos(), 1e-4);
}

#[test]
fn waiting_without_sight_keeps_its_facing() {
    let mut world = ScriptedWorld::new().with_quarry(QUARRY, quarry_at_yaw(30.0, 5.0));
    world.block_sight(true);
    let mut p = pursuer(world);
    let states = drive(&mut p, 5, 0.1);
    assert!(states.iter().all(|state| *state == BehaviourState::Wait));
    assert!(p.target().is_some());
    assert!(p.body().facings.is_empty());
}

#[test]
fn disabled_rotation_leaves_facing_alone() {
    let world = ScriptedWorld::new().with_quarry(QUARRY, quarry_at_yaw(90.0, 5.0));
    let mut p = pursuer_with(
        PursuerConfig {
            use_custom_rotation: false,
            ..PursuerConfig::default()
        },
        world,
        0,
    );
    p.alert();
    p.tick(0.1);
    assert!(p.body().facings.is_empty());
}

#[test]
fn one_broad_query_per_tick() {
    let mut p = pursuer(ScriptedWorld::new());
    drive(&mut p, 4, 0.1);
    assert_eq!(p.spatial().query_count(), 4);
}
