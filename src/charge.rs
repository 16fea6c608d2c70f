//! Charge subsystem: trigger roll, locked rush and cooldown.

use glam::Vec3;
use rand::Rng;
use serde::Serialize;

use crate::timers::Stopwatch;

/// Gate that keeps charges apart in time.
///
/// While active the timer counts up; it deactivates in the same tick the
/// timer reaches `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cooldown {
    timer: Stopwatch,
    active: bool,
    duration: f32,
}

impl Cooldown {
    /// Idle cooldown lasting `duration` seconds once started.
    #[must_use]
    pub const fn new(duration: f32) -> Self {
        Self {
            timer: Stopwatch::new(),
            active: false,
            duration,
        }
    }

    /// Starts the cooldown from zero.
    pub fn start(&mut self) {
        self.timer.reset();
        self.active = true;
    }

    /// Resets the timer without activating the cooldown.
    pub fn restart_idle(&mut self) {
        self.timer.reset();
        self.active = false;
    }

    /// Advances an active cooldown; returns `true` on the tick it expires.
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.timer.advance(dt);
        if self.timer.elapsed() >= self.duration {
            self.active = false;
            return true;
        }
        false
    }

    /// True while charges are blocked.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Seconds since the cooldown last started.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.timer.elapsed()
    }
}

/// Draws one uniform sample and compares it against `chance`.
///
/// `chance` is clamped to `[0, 1]`, so zero never fires and one always does.
pub fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f32) -> bool {
    let chance = if chance.is_nan() { 0.0 } else { chance.clamp(0.0, 1.0) };
    rng.gen::<f32>() < chance
}

/// True when `distance` lies inside `[min, max]`.
#[must_use]
pub fn in_charge_window(distance: f32, min: f32, max: f32) -> bool {
    (min..=max).contains(&distance)
}

/// Point a charge is committed to and where it started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChargeLock {
    /// Locked destination; never follows the quarry afterwards.
    pub target: Vec3,
    /// Agent position when the lock was taken.
    pub start: Vec3,
}

/// Why a charge ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChargeOutcome {
    /// The live quarry came within the hit radius.
    Caught,
    /// The rush covered its maximum distance.
    DistanceCovered,
    /// The locked point was reached.
    Arrived,
}

/// Inputs to [`ChargeLock::evaluate`] for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeProgress {
    /// Current agent position.
    pub position: Vec3,
    /// Distance to the live quarry, if one is known.
    pub quarry_distance: Option<f32>,
    /// Path distance left to the locked point.
    pub remaining: f32,
    /// Arrival tolerance.
    pub stopping: f32,
}

impl ChargeLock {
    /// Locks `target` from `start`.
    #[must_use]
    pub const fn new(target: Vec3, start: Vec3) -> Self {
        Self { target, start }
    }

    /// Unit direction of the rush on the ground plane.
    #[must_use]
    pub fn direction(&self, from: Vec3) -> Vec3 {
        let delta = self.target - from;
        crate::geometry::vec_normalize(Vec3::new(delta.x, 0.0, delta.z))
    }

    /// Checks the termination conditions in priority order: catch, distance
    /// covered, arrival.
    #[must_use]
    pub fn evaluate(
        &self,
        progress: ChargeProgress,
        radius_hit: f32,
        charge_distance: f32,
    ) -> Option<ChargeOutcome> {
        if progress
            .quarry_distance
            .is_some_and(|distance| distance <= radius_hit)
        {
            return Some(ChargeOutcome::Caught);
        }
        if progress.position.distance(self.start) >= charge_distance {
            return Some(ChargeOutcome::DistanceCovered);
        }
        if progress.remaining < progress.stopping {
            return Some(ChargeOutcome::Arrived);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    #[test]
    fn cooldown_expires_in_the_same_tick() {
        let mut cooldown = Cooldown::new(1.0);
        cooldown.start();
        assert!(!cooldown.advance(0.6));
        assert!(cooldown.is_active());
        assert!(cooldown.advance(0.6));
        assert!(!cooldown.is_active());
        assert!(!cooldown.advance(0.6));
    }

    #[test]
    fn restart_idle_does_not_activate() {
        let mut cooldown = Cooldown::new(1.0);
        cooldown.start();
        cooldown.advance(0.5);
        cooldown.restart_idle();
        assert!(!cooldown.is_active());
        assert!(cooldown.elapsed().abs() < f32::EPSILON);
    }

    #[rstest]
    #[case::never(0.0, false)]
    #[case::always(1.0, true)]
    #[case::clamped_high(3.0, true)]
    #[case::clamped_low(-2.0, false)]
    #[case::nan(f32::NAN, false)]
    fn roll_respects_extremes(#[case] chance: f32, #[case] expected: bool) {
        let mut rng = StdRng::seed_from_u64(9);
        assert!((0..32).all(|_| roll(&mut rng, chance) == expected));
    }

    #[rstest]
    #[case::caught(Some(1.0), Vec3::new(0.0, 0.0, 3.0), 10.0, Some(ChargeOutcome::Caught))]
    #[case::covered(Some(9.0), Vec3::new(0.0, 0.0, 25.0), 10.0, Some(ChargeOutcome::DistanceCovered))]
    #[case::arrived(None, Vec3::new(0.0, 0.0, 9.8), 0.2, Some(ChargeOutcome::Arrived))]
    #[case::running(Some(9.0), Vec3::new(0.0, 0.0, 3.0), 7.0, None)]
    fn evaluates_termination_in_order(
        #[case] quarry_distance: Option<f32>,
        #[case] position: Vec3,
        #[case] remaining: f32,
        #[case] expected: Option<ChargeOutcome>,
    ) {
        let lock = ChargeLock::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let progress = ChargeProgress {
            position,
            quarry_distance,
            remaining,
            stopping: 0.5,
        };
        assert_eq!(lock.evaluate(progress, 1.5, 25.0), expected);
    }

    #[test]
    fn charge_window_is_inclusive() {
        assert!(in_charge_window(8.0, 8.0, 25.0));
        assert!(in_charge_window(25.0, 8.0, 25.0));
        assert!(!in_charge_window(7.9, 8.0, 25.0));
    }
}
