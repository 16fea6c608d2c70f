//! The pursuit state machine.
//!
//! [`Pursuer`] owns one agent's behaviour. Every call to [`Pursuer::tick`]
//! runs, in order: the cooldown, perception (which may force an immediate
//! charge), the active state's update and finally facing control. The
//! collaborators are injected at construction and never looked up.

use glam::Vec3;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::charge::{self, ChargeLock, ChargeOutcome, ChargeProgress, Cooldown};
use crate::config::{ConfigError, PursuerConfig};
use crate::constants::CHASE_TURN_FACTOR;
use crate::events::{EventSink, PursuitEvent};
use crate::geometry::{forward_from_yaw, rotate_towards, wrap_deg, yaw_deg};
use crate::locomotion::Locomotion;
use crate::perception::{EntityRef, Perception, PerceptionResult, SpatialQuery};
use crate::snapshot::PursuerSnapshot;
use crate::state::BehaviourState;
use crate::timers::StateTimers;

/// A single pursuing agent and its collaborators.
#[derive(Debug)]
pub struct Pursuer<Q, L, E> {
    config: PursuerConfig,
    perception: Perception,
    spatial: Q,
    body: L,
    events: E,
    rng: StdRng,
    state: BehaviourState,
    detecting: bool,
    caught: bool,
    target: Option<EntityRef>,
    sensed: PerceptionResult,
    timers: StateTimers,
    cooldown: Cooldown,
    charge: Option<ChargeLock>,
    search_yaw: f32,
    ticks: u64,
}

impl<Q, L, E> Pursuer<Q, L, E>
where
    Q: SpatialQuery,
    L: Locomotion,
    E: EventSink,
{
    /// Validates `config` and builds a pursuer waiting in place.
    ///
    /// `seed` drives every charge roll, so identical inputs replay
    /// identically.
    ///
    /// # Errors
    /// Returns the [`ConfigError`] reported by [`PursuerConfig::validate`].
    pub fn new(
        config: PursuerConfig,
        spatial: Q,
        body: L,
        events: E,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut pursuer = Self {
            perception: Perception::new(&config),
            cooldown: Cooldown::new(config.charge_cooldown),
            config,
            spatial,
            body,
            events,
            rng: StdRng::seed_from_u64(seed),
            state: BehaviourState::Wait,
            detecting: false,
            caught: false,
            target: None,
            sensed: PerceptionResult::default(),
            timers: StateTimers::default(),
            charge: None,
            search_yaw: 0.0,
            ticks: 0,
        };
        pursuer.enter(BehaviourState::Wait);
        Ok(pursuer)
    }

    /// Advances the behaviour by `dt` seconds and returns the active state.
    ///
    /// Non-finite or negative steps are treated as zero.
    pub fn tick(&mut self, dt: f32) -> BehaviourState {
        let dt = sanitise_dt(dt);
        self.ticks += 1;
        if self.state.is_terminal() {
            return self.state;
        }

        if self.cooldown.advance(dt) {
            debug!("charge cooldown expired");
            if self.state == BehaviourState::Wait {
                self.timers.wait.reset();
            }
        }

        self.perceive();

        match self.state {
            BehaviourState::Wait => self.update_wait(dt),
            BehaviourState::Chase => self.update_chase(dt),
            BehaviourState::ChargeSearch => self.update_charge_search(dt),
            BehaviourState::Charge => self.update_charge(),
            BehaviourState::Dying => {}
        }

        self.handle_rotation(dt);
        self.state
    }

    /// Kills the agent. Safe to call at any time.
    pub fn kill(&mut self) {
        self.transition(BehaviourState::Dying);
    }

    /// External stimulus: start chasing unless dead.
    pub fn alert(&mut self) {
        info!("pursuer alerted");
        self.transition(BehaviourState::Chase);
    }

    fn perceive(&mut self) {
        let pose = self.body.pose();
        let sensed = self.perception.sense(&self.spatial, pose);
        self.sensed = sensed;
        self.target = sensed.candidate;

        let can_short_circuit = sensed.in_charge_vision
            && !self.cooldown.is_active()
            && !self.state.is_charge()
            && !self.state.is_terminal();
        if can_short_circuit {
            if let Some(quarry) = sensed.candidate {
                self.lock_charge(quarry, pose.position);
                self.detecting = false;
                self.transition(BehaviourState::Charge);
                return;
            }
        }

        if self.state.is_charge() {
            self.detecting = false;
            return;
        }

        self.detecting = sensed.in_vision;
        if self.detecting && self.state != BehaviourState::Wait {
            self.transition(BehaviourState::Chase);
        }
    }

    fn update_wait(&mut self, dt: f32) {
        self.hold_position();

        if self.cooldown.is_active() {
            if self.detecting {
                self.transition(BehaviourState::Chase);
            }
            return;
        }

        if self.detecting {
            let in_window = charge::in_charge_window(
                self.sensed.distance,
                self.config.charge_min_distance,
                self.config.charge_max_distance,
            );
            if in_window && charge::roll(&mut self.rng, self.config.direct_charge_chance) {
                debug!("direct charge from wait");
                self.transition(BehaviourState::ChargeSearch);
            } else {
                self.transition(BehaviourState::Chase);
            }
            return;
        }

        self.timers.wait.advance(dt);
        if self.timers.wait.exceeded(self.config.max_time_waiting) {
            self.caught = false;
            self.transition(BehaviourState::ChargeSearch);
        }
    }

    fn update_chase(&mut self, dt: f32) {
        let Some(quarry) = self.target else {
            debug!("chase lost its target");
            self.transition(BehaviourState::Wait);
            return;
        };
        let position = self.body.pose().position;
        let distance = position.distance(quarry.position);

        if distance > self.config.lose_target_distance {
            debug!("quarry {} out of range at {distance:.2}", quarry.id);
            self.transition(BehaviourState::Wait);
            return;
        }

        if distance <= self.config.radius_hit {
            self.register_catch(quarry, position);
            self.halt();
            return;
        }

        let may_charge = !self.cooldown.is_active()
            && charge::in_charge_window(
                distance,
                self.config.charge_min_distance,
                self.config.charge_max_distance,
            );
        if may_charge && charge::roll(&mut self.rng, self.config.charge_chance_per_second * dt) {
            debug!("charge roll succeeded at {distance:.2}");
            self.transition(BehaviourState::ChargeSearch);
            return;
        }

        let speed = if distance <= self.config.min_chase_distance {
            self.config.chase_speed * self.config.close_chase_speed_factor
        } else {
            self.config.chase_speed
        };
        self.body.set_stopped(false);
        self.body.set_speed(speed);
        self.body.set_destination(quarry.position);

        if self.timers.chase.exceeded(self.config.max_time_chasing) {
            debug!("gave up the chase");
            self.transition(BehaviourState::Wait);
        } else if self.detecting {
            self.timers.chase.reset();
        } else {
            self.timers.chase.advance(dt);
        }
    }

    fn update_charge_search(&mut self, dt: f32) {
        self.halt();
        self.search_yaw = wrap_deg(self.search_yaw + self.config.charge_search_rotation_speed * dt);
        self.body.set_facing(forward_from_yaw(self.search_yaw));

        if self.sensed.in_charge_vision {
            if let Some(quarry) = self.sensed.candidate {
                let start = self.body.pose().position;
                self.lock_charge(quarry, start);
                self.transition(BehaviourState::Charge);
                return;
            }
        }

        if self.timers.charge_search.exceeded(self.config.charge_search_timeout) {
            debug!("charge search timed out");
            self.transition(BehaviourState::Wait);
            self.cooldown.start();
            return;
        }
        self.timers.charge_search.advance(dt);
    }

    fn update_charge(&mut self) {
        let Some(lock) = self.charge else {
            warn!("charging without a lock; returning to wait");
            self.finish_charge();
            return;
        };
        let position = self.body.pose().position;

        self.body.set_stopped(false);
        self.body.set_speed(self.config.charge_speed);
        self.body.set_destination(lock.target);
        let heading = lock.direction(position);
        if heading != Vec3::ZERO {
            self.body.set_facing(heading);
        }

        let progress = ChargeProgress {
            position,
            quarry_distance: self
                .target
                .map(|quarry| position.distance(quarry.position)),
            remaining: self.body.remaining_distance(),
            stopping: self
                .body
                .stopping_distance()
                .max(self.config.min_stopping_distance),
        };
        let Some(outcome) =
            lock.evaluate(progress, self.config.radius_hit, self.config.charge_distance)
        else {
            return;
        };

        if outcome == ChargeOutcome::Caught {
            if let Some(quarry) = self.target {
                self.register_catch(quarry, position);
            }
        }
        info!("charge ended: {outcome:?}");
        self.finish_charge();
    }

    fn handle_rotation(&mut self, dt: f32) {
        // Wait never ends a tick detecting, and the charge states face for
        // themselves.
        if !self.config.use_custom_rotation || self.state != BehaviourState::Chase {
            return;
        }
        let Some(quarry) = self.target else {
            return;
        };
        let pose = self.body.pose();
        let step = self.config.rotation_speed * CHASE_TURN_FACTOR * dt;
        let facing = rotate_towards(pose.forward, quarry.position - pose.position, step);
        self.body.set_facing(facing);
    }

    fn lock_charge(&mut self, quarry: EntityRef, start: Vec3) {
        info!(
            "charge locked on quarry {} at {:?}",
            quarry.id, quarry.position
        );
        self.charge = Some(ChargeLock::new(quarry.position, start));
        self.cooldown.restart_idle();
    }

    fn finish_charge(&mut self) {
        self.transition(BehaviourState::Wait);
        self.cooldown.start();
    }

    fn register_catch(&mut self, quarry: EntityRef, position: Vec3) {
        if self.caught {
            return;
        }
        self.caught = true;
        info!("caught quarry {}", quarry.id);
        self.events.emit(PursuitEvent::Caught {
            quarry: quarry.id,
            position,
        });
    }

    fn hold_position(&mut self) {
        let position = self.body.pose().position;
        self.body.set_destination(position);
        self.body.set_speed(0.0);
    }

    fn halt(&mut self) {
        self.body.set_speed(0.0);
        self.body.set_stopped(true);
    }

    fn transition(&mut self, to: BehaviourState) {
        let from = self.state;
        if from == to || from.is_terminal() {
            return;
        }
        self.exit(from);
        self.state = to;
        self.enter(to);
        info!("pursuer {from} -> {to}");
        self.events.emit(PursuitEvent::StateChanged { from, to });
    }

    fn exit(&mut self, state: BehaviourState) {
        debug!("leaving {state}");
        if state == BehaviourState::Charge {
            self.charge = None;
        }
    }

    fn enter(&mut self, state: BehaviourState) {
        match state {
            BehaviourState::Wait => {
                self.hold_position();
                self.timers.wait.reset();
                self.body.set_stopped(false);
            }
            BehaviourState::Chase => {
                self.timers.chase.reset();
                self.body.set_stopped(false);
            }
            BehaviourState::ChargeSearch => {
                self.halt();
                self.timers.charge_search.reset();
                self.search_yaw = yaw_deg(self.body.pose().forward).unwrap_or(0.0);
            }
            BehaviourState::Charge => {
                self.body.set_stopped(false);
            }
            BehaviourState::Dying => {
                self.halt();
                self.detecting = false;
            }
        }
    }
}

impl<Q, L, E> Pursuer<Q, L, E> {
    /// Active behaviour.
    #[must_use]
    pub const fn state(&self) -> BehaviourState {
        self.state
    }

    /// True while the quarry is perceptible through normal vision.
    #[must_use]
    pub const fn is_detecting(&self) -> bool {
        self.detecting
    }

    /// True once a catch has registered and until a wait timeout clears it.
    #[must_use]
    pub const fn has_caught(&self) -> bool {
        self.caught
    }

    /// Last known quarry position.
    #[must_use]
    pub fn target(&self) -> Option<Vec3> {
        self.target.map(|quarry| quarry.position)
    }

    /// Locked charge destination while charging.
    #[must_use]
    pub fn charge_target(&self) -> Option<Vec3> {
        self.charge.map(|lock| lock.target)
    }

    /// Charge cooldown gate.
    #[must_use]
    pub const fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    /// State-owned timers.
    #[must_use]
    pub const fn timers(&self) -> &StateTimers {
        &self.timers
    }

    /// Perception measured on the last tick.
    #[must_use]
    pub const fn last_perception(&self) -> &PerceptionResult {
        &self.sensed
    }

    /// Validated configuration.
    #[must_use]
    pub const fn config(&self) -> &PursuerConfig {
        &self.config
    }

    /// Spatial query collaborator.
    #[must_use]
    pub const fn spatial(&self) -> &Q {
        &self.spatial
    }

    /// Mutable access to the spatial query, e.g. to move quarries.
    pub fn spatial_mut(&mut self) -> &mut Q {
        &mut self.spatial
    }

    /// Locomotion collaborator.
    #[must_use]
    pub const fn body(&self) -> &L {
        &self.body
    }

    /// Mutable access to the body, e.g. to integrate movement.
    pub fn body_mut(&mut self) -> &mut L {
        &mut self.body
    }

    /// Event sink.
    #[must_use]
    pub const fn events(&self) -> &E {
        &self.events
    }

    /// Mutable access to the event sink.
    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }
}

impl<Q, L, E> Pursuer<Q, L, E>
where
    L: Locomotion,
{
    /// Read-only view for traces and overlays.
    #[must_use]
    pub fn snapshot(&self) -> PursuerSnapshot {
        let pose = self.body.pose();
        PursuerSnapshot {
            tick: self.ticks,
            state: self.state,
            detecting: self.detecting,
            caught: self.caught,
            position: pose.position,
            forward: pose.forward,
            target_id: self.target.map(|quarry| quarry.id),
            target: self.target(),
            charge: self.charge,
            cooldown_active: self.cooldown.is_active(),
            cooldown_elapsed: self.cooldown.elapsed(),
            timers: self.timers,
            perception: self.sensed,
        }
    }
}

fn sanitise_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        warn!("ignoring invalid time step {dt}");
        0.0
    }
}
