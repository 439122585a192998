//! Match engine, the core of the simulator.
//!
//! `MatchEngine` owns the hecs world, the bout controller and the skeleton
//! provider. It processes player commands at tick boundaries, advances the
//! timer clock, runs the frame systems and produces `MatchSnapshot`s.
//! Completely headless, so matches are deterministic for a given seed.

use std::collections::VecDeque;

use glam::Vec2;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use joust_ai::camera::{CameraRay, PerspectiveCamera};
use joust_ai::opponent::has_passed;
use joust_core::commands::PlayerCommand;
use joust_core::config::MatchConfig;
use joust_core::constants::{DT, TIME_SCALE_EASE_RATE};
use joust_core::enums::{BoutPhase, Team};
use joust_core::events::BoutEvent;
use joust_core::state::MatchSnapshot;
use joust_core::types::SimTime;

use crate::bout::{BoutController, BoutSettings};
use crate::knight::KnightMotion;
use crate::skeleton::{Skeleton, SkeletonProvider, StandardRig};
use crate::systems;
use crate::systems::snapshot::FrameState;
use crate::systems::targeting::PointerInput;
use crate::world_setup;

/// A camera supplied by the host instead of the built-in first-person view.
pub type HostCamera = Box<dyn CameraRay + Send>;

pub struct MatchEngine {
    config: MatchConfig,
    world: World,
    /// Knight entities indexed by team.
    knights: [Entity; 2],
    controller: BoutController,
    skeleton: Box<dyn SkeletonProvider>,
    camera: Option<HostCamera>,
    rng: ChaCha8Rng,
    time: SimTime,
    /// Slow-motion factor applied to frame time (timers never scale).
    time_scale: f32,
    /// The knights have crossed each other this round.
    knights_passed: bool,
    paused: bool,
    pointer: Option<Vec2>,
    command_queue: VecDeque<PlayerCommand>,
    tick_events: Vec<BoutEvent>,
}

impl MatchEngine {
    pub fn new(config: MatchConfig) -> Self {
        Self::with_skeleton(config, Box::new(StandardRig::new()))
    }

    pub fn with_skeleton(config: MatchConfig, skeleton: Box<dyn SkeletonProvider>) -> Self {
        let mut world = World::new();
        let knights = world_setup::spawn_knights(&mut world, &config);
        let mut engine = Self {
            controller: BoutController::new(BoutSettings::from(&config)),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            world,
            knights,
            skeleton,
            camera: None,
            time: SimTime::default(),
            time_scale: 1.0,
            knights_passed: false,
            paused: false,
            pointer: None,
            command_queue: VecDeque::new(),
            tick_events: Vec::new(),
        };
        systems::skeleton::run(&mut engine.world, engine.skeleton.as_ref());
        engine
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance one frame and return the resulting snapshot.
    pub fn tick(&mut self) -> MatchSnapshot {
        self.process_commands();

        if !self.paused {
            self.advance_clock(DT);
            self.step_frame(DT as f32);
            self.time.advance();
        }

        let events = std::mem::take(&mut self.tick_events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.knights,
            &self.controller,
            FrameState {
                time: self.time,
                paused: self.paused,
                time_scale: self.time_scale,
            },
            events,
        )
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            match command {
                PlayerCommand::StartMatch => self.start_match(),
                PlayerCommand::ResetMatch => self.reset_match(),
                PlayerCommand::Pause => self.paused = true,
                PlayerCommand::Resume => self.paused = false,
                PlayerCommand::SetPointer { x, y } => {
                    self.pointer = Some(Vec2::new(x, y).clamp(Vec2::NEG_ONE, Vec2::ONE));
                }
            }
        }
    }

    /// Reset knights to their opening placement and begin round 1.
    pub fn start_match(&mut self) {
        world_setup::restore_initial_placement(&mut self.world, &self.config);
        self.controller.start_match();
        self.sync_controller_events();
    }

    /// Cancel timers, clear rounds and scores, and reset every knight and
    /// lance. Idempotent.
    pub fn reset_match(&mut self) {
        self.controller.reset_match();
        self.sync_controller_events();
    }

    /// Advance the timer clock (countdown and round transition).
    pub fn advance_clock(&mut self, dt: f64) {
        self.controller.advance_clock(dt);
        self.sync_controller_events();
    }

    /// Run the frame systems with unscaled frame time `raw_dt`.
    pub fn step_frame(&mut self, raw_dt: f32) {
        if !self.controller.movement_enabled() {
            systems::skeleton::run(&mut self.world, self.skeleton.as_ref());
            return;
        }

        self.update_time_scale(raw_dt);
        let dt = raw_dt * self.time_scale;

        systems::movement::run(
            &mut self.world,
            &mut self.controller,
            &self.config,
            dt,
            raw_dt,
        );
        self.sync_controller_events();

        systems::skeleton::run(&mut self.world, self.skeleton.as_ref());
        if !self.controller.movement_enabled() {
            return;
        }

        systems::lance::refresh_origins(&mut self.world, dt, self.config.speed_unit_factor);

        let pov = self.pov_camera();
        let camera: Option<&dyn CameraRay> = match &self.camera {
            Some(camera) => Some(&**camera as &dyn CameraRay),
            None => pov.as_ref().map(|c| c as &dyn CameraRay),
        };
        let input = PointerInput {
            pointer: self.pointer,
            camera,
        };
        systems::targeting::run(&self.world, &self.knights, input, dt, &mut self.rng);

        systems::lance::resolve_hits(&mut self.world, &self.knights, &mut self.controller);
        self.sync_controller_events();
    }

    /// Apply what the controller announced to the world, then keep the
    /// events for the next snapshot.
    fn sync_controller_events(&mut self) {
        for event in self.controller.drain_events() {
            match &event {
                BoutEvent::RoundStart { .. } => self.reset_round_state(),
                BoutEvent::PositionsReset { .. } => {
                    world_setup::swap_ends(&mut self.world, &self.knights);
                    self.knights_passed = false;
                    self.time_scale = 1.0;
                }
                BoutEvent::MatchReset => {
                    world_setup::restore_initial_placement(&mut self.world, &self.config);
                    self.reset_round_state();
                }
                _ => {}
            }
            self.tick_events.push(event);
        }
    }

    fn reset_round_state(&mut self) {
        world_setup::reset_round_state(&mut self.world);
        self.knights_passed = false;
        self.time_scale = 1.0;
        systems::skeleton::run(&mut self.world, self.skeleton.as_ref());
    }

    /// Ease toward slow motion while the knights close on each other and
    /// nobody has scored yet; back to normal speed otherwise.
    fn update_time_scale(&mut self, raw_dt: f32) {
        let (Some(a), Some(b)) = (self.motion(Team::A), self.motion(Team::B)) else {
            return;
        };
        if has_passed(a.position.x, b.position.x, a.facing) {
            self.knights_passed = true;
        }
        let distance = a.position.distance(b.position);

        let round_open = self
            .controller
            .round_record(self.controller.current_round())
            .is_some_and(|r| !r.a.is_recorded() && !r.b.is_recorded());

        let target = if round_open && !self.knights_passed && distance < self.config.slowdown_distance
        {
            self.config.slowdown_factor
        } else {
            1.0
        };
        let blend = (TIME_SCALE_EASE_RATE * raw_dt).min(1.0);
        self.time_scale += (target - self.time_scale) * blend;
    }

    fn motion(&self, team: Team) -> Option<KnightMotion> {
        self.world
            .get::<&KnightMotion>(self.knights[team.index()])
            .ok()
            .map(|m| (*m).clone())
    }

    /// First-person camera at the player's head.
    fn pov_camera(&self) -> Option<PerspectiveCamera> {
        let player = self.knights[self.config.player_team.index()];
        let motion = self.world.get::<&KnightMotion>(player).ok()?;
        let head = self.world.get::<&Skeleton>(player).ok()?.head?;
        Some(PerspectiveCamera::pov(head, motion.facing))
    }

    /// Cancel timers and drop all controller listeners.
    pub fn dispose(&mut self) {
        self.controller.dispose();
        self.command_queue.clear();
    }

    // ---- Host wiring ----

    /// Replace the built-in first-person camera used for pointer aiming.
    pub fn set_camera(&mut self, camera: Option<HostCamera>) {
        self.camera = camera;
    }

    pub fn set_skeleton(&mut self, skeleton: Box<dyn SkeletonProvider>) {
        self.skeleton = skeleton;
        systems::skeleton::run(&mut self.world, self.skeleton.as_ref());
    }

    // ---- Queries ----

    pub fn controller(&self) -> &BoutController {
        &self.controller
    }

    /// Mutable access for subscribing to bout events.
    pub fn controller_mut(&mut self) -> &mut BoutController {
        &mut self.controller
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn phase(&self) -> BoutPhase {
        self.controller.phase()
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn knight(&self, team: Team) -> Entity {
        self.knights[team.index()]
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for scripted scenarios in tests.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
