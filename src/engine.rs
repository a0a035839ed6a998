//=========================================================================
// Platformer Simulation
//
// Main entry point: owns the scheduler and model registry and turns
// collaborator reports into scheduled gameplay events.
//
// Architecture:
// ```text
//     SimulationBuilder ──build()──> Simulation ──start()──> SimulationHandle
//         │                            │                       │
//         ├─ with_config()             ├─ spawn_player()       ├─ send()
//         ├─ with_tps()                ├─ collision_detected() └─ shutdown()
//         └─ with_channel_capacity()   ├─ submit_input()            │
//                                      └─ tick() / step()     Simulation <┘
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::mem;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Sender};
use log::{debug, error, info, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::config::{ConfigError, GameConfig};
use crate::core::actors::{Actor, ActorHooks, ActorId, Actors, EnemyProfile, Health, PhysicsBody};
use crate::core::gameplay::{CollisionResolution, EnteredHazardZone};
use crate::core::jump::JumpInput;
use crate::core::models::{CameraRig, ModelRegistry, PlatformerModel, Score};
use crate::core::scheduler::Scheduler;
use crate::core::signals::WorldSignal;
use crate::core::SimulationLoop;

//=== SimulationError =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// The simulation thread has stopped; the signal was not delivered.
    #[error("simulation loop is no longer running")]
    Disconnected,

    /// The simulation thread panicked; its state is lost.
    #[error("simulation thread panicked")]
    Panicked,
}

//=== SimulationBuilder ===================================================

/// Builder for configuring and constructing a [`Simulation`].
///
/// # Default Values
///
/// - **Config**: [`GameConfig::default`] (60 ticks per second)
/// - **Channel capacity**: 128 signals
///
/// # Examples
///
/// ```
/// use platformer_core::config::GameConfig;
/// use platformer_core::SimulationBuilder;
///
/// let config = GameConfig::from_ron_str("(max_jump_charges: 3)").unwrap();
/// let simulation = SimulationBuilder::new()
///     .with_config(config)
///     .with_tps(120.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(simulation.config().max_jump_charges, 3);
/// ```
pub struct SimulationBuilder {
    config: GameConfig,
    channel_capacity: usize,
}

impl SimulationBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            channel_capacity: 128,
        }
    }

    /// Replaces every tunable, including the tick rate.
    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the ticks per second used by [`Simulation::step`] and the
    /// background loop.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.config.tick_rate = tps;
        self
    }

    /// Sets the capacity of the collaborator → simulation channel.
    ///
    /// Senders block once this many signals are waiting.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Validates the config and builds the simulation with its tunables
    /// installed in the model registry.
    pub fn build(self) -> Result<Simulation, ConfigError> {
        self.config.validate()?;
        info!(
            "Building simulation (TPS: {}, channel: {})",
            self.config.tick_rate, self.channel_capacity
        );

        let mut models = ModelRegistry::new();
        models.set(self.config.to_model());

        Ok(Simulation {
            scheduler: Scheduler::new(),
            models,
            inputs: BTreeMap::new(),
            frame: self.config.frame_duration(),
            config: self.config,
            channel_capacity: self.channel_capacity,
        })
    }
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Simulation ==========================================================

/// One platformer world: actors, shared models and the event queue.
///
/// Collaborators report what they observed (collisions, hazard zones,
/// input); the simulation turns those reports into scheduled events that
/// run on the next [`Simulation::tick`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use platformer_core::SimulationBuilder;
///
/// let mut simulation = SimulationBuilder::new().build().unwrap();
/// assert_eq!(simulation.tick(Duration::from_millis(16)), 0);
/// assert_eq!(simulation.now(), Duration::from_millis(16));
/// ```
pub struct Simulation {
    scheduler: Scheduler,
    models: ModelRegistry,
    config: GameConfig,
    inputs: BTreeMap<ActorId, JumpInput>,
    frame: Duration,
    channel_capacity: usize,
}

impl Simulation {
    //--- Actors -----------------------------------------------------------

    /// Adds the player with full health and a fresh jump machine, and
    /// points the camera at it.
    pub fn spawn_player<B, H>(&mut self, body: B, hooks: H) -> ActorId
    where
        B: PhysicsBody + 'static,
        H: ActorHooks + 'static,
    {
        let actor = Actor::player(
            Health::new(self.config.player_max_health),
            self.config.jump_controller(),
            body,
            hooks,
        );
        let id = self.models.get::<Actors>().insert(actor);

        let model = self.models.get::<PlatformerModel>();
        if let Some(previous) = model.player.replace(id) {
            warn!("Player {} replaced by {}", previous, id);
        }
        self.models.get::<CameraRig>().bind(id);

        info!("Player {} spawned", id);
        id
    }

    pub fn spawn_enemy<B, H>(&mut self, profile: EnemyProfile, body: B, hooks: H) -> ActorId
    where
        B: PhysicsBody + 'static,
        H: ActorHooks + 'static,
    {
        let id = self.models.get::<Actors>().insert(Actor::enemy(profile, body, hooks));
        debug!("Enemy {} spawned ({:?})", id, profile);
        id
    }

    //--- Collaborator Reports ---------------------------------------------

    /// Queues a [`CollisionResolution`] for `attacker` touching `defender`.
    ///
    /// Ignored (returns false) while the attacker is invincible, or when
    /// either actor is dead or unknown.
    pub fn collision_detected(&mut self, attacker: ActorId, defender: ActorId) -> bool {
        let actors = self.models.get::<Actors>();
        let attacker_ready = match actors.get(attacker) {
            Some(actor) if actor.is_alive() => !actor.invincible,
            Some(_) => false,
            None => {
                warn!("Collision from unknown actor {}", attacker);
                return false;
            }
        };
        let defender_alive = match actors.get(defender) {
            Some(actor) => actor.is_alive(),
            None => {
                warn!("Collision with unknown actor {}", defender);
                return false;
            }
        };

        if !(attacker_ready && defender_alive) {
            debug!("Collision {} -> {} ignored", attacker, defender);
            return false;
        }

        let event = self.scheduler.schedule::<CollisionResolution>(Duration::ZERO);
        event.attacker = Some(attacker);
        event.defender = Some(defender);
        true
    }

    /// Queues an [`EnteredHazardZone`] for `entity`. False if unknown.
    pub fn hazard_entered(&mut self, entity: ActorId) -> bool {
        if !self.models.get::<Actors>().contains(entity) {
            warn!("Hazard entered by unknown actor {}", entity);
            return false;
        }
        self.scheduler.schedule::<EnteredHazardZone>(Duration::ZERO).entity = Some(entity);
        true
    }

    /// Records jump button edges for `actor`, consumed by the next tick.
    ///
    /// Several submissions within one frame are merged.
    pub fn submit_input(&mut self, actor: ActorId, input: JumpInput) {
        let pending = self.inputs.entry(actor).or_default();
        pending.pressed |= input.pressed;
        pending.released |= input.released;
    }

    /// Routes a [`WorldSignal`] to the matching report method.
    pub fn apply(&mut self, signal: WorldSignal) {
        match signal {
            WorldSignal::Collision { attacker, defender } => {
                self.collision_detected(attacker, defender);
            }
            WorldSignal::HazardEntered { entity } => {
                self.hazard_entered(entity);
            }
            WorldSignal::Input { actor, input } => self.submit_input(actor, input),
            WorldSignal::Shutdown => debug!("Shutdown signal has no effect outside the loop"),
        }
    }

    //--- Update -----------------------------------------------------------

    /// Advances simulation time by `advance`.
    ///
    /// Every player's jump machine sees this frame's input first, then the
    /// scheduler runs everything due. Returns the number of events executed.
    pub fn tick(&mut self, advance: Duration) -> usize {
        let model = self.models.get::<PlatformerModel>();
        let (jump_modifier, deceleration) = (model.jump_modifier, model.jump_deceleration);

        let mut inputs = mem::take(&mut self.inputs);
        let actors = self.models.get::<Actors>();
        for id in actors.jumpers() {
            let input = inputs.remove(&id).unwrap_or_default();
            if let Some(actor) = actors.get_mut(id) {
                actor.drive_jump(id, input, &mut self.scheduler, jump_modifier, deceleration);
            }
        }
        for id in inputs.keys() {
            debug!("Dropped input for {}: not a player", id);
        }

        self.scheduler.tick(advance, &mut self.models)
    }

    /// One tick of the configured frame length.
    pub fn step(&mut self) -> usize {
        self.tick(self.frame)
    }

    /// Drops pending events and every model, then reinstalls the tunables.
    ///
    /// Simulation time and registered listeners are kept.
    pub fn reset(&mut self) {
        self.scheduler.clear();
        self.models.reset();
        self.models.set(self.config.to_model());
        self.inputs.clear();
        info!("Simulation reset at {:?}", self.scheduler.now());
    }

    //--- Query API --------------------------------------------------------

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Length of one [`Simulation::step`].
    pub fn frame(&self) -> Duration {
        self.frame
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> Option<ActorId> {
        self.models.try_get::<PlatformerModel>().and_then(|model| model.player)
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.models.try_get::<Actors>().and_then(|actors| actors.get(id))
    }

    pub fn score(&self) -> i32 {
        self.models
            .try_get::<Score>()
            .map_or(0, Score::current_total)
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Direct scheduler access, for listeners and custom events.
    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    pub fn models_mut(&mut self) -> &mut ModelRegistry {
        &mut self.models
    }

    //--- Execution --------------------------------------------------------

    /// Moves the simulation onto its own thread, ticking at the configured
    /// rate and fed by a bounded signal channel.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the channel (capacity from the builder)
    /// 2. Spawns the logic thread
    /// 3. Collaborators send [`WorldSignal`]s through the handle
    /// 4. [`SimulationHandle::shutdown`] stops the thread and returns the
    ///    simulation, or every sender dropping stops it silently
    pub fn start(self) -> SimulationHandle {
        info!("Starting simulation thread (TPS: {})", self.config.tick_rate);

        let (sender, receiver) = bounded(self.channel_capacity);
        let thread = SimulationLoop::new(receiver, self.frame).spawn(self);

        SimulationHandle { sender, thread }
    }
}

//=== SimulationHandle ====================================================

/// Control side of a simulation running on its own thread.
pub struct SimulationHandle {
    sender: Sender<WorldSignal>,
    thread: thread::JoinHandle<Simulation>,
}

impl SimulationHandle {
    /// Delivers a signal to the next frame. Blocks while the channel is full.
    pub fn send(&self, signal: WorldSignal) -> Result<(), SimulationError> {
        self.sender
            .send(signal)
            .map_err(|_| SimulationError::Disconnected)
    }

    /// A sender collaborators can own directly.
    pub fn sender(&self) -> Sender<WorldSignal> {
        self.sender.clone()
    }

    /// Stops the loop after its current frame and returns the simulation.
    ///
    /// Signals queued ahead of the shutdown are still applied.
    pub fn shutdown(self) -> Result<Simulation, SimulationError> {
        if self.sender.send(WorldSignal::Shutdown).is_err() {
            debug!("Simulation loop already stopped");
        }

        match self.thread.join() {
            Ok(simulation) => {
                info!("Simulation thread terminated cleanly");
                Ok(simulation)
            }
            Err(e) => {
                error!("Simulation thread panicked: {:?}", e);
                Err(SimulationError::Panicked)
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actors::testing::{unit_box, HookCall, RecordingHooks, ScriptedBody};
    use crate::core::actors::{Bounds, NoHooks};
    use crate::core::gameplay::{Death, Hurt};

    fn simulation() -> Simulation {
        SimulationBuilder::new().build().unwrap()
    }

    fn enemy_profile(hit_points: u32, point_award: i32) -> EnemyProfile {
        EnemyProfile {
            hit_points,
            point_award,
        }
    }

    //=====================================================================
    // SimulationBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = SimulationBuilder::new();
        assert_eq!(builder.config, GameConfig::default());
        assert_eq!(builder.channel_capacity, 128);
    }

    #[test]
    fn builder_with_tps() {
        let simulation = SimulationBuilder::new().with_tps(100.0).build().unwrap();
        assert_eq!(simulation.config().tick_rate, 100.0);
        assert_eq!(simulation.frame(), Duration::from_millis(10));
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        SimulationBuilder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_negative() {
        SimulationBuilder::new().with_tps(-60.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        SimulationBuilder::new().with_channel_capacity(0);
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let mut config = GameConfig::default();
        config.max_jump_charges = 0;

        let result = SimulationBuilder::new().with_config(config).build();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn builder_rejects_tick_rate_without_frame_length() {
        let result = SimulationBuilder::new().with_tps(1e-300).build();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn build_installs_tunables() {
        let mut config = GameConfig::default();
        config.kill_bounce = 4.0;

        let mut simulation = SimulationBuilder::new().with_config(config).build().unwrap();
        assert_eq!(simulation.models_mut().get::<PlatformerModel>().kill_bounce, 4.0);
    }

    //=====================================================================
    // Simulation Tests
    //=====================================================================

    #[test]
    fn spawn_player_binds_model_and_camera() {
        let mut simulation = simulation();
        let id = simulation.spawn_player(ScriptedBody::grounded(), NoHooks);

        assert_eq!(simulation.player(), Some(id));
        assert!(simulation.models_mut().get::<CameraRig>().is_following(id));
        let player = simulation.actor(id).unwrap();
        assert!(player.is_player());
        assert_eq!(player.health.max(), 1);
        assert_eq!(player.jump.as_ref().map(|jump| jump.max_charges()), Some(2));
    }

    #[test]
    fn reported_stomp_resolves_on_next_tick() {
        let mut simulation = simulation();
        let player_body = ScriptedBody::at(unit_box(0.0, 1.5));
        let player = simulation.spawn_player(player_body.clone(), NoHooks);
        let hooks = RecordingHooks::default();
        let enemy = simulation.spawn_enemy(
            enemy_profile(1, 5),
            ScriptedBody::at(unit_box(0.0, 0.0)),
            hooks.clone(),
        );

        assert!(simulation.collision_detected(player, enemy));
        assert_eq!(simulation.score(), 0);

        simulation.step();

        assert_eq!(simulation.score(), 5);
        assert!(!simulation.actor(enemy).unwrap().is_alive());
        assert_eq!(player_body.state().impulses, vec![2.0]);
        assert_eq!(hooks.calls(), vec![HookCall::Death]);

        simulation.tick(Duration::from_secs(1));
        assert!(simulation.actor(enemy).is_none());
        assert!(!simulation.collision_detected(player, enemy));
    }

    #[test]
    fn invincible_attacker_is_ignored() {
        let mut simulation = simulation();
        let player = simulation.spawn_player(ScriptedBody::at(unit_box(0.0, 1.5)), NoHooks);
        let enemy = simulation.spawn_enemy(
            enemy_profile(3, 1),
            ScriptedBody::at(unit_box(0.0, 0.0)),
            NoHooks,
        );

        simulation.scheduler_mut().schedule::<Hurt>(Duration::ZERO).victim = Some(player);
        simulation.step();
        assert!(simulation.actor(player).unwrap().invincible);

        assert!(!simulation.collision_detected(player, enemy));
        assert_eq!(simulation.scheduler().pending(), 1);
    }

    #[test]
    fn unknown_actors_are_ignored() {
        let mut simulation = simulation();
        let player = simulation.spawn_player(ScriptedBody::grounded(), NoHooks);
        let ghost = ActorId::new(99);

        assert!(!simulation.collision_detected(player, ghost));
        assert!(!simulation.collision_detected(ghost, player));
        assert!(!simulation.hazard_entered(ghost));
        assert_eq!(simulation.scheduler().pending(), 0);
    }

    #[test]
    fn hazard_signal_kills_and_respawns_player() {
        let mut simulation = simulation();
        let body = ScriptedBody::at(unit_box(2.0, -30.0));
        let player = simulation.spawn_player(body.clone(), NoHooks);

        simulation.apply(WorldSignal::HazardEntered { entity: player });
        simulation.step();
        assert!(!simulation.actor(player).unwrap().is_alive());

        simulation.tick(Duration::from_secs(2));
        let actor = simulation.actor(player).unwrap();
        assert!(actor.is_alive());
        assert!(!actor.control_enabled);
        assert_eq!(body.state().bounds.center, simulation.config().spawn_point);

        simulation.tick(Duration::from_secs(1));
        assert!(simulation.actor(player).unwrap().control_enabled);
    }

    #[test]
    fn submitted_press_launches_player_two_ticks_later() {
        let mut simulation = simulation();
        let body = ScriptedBody::grounded();
        let player = simulation.spawn_player(body.clone(), NoHooks);

        simulation.submit_input(player, JumpInput::press());
        simulation.step();
        assert!(body.state().impulses.is_empty());

        simulation.step();
        assert_eq!(body.state().impulses, vec![10.5]);
        assert_eq!(simulation.actor(player).unwrap().jump.as_ref().unwrap().charges(), 1);
    }

    #[test]
    fn early_release_damps_rise() {
        let mut simulation = simulation();
        let body = ScriptedBody::grounded();
        let hooks = RecordingHooks::default();
        let player = simulation.spawn_player(body.clone(), hooks.clone());

        simulation.submit_input(player, JumpInput::press());
        simulation.step();
        simulation.step();

        body.set_grounded(false);
        simulation.apply(WorldSignal::Input {
            actor: player,
            input: JumpInput::release(),
        });
        simulation.step();

        assert_eq!(body.state().dampings, vec![0.5]);
        assert_eq!(hooks.calls(), vec![HookCall::Jump]);
    }

    #[test]
    fn input_is_ignored_without_control() {
        let mut simulation = simulation();
        let body = ScriptedBody::grounded();
        let player = simulation.spawn_player(body.clone(), NoHooks);

        simulation.scheduler_mut().schedule::<Death>(Duration::ZERO).victim = Some(player);
        simulation.step();

        simulation.submit_input(player, JumpInput::press());
        simulation.step();
        simulation.step();
        assert!(body.state().impulses.is_empty());
    }

    #[test]
    fn reset_clears_world_but_keeps_tunables() {
        let mut config = GameConfig::default();
        config.hurt_bounce = 3.0;
        let mut simulation = SimulationBuilder::new().with_config(config).build().unwrap();
        let player = simulation.spawn_player(ScriptedBody::grounded(), NoHooks);
        simulation.scheduler_mut().schedule::<Death>(Duration::from_secs(5));
        simulation.tick(Duration::from_secs(1));

        simulation.reset();

        assert!(simulation.actor(player).is_none());
        assert_eq!(simulation.player(), None);
        assert_eq!(simulation.scheduler().pending(), 0);
        assert_eq!(simulation.now(), Duration::from_secs(1));
        assert_eq!(simulation.models_mut().get::<PlatformerModel>().hurt_bounce, 3.0);
    }

    //=====================================================================
    // Threaded Loop Tests
    //=====================================================================

    #[test]
    fn started_simulation_applies_signals_before_shutdown() {
        let mut simulation = SimulationBuilder::new().with_tps(1000.0).build().unwrap();
        let player = simulation.spawn_player(ScriptedBody::at(unit_box(0.0, 1.5)), NoHooks);
        let enemy = simulation.spawn_enemy(
            enemy_profile(1, 7),
            ScriptedBody::at(unit_box(0.0, 0.0)),
            NoHooks,
        );

        let handle = simulation.start();
        handle
            .send(WorldSignal::Collision {
                attacker: player,
                defender: enemy,
            })
            .unwrap();

        let simulation = handle.shutdown().unwrap();
        assert_eq!(simulation.score(), 7);
        assert!(!simulation.actor(enemy).unwrap().is_alive());
        assert!(simulation.now() > Duration::ZERO);
    }

    #[test]
    fn cloned_sender_feeds_running_simulation() {
        let mut simulation = SimulationBuilder::new()
            .with_tps(1000.0)
            .with_channel_capacity(4)
            .build()
            .unwrap();
        let body = ScriptedBody::at(Bounds::default());
        let enemy = simulation.spawn_enemy(enemy_profile(1, 1), body, NoHooks);

        let handle = simulation.start();
        let sender = handle.sender();
        sender.send(WorldSignal::HazardEntered { entity: enemy }).unwrap();

        let simulation = handle.shutdown().unwrap();
        assert!(simulation.actor(enemy).is_none());

        assert!(sender.send(WorldSignal::Shutdown).is_err());
    }
}
