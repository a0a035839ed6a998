//=========================================================================
// Test Doubles
//=========================================================================
//
// Scripted collaborators and a small stage wiring a scheduler to a
// model registry, shared by the unit tests of the rule modules.
//
//=========================================================================

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use glam::Vec2;

use super::{Actor, ActorHooks, ActorId, Actors, Bounds, EnemyProfile, Health, PhysicsBody};
use crate::core::jump::JumpController;
use crate::core::models::{CameraRig, ModelRegistry, PlatformerModel, Score};
use crate::core::scheduler::{Event, Scheduler};

//=== ScriptedBody ========================================================

#[derive(Debug, Default)]
pub(crate) struct BodyState {
    pub bounds: Bounds,
    pub grounded: bool,
    pub simulated: bool,
    pub impulses: Vec<f32>,
    pub dampings: Vec<f32>,
    pub teleports: Vec<Vec2>,
}

/// Physics body whose readings are set by the test and whose requests
/// are recorded. Clones share state.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedBody {
    state: Arc<Mutex<BodyState>>,
}

impl ScriptedBody {
    pub fn grounded() -> Self {
        Self::at(Bounds::default())
    }

    pub fn at(bounds: Bounds) -> Self {
        let body = Self::default();
        {
            let mut state = body.state();
            state.bounds = bounds;
            state.grounded = true;
            state.simulated = true;
        }
        body
    }

    pub fn state(&self) -> MutexGuard<'_, BodyState> {
        self.state.lock().unwrap()
    }

    pub fn set_grounded(&self, grounded: bool) {
        self.state().grounded = grounded;
    }
}

impl PhysicsBody for ScriptedBody {
    fn bounds(&self) -> Bounds {
        self.state().bounds
    }

    fn is_grounded(&self) -> bool {
        self.state().grounded
    }

    fn apply_vertical_impulse(&mut self, speed: f32) {
        self.state().impulses.push(speed);
    }

    fn dampen_rise(&mut self, factor: f32) {
        self.state().dampings.push(factor);
    }

    fn teleport_to(&mut self, position: Vec2) {
        let mut state = self.state();
        state.teleports.push(position);
        state.bounds.center = position;
    }

    fn set_simulated(&mut self, enabled: bool) {
        self.state().simulated = enabled;
    }
}

//=== RecordingHooks ======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HookCall {
    Hurt,
    Recovered,
    Death,
    Spawn,
    Jump,
    Landed,
    Despawn,
}

/// Presentation hooks that log every call. Clones share the log.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingHooks {
    calls: Arc<Mutex<Vec<HookCall>>>,
}

impl RecordingHooks {
    pub fn calls(&self) -> Vec<HookCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: HookCall) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
    }

    fn push(&self, call: HookCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ActorHooks for RecordingHooks {
    fn play_hurt(&mut self) {
        self.push(HookCall::Hurt);
    }

    fn play_recovered(&mut self) {
        self.push(HookCall::Recovered);
    }

    fn play_death(&mut self) {
        self.push(HookCall::Death);
    }

    fn play_spawn(&mut self) {
        self.push(HookCall::Spawn);
    }

    fn play_jump(&mut self) {
        self.push(HookCall::Jump);
    }

    fn play_landed(&mut self) {
        self.push(HookCall::Landed);
    }

    fn despawn(&mut self) {
        self.push(HookCall::Despawn);
    }
}

//=== Stage ===============================================================

/// Handles onto an actor added to a [`Stage`].
pub(crate) struct Probe {
    pub id: ActorId,
    pub body: ScriptedBody,
    pub hooks: RecordingHooks,
}

/// Scheduler and registry wired together with default tunables.
pub(crate) struct Stage {
    pub scheduler: Scheduler,
    pub models: ModelRegistry,
}

impl Stage {
    pub fn new() -> Self {
        let mut models = ModelRegistry::new();
        models.set(PlatformerModel::default());
        Self {
            scheduler: Scheduler::new(),
            models,
        }
    }

    /// Adds the player (bound to the model and camera).
    pub fn add_player(&mut self, bounds: Bounds, max_health: u32) -> Probe {
        let body = ScriptedBody::at(bounds);
        let hooks = RecordingHooks::default();
        let actor = Actor::player(
            Health::new(max_health),
            JumpController::new(2, 7.0),
            body.clone(),
            hooks.clone(),
        );

        let id = self.models.get::<Actors>().insert(actor);
        self.models.get::<PlatformerModel>().player = Some(id);
        self.models.get::<CameraRig>().bind(id);
        Probe { id, body, hooks }
    }

    pub fn add_enemy(&mut self, bounds: Bounds, hit_points: u32, point_award: i32) -> Probe {
        let body = ScriptedBody::at(bounds);
        let hooks = RecordingHooks::default();
        let actor = Actor::enemy(
            EnemyProfile {
                hit_points,
                point_award,
            },
            body.clone(),
            hooks.clone(),
        );

        let id = self.models.get::<Actors>().insert(actor);
        Probe { id, body, hooks }
    }

    /// Records a copy of every executed event of kind `E`.
    pub fn record<E: Event + Clone>(&mut self) -> Arc<Mutex<Vec<E>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        self.scheduler
            .on_execute::<E, _>(move |event| sink.lock().unwrap().push(event.clone()));
        log
    }

    pub fn tick(&mut self, advance: Duration) -> usize {
        self.scheduler.tick(advance, &mut self.models)
    }

    /// Runs everything due now.
    pub fn settle(&mut self) -> usize {
        self.tick(Duration::ZERO)
    }

    pub fn actor(&mut self, id: ActorId) -> &mut Actor {
        self.models.get::<Actors>().get_mut(id).expect("actor on stage")
    }

    pub fn score(&mut self) -> i32 {
        self.models.get::<Score>().current_total()
    }
}

/// 1x1 box centered at (`x`, `y`).
pub(crate) fn unit_box(x: f32, y: f32) -> Bounds {
    Bounds::new(Vec2::new(x, y), Vec2::ONE)
}
