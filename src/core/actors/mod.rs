//=========================================================================
// Actors
//=========================================================================
//
// Players and enemies the rules operate on.
//
// Architecture:
//   Actors (model)
//     └─ BTreeMap<ActorId, Actor>
//          ├─ Health, life state, control/invincibility flags
//          ├─ JumpController (players only)
//          └─ injected collaborators: PhysicsBody + ActorHooks
//
// Events refer to actors by id, never by reference, so a pooled event
// cannot keep an actor alive and a despawned actor simply stops
// resolving.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::jump::{JumpController, JumpInput};
use crate::core::scheduler::Scheduler;

//=== Module Declarations =================================================

mod bounds;
mod health;
mod hooks;

#[cfg(test)]
pub(crate) mod testing;

//=== Public API ==========================================================

pub use bounds::Bounds;
pub use health::Health;
pub use hooks::{ActorHooks, NoHooks, PhysicsBody};

//=== ActorId =============================================================

/// Stable handle to an actor in the [`Actors`] roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActorId(u32);

impl ActorId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== ActorKind / LifeState ===============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    /// Player-controlled; respawns after death.
    Player,
    /// Removed from the scene after death.
    Enemy,
}

/// Alive/dead lifecycle. Dead actors ignore further deaths until a
/// spawn brings them back.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifeState {
    #[default]
    Alive,
    Dead,
}

//=== EnemyProfile ========================================================

/// Data description of an enemy type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyProfile {
    pub hit_points: u32,
    /// Points awarded to whoever kills it.
    pub point_award: i32,
}

impl Default for EnemyProfile {
    fn default() -> Self {
        Self {
            hit_points: 1,
            point_award: 1,
        }
    }
}

//=== Actor ===============================================================

/// One player or enemy with its injected collaborators.
pub struct Actor {
    kind: ActorKind,
    life: LifeState,
    point_award: i32,

    pub health: Health,

    /// Blocks enemy collisions against this actor while set.
    pub invincible: bool,

    /// Whether input (players) or patrol movement (enemies) is allowed.
    pub control_enabled: bool,

    /// Present for players only.
    pub jump: Option<JumpController>,

    body: Box<dyn PhysicsBody>,
    hooks: Box<dyn ActorHooks>,
}

impl Actor {
    //--- Construction -----------------------------------------------------

    pub fn player<B, H>(health: Health, jump: JumpController, body: B, hooks: H) -> Self
    where
        B: PhysicsBody + 'static,
        H: ActorHooks + 'static,
    {
        Self {
            kind: ActorKind::Player,
            life: LifeState::Alive,
            point_award: 0,
            health,
            invincible: false,
            control_enabled: true,
            jump: Some(jump),
            body: Box::new(body),
            hooks: Box::new(hooks),
        }
    }

    pub fn enemy<B, H>(profile: EnemyProfile, body: B, hooks: H) -> Self
    where
        B: PhysicsBody + 'static,
        H: ActorHooks + 'static,
    {
        Self {
            kind: ActorKind::Enemy,
            life: LifeState::Alive,
            point_award: profile.point_award,
            health: Health::new(profile.hit_points),
            invincible: false,
            control_enabled: true,
            jump: None,
            body: Box::new(body),
            hooks: Box::new(hooks),
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    pub fn is_player(&self) -> bool {
        self.kind == ActorKind::Player
    }

    pub fn life(&self) -> LifeState {
        self.life
    }

    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }

    pub fn point_award(&self) -> i32 {
        self.point_award
    }

    pub fn bounds(&self) -> Bounds {
        self.body.bounds()
    }

    pub fn body(&self) -> &dyn PhysicsBody {
        self.body.as_ref()
    }

    pub fn body_mut(&mut self) -> &mut dyn PhysicsBody {
        self.body.as_mut()
    }

    pub fn hooks_mut(&mut self) -> &mut dyn ActorHooks {
        self.hooks.as_mut()
    }

    //--- Lifecycle --------------------------------------------------------

    /// Moves to `Dead`. Returns false if the actor was already dead.
    pub fn mark_dead(&mut self) -> bool {
        if self.life == LifeState::Dead {
            return false;
        }
        self.life = LifeState::Dead;
        self.health.die();
        self.control_enabled = false;
        true
    }

    /// Moves back to `Alive` with full health.
    pub fn revive(&mut self) {
        self.life = LifeState::Alive;
        self.health.restore();
    }

    /// Feeds one frame of input through the jump machine and applies the
    /// resulting velocity request. No-op for actors without one.
    pub(crate) fn drive_jump(
        &mut self,
        id: ActorId,
        input: JumpInput,
        scheduler: &mut Scheduler,
        jump_modifier: f32,
        deceleration: f32,
    ) {
        let input = if self.control_enabled && self.is_alive() {
            input
        } else {
            JumpInput::NONE
        };

        let Some(jump) = self.jump.as_mut() else {
            return;
        };
        jump.update(input, self.body.is_grounded(), id, scheduler);
        jump.apply_physics(self.body.as_mut(), jump_modifier, deceleration);
    }
}

//=== Actors ==============================================================

/// Roster of live actors, stored in the model registry.
///
/// Ordered by id so per-tick iteration is deterministic.
#[derive(Default)]
pub struct Actors {
    next_id: u32,
    actors: BTreeMap<ActorId, Actor>,
}

impl Actors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `actor` and returns its new id. Ids are never reused.
    pub fn insert(&mut self, actor: Actor) -> ActorId {
        self.next_id += 1;
        let id = ActorId::new(self.next_id);
        self.actors.insert(id, actor);
        id
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    pub fn remove(&mut self, id: ActorId) -> Option<Actor> {
        self.actors.remove(&id)
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Ids of every actor carrying a jump machine, in id order.
    pub fn jumpers(&self) -> Vec<ActorId> {
        self.actors
            .iter()
            .filter(|(_, actor)| actor.jump.is_some())
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActorId, &Actor)> {
        self.actors.iter().map(|(id, actor)| (*id, actor))
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actors::testing::{RecordingHooks, ScriptedBody};

    fn enemy(hit_points: u32) -> Actor {
        Actor::enemy(
            EnemyProfile {
                hit_points,
                point_award: 5,
            },
            ScriptedBody::grounded(),
            RecordingHooks::default(),
        )
    }

    #[test]
    fn ids_are_sequential_and_not_reused() {
        let mut actors = Actors::new();
        let a = actors.insert(enemy(1));
        let b = actors.insert(enemy(1));
        assert_eq!((a.raw(), b.raw()), (1, 2));

        actors.remove(b);
        let c = actors.insert(enemy(1));
        assert_eq!(c.raw(), 3);
        assert!(!actors.contains(b));
        assert_eq!(actors.len(), 2);
    }

    #[test]
    fn enemy_takes_profile_values() {
        let actor = enemy(3);
        assert_eq!(actor.kind(), ActorKind::Enemy);
        assert_eq!(actor.health.max(), 3);
        assert_eq!(actor.point_award(), 5);
        assert!(actor.jump.is_none());
    }

    #[test]
    fn mark_dead_is_idempotent() {
        let mut actor = enemy(2);
        assert!(actor.mark_dead());
        let health = actor.health;

        assert!(!actor.mark_dead());
        assert_eq!(actor.health, health);
        assert_eq!(actor.life(), LifeState::Dead);
        assert!(!actor.control_enabled);
    }

    #[test]
    fn revive_restores_full_health() {
        let mut actor = enemy(2);
        actor.mark_dead();
        actor.revive();
        assert!(actor.is_alive());
        assert_eq!(actor.health.current(), 2);
    }

    #[test]
    fn jumpers_lists_players_only() {
        let mut actors = Actors::new();
        actors.insert(enemy(1));
        let player = actors.insert(Actor::player(
            Health::new(1),
            JumpController::new(2, 7.0),
            ScriptedBody::grounded(),
            NoHooks,
        ));

        assert_eq!(actors.jumpers(), vec![player]);
    }

    #[test]
    fn enemy_profile_reads_partial_ron() {
        let profile: EnemyProfile = ron::from_str("(point_award: 10)").unwrap();
        assert_eq!(profile.hit_points, 1);
        assert_eq!(profile.point_award, 10);
    }
}
