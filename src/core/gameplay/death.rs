//=========================================================================
// Death and Respawn
//=========================================================================
//
// Lifecycle:
//   Alive ──Death──→ Dead ──(respawn_delay)──→ Spawn ──→ Alive
//                     │                          └─(input_enable_delay)─→ EnableInput
//                     └─(enemy)──(enemy_despawn_delay)──→ Despawn
//
// Death is idempotent: a second Death for an already dead actor does
// nothing, which is what stands in for cancelling queued deaths.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::{actor_mut, target_or_player};
use crate::core::actors::{ActorId, ActorKind, Actors};
use crate::core::models::{CameraRig, ModelRegistry, PlatformerModel};
use crate::core::scheduler::{Event, EventContext};

//=== Death ===============================================================

/// Kills `victim` (the player when unset).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Death {
    pub victim: Option<ActorId>,
}

impl Event for Death {
    fn execute(&mut self, cx: &mut EventContext<'_>) {
        let Some(victim) = target_or_player(cx.models_mut(), self.victim) else {
            return;
        };

        let model = cx.models_mut().get::<PlatformerModel>();
        let (respawn_delay, despawn_delay) = (model.respawn_delay, model.enemy_despawn_delay);

        let Some(actor) = actor_mut(cx.models_mut(), victim) else {
            debug!("Death for unknown actor {}", victim);
            return;
        };
        if !actor.mark_dead() {
            debug!("Actor {} is already dead", victim);
            return;
        }

        let kind = actor.kind();
        if kind == ActorKind::Enemy {
            actor.body_mut().set_simulated(false);
        }
        actor.hooks_mut().play_death();

        cx.models_mut().get::<CameraRig>().detach_from(victim);

        match kind {
            ActorKind::Player => {
                info!("Player {} died, respawning in {:?}", victim, respawn_delay);
                cx.schedule::<Spawn>(respawn_delay).actor = Some(victim);
            }
            ActorKind::Enemy => {
                debug!("Enemy {} died", victim);
                cx.schedule::<Despawn>(despawn_delay).actor = Some(victim);
            }
        }
    }
}

//=== Spawn ===============================================================

/// Brings `actor` (the player when unset) back at the spawn point.
///
/// Control stays off until the follow-up [`EnableInput`] runs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Spawn {
    pub actor: Option<ActorId>,
}

impl Event for Spawn {
    fn execute(&mut self, cx: &mut EventContext<'_>) {
        let Some(id) = target_or_player(cx.models_mut(), self.actor) else {
            return;
        };

        let model = cx.models_mut().get::<PlatformerModel>();
        let (spawn_point, input_delay) = (model.spawn_point, model.input_enable_delay);

        let Some(actor) = actor_mut(cx.models_mut(), id) else {
            debug!("Spawn for unknown actor {}", id);
            return;
        };

        actor.revive();
        actor.invincible = false;
        actor.control_enabled = false;
        if let Some(jump) = actor.jump.as_mut() {
            jump.reset();
        }
        actor.body_mut().set_simulated(true);
        actor.body_mut().teleport_to(spawn_point);
        actor.hooks_mut().play_spawn();

        if actor.is_player() {
            cx.models_mut().get::<CameraRig>().bind(id);
        }

        info!("Actor {} spawned at {}", id, spawn_point);
        cx.schedule::<EnableInput>(input_delay).actor = Some(id);
    }
}

//=== EnableInput =========================================================

/// Hands control back to a living actor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnableInput {
    pub actor: Option<ActorId>,
}

impl Event for EnableInput {
    fn execute(&mut self, cx: &mut EventContext<'_>) {
        let Some(id) = target_or_player(cx.models_mut(), self.actor) else {
            return;
        };
        if let Some(actor) = actor_mut(cx.models_mut(), id) {
            if actor.is_alive() {
                actor.control_enabled = true;
            }
        }
    }
}

//=== Despawn =============================================================

/// Removes an actor from the scene and the roster.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Despawn {
    pub actor: Option<ActorId>,
}

impl Event for Despawn {
    fn execute(&mut self, cx: &mut EventContext<'_>) {
        if let Some(id) = self.actor {
            remove_actor(cx.models_mut(), id);
        }
    }
}

/// Runs the despawn hook and drops every reference the models hold to
/// `id`. Returns false if the actor was already gone.
pub(super) fn remove_actor(models: &mut ModelRegistry, id: ActorId) -> bool {
    let Some(mut actor) = models.get::<Actors>().remove(id) else {
        return false;
    };
    actor.hooks_mut().despawn();

    models.get::<CameraRig>().detach_from(id);
    let model = models.get::<PlatformerModel>();
    if model.player == Some(id) {
        model.player = None;
    }

    debug!("Actor {} despawned", id);
    true
}

//=========================================================================
// Tests
//=========================================================================
