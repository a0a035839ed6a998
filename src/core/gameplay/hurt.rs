//=========================================================================
// Hurt
//=========================================================================
//
// Hurt opens an invincibility window and pauses control; HurtRecovered,
// scheduled `hurt_recovery` later, closes it. The window stands in for
// "wait until the hurt animation has finished".
//
//=========================================================================

use log::debug;

use super::actor_mut;
use crate::core::actors::ActorId;
use crate::core::models::PlatformerModel;
use crate::core::scheduler::{Event, EventContext};

//=== Hurt ================================================================

/// Non-lethal hit on `victim`. No score effect.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Hurt {
    pub victim: Option<ActorId>,
}

impl Event for Hurt {
    fn execute(&mut self, cx: &mut EventContext<'_>) {
        let Some(victim) = self.victim else {
            return;
        };
        let recovery = cx.models_mut().get::<PlatformerModel>().hurt_recovery;

        let Some(actor) = actor_mut(cx.models_mut(), victim) else {
            return;
        };
        if !actor.is_alive() {
            debug!("Ignoring hurt on dead actor {}", victim);
            return;
        }

        actor.invincible = true;
        actor.control_enabled = false;
        actor.hooks_mut().play_hurt();

        cx.schedule::<HurtRecovered>(recovery).actor = Some(victim);
    }
}

//=== HurtRecovered =======================================================

/// End of a hurt sequence: control back on, invincibility off.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HurtRecovered {
    pub actor: Option<ActorId>,
}

impl Event for HurtRecovered {
    fn execute(&mut self, cx: &mut EventContext<'_>) {
        let Some(id) = self.actor else {
            return;
        };
        let Some(actor) = actor_mut(cx.models_mut(), id) else {
            return;
        };
        // A death during the window keeps control off until respawn.
        if !actor.is_alive() {
            return;
        }

        actor.invincible = false;
        actor.control_enabled = true;
        actor.hooks_mut().play_recovered();
    }
}
