//=========================================================================
// Jump Notifications
//=========================================================================
//
// Emitted by the jump state machine. Pure presentation hooks; no state
// changes of their own.
//
//=========================================================================

use log::trace;

use super::actor_mut;
use crate::core::actors::ActorId;
use crate::core::scheduler::{Event, EventContext};

/// The actor left the ground.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Jumped {
    pub actor: Option<ActorId>,
}

impl Event for Jumped {
    fn execute(&mut self, cx: &mut EventContext<'_>) {
        let Some(id) = self.actor else {
            return;
        };
        if let Some(actor) = actor_mut(cx.models_mut(), id) {
            trace!("Actor {} jumped", id);
            actor.hooks_mut().play_jump();
        }
    }
}

/// The actor touched ground after being airborne.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Landed {
    pub actor: Option<ActorId>,
}

impl Event for Landed {
    fn execute(&mut self, cx: &mut EventContext<'_>) {
        let Some(id) = self.actor else {
            return;
        };
        if let Some(actor) = actor_mut(cx.models_mut(), id) {
            trace!("Actor {} landed", id);
            actor.hooks_mut().play_landed();
        }
    }
}
