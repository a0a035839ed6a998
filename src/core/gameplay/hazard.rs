//=========================================================================
// EnteredHazardZone
//=========================================================================

use std::time::Duration;

use log::debug;

use super::death::remove_actor;
use super::Death;
use crate::core::actors::{ActorId, ActorKind, Actors};
use crate::core::scheduler::{Event, EventContext};

/// An actor fell into a kill zone.
///
/// Players go through the normal death and respawn chain; enemies are
/// removed on the spot.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnteredHazardZone {
    pub entity: Option<ActorId>,
}

impl Event for EnteredHazardZone {
    fn execute(&mut self, cx: &mut EventContext<'_>) {
        let Some(id) = self.entity else {
            return;
        };
        let Some(kind) = cx.models_mut().get::<Actors>().get(id).map(|actor| actor.kind()) else {
            debug!("Hazard entered by unknown actor {}", id);
            return;
        };

        match kind {
            ActorKind::Player => {
                cx.schedule::<Death>(Duration::ZERO).victim = Some(id);
            }
            ActorKind::Enemy => {
                remove_actor(cx.models_mut(), id);
            }
        }
    }
}
