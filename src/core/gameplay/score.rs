//=========================================================================
// ScoreChange
//=========================================================================

use std::time::Duration;

use log::{debug, warn};

use super::{target_or_player, Death};
use crate::core::actors::ActorId;
use crate::core::models::Score;
use crate::core::scheduler::{Event, EventContext};

/// Applies a signed delta to the [`Score`].
///
/// A delta that would take the total below zero is rejected; the score
/// owner (the player when `owner` is unset) dies instead.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScoreChange {
    pub delta: i32,
    pub owner: Option<ActorId>,
}

impl Event for ScoreChange {
    fn execute(&mut self, cx: &mut EventContext<'_>) {
        let applied = cx.models_mut().get::<Score>().try_apply(self.delta);
        match applied {
            Ok(total) => debug!("Score {:+} -> {}", self.delta, total),
            Err(err) => {
                let owner = target_or_player(cx.models_mut(), self.owner);
                warn!("{}; scheduling death for {:?}", err, owner);
                if let Some(owner) = owner {
                    cx.schedule::<Death>(Duration::ZERO).victim = Some(owner);
                }
            }
        }
    }
}
