//=========================================================================
// CollisionResolution
//=========================================================================
//
// Decides who gets hurt when an attacker touches a defender.
//
// Rule:
//   attacker center-y >= defender top ─┬─ defender dies → Death,
//                                      │    ScoreChange(+award), kill bounce
//                                      └─ defender hurt → Hurt, hurt bounce
//   otherwise ─→ ScoreChange(-penalty) + Hurt on the attacker
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{Death, Hurt, ScoreChange};
use crate::core::actors::{ActorId, Actors};
use crate::core::models::{ModelRegistry, PlatformerModel};
use crate::core::scheduler::{Event, EventContext};

//=== CollisionResolution =================================================

/// Contact between an attacker (usually the player) and a defender.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollisionResolution {
    pub attacker: Option<ActorId>,
    pub defender: Option<ActorId>,
}

/// What the contact turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Killed { award: i32 },
    Wounded,
    Penalized,
}

impl Event for CollisionResolution {
    fn precondition(&self, _models: &ModelRegistry) -> bool {
        self.attacker.is_some() && self.defender.is_some()
    }

    fn execute(&mut self, cx: &mut EventContext<'_>) {
        let (Some(attacker), Some(defender)) = (self.attacker, self.defender) else {
            return;
        };

        let model = cx.models_mut().get::<PlatformerModel>();
        let (kill_bounce, hurt_bounce, penalty) =
            (model.kill_bounce, model.hurt_bounce, model.collision_penalty);

        let actors = cx.models_mut().get::<Actors>();
        let Some(outcome) = resolve(actors, attacker, defender, kill_bounce, hurt_bounce) else {
            debug!("Collision {} -> {} dropped: actor gone or dead", attacker, defender);
            return;
        };

        debug!("Collision {} -> {}: {:?}", attacker, defender, outcome);

        match outcome {
            Outcome::Killed { award } => {
                cx.schedule::<Death>(Duration::ZERO).victim = Some(defender);
                let score = cx.schedule::<ScoreChange>(Duration::ZERO);
                score.delta = award;
                score.owner = Some(attacker);
            }
            Outcome::Wounded => {
                cx.schedule::<Hurt>(Duration::ZERO).victim = Some(defender);
            }
            Outcome::Penalized => {
                let score = cx.schedule::<ScoreChange>(Duration::ZERO);
                score.delta = -penalty;
                score.owner = Some(attacker);
                cx.schedule::<Hurt>(Duration::ZERO).victim = Some(attacker);
            }
        }
    }
}

/// Applies the immediate effects (damage, bounce) and reports the outcome.
/// `None` when either side is missing or already dead; a defender at zero
/// health counts as dead even before its Death event has run.
fn resolve(
    actors: &mut Actors,
    attacker: ActorId,
    defender: ActorId,
    kill_bounce: f32,
    hurt_bounce: f32,
) -> Option<Outcome> {
    let (attacker_bounds, defender_bounds) = {
        let a = actors.get(attacker).filter(|a| a.is_alive())?;
        let d = actors
            .get(defender)
            .filter(|d| d.is_alive() && d.health.is_alive())?;
        (a.bounds(), d.bounds())
    };

    if !attacker_bounds.is_above(&defender_bounds) {
        return Some(Outcome::Penalized);
    }

    let target = actors.get_mut(defender)?;
    target.health.decrement();
    let outcome = if target.health.is_alive() {
        Outcome::Wounded
    } else {
        Outcome::Killed {
            award: target.point_award(),
        }
    };

    let bounce = match outcome {
        Outcome::Killed { .. } => kill_bounce,
        _ => hurt_bounce,
    };
    if let Some(striker) = actors.get_mut(attacker) {
        striker.body_mut().apply_vertical_impulse(bounce);
    }

    Some(outcome)
}

//=========================================================================
// Tests
//=========================================================================
