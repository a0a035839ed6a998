//=========================================================================
// Gameplay Events
//=========================================================================
//
// The rule catalog: every consequence of a collision, trigger or jump is
// one of these events, routed through the scheduler.
//
// Causal chains:
//   CollisionResolution ─┬─→ Death ─┬─→ Spawn ──→ EnableInput   (player)
//                        │          └─→ Despawn                 (enemy)
//                        ├─→ Hurt ───→ HurtRecovered
//                        └─→ ScoreChange ─(underflow)─→ Death
//   EnteredHazardZone ───→ Death (player) | removal (enemy)
//   JumpController ──────→ Jumped, Landed
//
// Payloads hold actor ids only; an id that no longer resolves turns the
// event into a no-op.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::actors::{Actor, ActorId, Actors};
use crate::core::models::{ModelRegistry, PlatformerModel};

//=== Module Declarations =================================================

mod collision;
mod death;
mod hazard;
mod hurt;
mod movement;
mod score;

//=== Public API ==========================================================

pub use collision::CollisionResolution;
pub use death::{Death, Despawn, EnableInput, Spawn};
pub use hazard::EnteredHazardZone;
pub use hurt::{Hurt, HurtRecovered};
pub use movement::{Jumped, Landed};
pub use score::ScoreChange;

//=== Shared Helpers ======================================================

/// Resolves an optional payload target, falling back to the player bound
/// in [`PlatformerModel`].
fn target_or_player(models: &mut ModelRegistry, target: Option<ActorId>) -> Option<ActorId> {
    target.or(models.get::<PlatformerModel>().player)
}

/// Looks up an actor in the roster.
fn actor_mut(models: &mut ModelRegistry, id: ActorId) -> Option<&mut Actor> {
    models.get::<Actors>().get_mut(id)
}
