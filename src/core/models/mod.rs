//=========================================================================
// Models
//=========================================================================
//
// Shared gameplay state, keyed by type.
//
// Architecture:
//   ModelRegistry
//     ├─ PlatformerModel (player, spawn point, tunables)
//     ├─ Score
//     ├─ CameraRig
//     └─ Actors (roster, see core::actors)
//
//=========================================================================

//=== Module Declarations =================================================

mod platformer;
mod registry;

//=== Public API ==========================================================

pub use platformer::{CameraRig, PlatformerModel, Score, ScoreError};
pub use registry::{Model, ModelRegistry};
