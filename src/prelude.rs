//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use platformer_core::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Simulation facade
pub use crate::engine::{Simulation, SimulationBuilder, SimulationError, SimulationHandle};

// Configuration
pub use crate::config::{ConfigError, GameConfig};

// Actors and collaborator capabilities
pub use crate::core::actors::{
    Actor, ActorHooks, ActorId, ActorKind, Actors, Bounds, EnemyProfile, Health, LifeState, NoHooks,
    PhysicsBody,
};

// Jump state machine
pub use crate::core::jump::{JumpController, JumpInput, JumpState};

// Scheduler and models
pub use crate::core::models::{CameraRig, Model, ModelRegistry, PlatformerModel, Score, ScoreError};
pub use crate::core::scheduler::{Event, EventContext, Scheduler};

// Gameplay events
pub use crate::core::gameplay::{
    CollisionResolution, Death, Despawn, EnableInput, EnteredHazardZone, Hurt, HurtRecovered,
    Jumped, Landed, ScoreChange, Spawn,
};

// Collaborator signals
pub use crate::core::signals::WorldSignal;
