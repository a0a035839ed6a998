//=========================================================================
// World Signals
//=========================================================================
//
// Collaborator-to-core messages.
//
// Physics, trigger volumes and input polling live outside the core and
// report what they observed through this enum, either directly via
// `Simulation::apply` or over the channel of a running simulation.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::actors::ActorId;
use crate::core::jump::JumpInput;

//=== WorldSignal =========================================================

/// Something the outside world noticed this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldSignal {
    /// Two actors touched; `attacker` is the one that moved into `defender`.
    Collision { attacker: ActorId, defender: ActorId },

    /// An actor entered a kill zone.
    HazardEntered { entity: ActorId },

    /// Jump button edges for a player this frame.
    Input { actor: ActorId, input: JumpInput },

    /// Stop the simulation loop after this frame.
    Shutdown,
}

impl WorldSignal {
    /// Whether this signal ends a running loop.
    pub fn is_shutdown(&self) -> bool {
        matches!(self, Self::Shutdown)
    }
}
