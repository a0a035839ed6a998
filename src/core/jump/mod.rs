//=========================================================================
// Jump State Machine
//=========================================================================
//
// Per-player controller deciding, once per tick, whether to start a jump,
// keep rising, detect landing, and reset.
//
// States:
//   Grounded ─(press, charges>0)→ PrepareToJump ─→ Jumping
//       ▲                                            │ (left ground)
//       │                                            ▼  schedule Jumped
//     Landed ←─(touched ground, schedule Landed)── InFlight
//
// A press while InFlight with charges left re-enters PrepareToJump,
// which is how the multi-jump budget is spent.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::actors::{ActorId, PhysicsBody};
use crate::core::gameplay::{Jumped, Landed};
use crate::core::scheduler::Scheduler;

//=== JumpState ===========================================================

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JumpState {
    #[default]
    Grounded,
    PrepareToJump,
    Jumping,
    InFlight,
    Landed,
}

//=== JumpInput ===========================================================

/// Jump button edges observed this frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JumpInput {
    /// Button went down this frame.
    pub pressed: bool,
    /// Button went up this frame.
    pub released: bool,
}

impl JumpInput {
    pub const NONE: Self = Self {
        pressed: false,
        released: false,
    };

    pub fn press() -> Self {
        Self {
            pressed: true,
            released: false,
        }
    }

    pub fn release() -> Self {
        Self {
            pressed: false,
            released: true,
        }
    }
}

//=== JumpController ======================================================

/// Jump state machine with a bounded charge budget.
///
/// Charges only drop on `PrepareToJump → Jumping` and only refill on
/// `Landed → Grounded`.
#[derive(Debug, Clone, PartialEq)]
pub struct JumpController {
    state: JumpState,
    charges: u32,
    max_charges: u32,
    take_off_speed: f32,
    impulse_requested: bool,
    stop_requested: bool,
}

impl JumpController {
    //--- Construction -----------------------------------------------------

    pub fn new(max_charges: u32, take_off_speed: f32) -> Self {
        Self {
            state: JumpState::Grounded,
            charges: max_charges,
            max_charges,
            take_off_speed,
            impulse_requested: false,
            stop_requested: false,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn state(&self) -> JumpState {
        self.state
    }

    pub fn charges(&self) -> u32 {
        self.charges
    }

    pub fn max_charges(&self) -> u32 {
        self.max_charges
    }

    /// Whether a take-off impulse is waiting for this tick's physics step.
    pub fn impulse_requested(&self) -> bool {
        self.impulse_requested
    }

    //--- Update -----------------------------------------------------------

    /// Evaluates one transition for this tick.
    ///
    /// `grounded` is the physics body's report for this step. `Jumped` and
    /// `Landed` notifications for `actor` go through `scheduler`.
    pub fn update(
        &mut self,
        input: JumpInput,
        grounded: bool,
        actor: ActorId,
        scheduler: &mut Scheduler,
    ) -> JumpState {
        self.impulse_requested = false;

        if input.released && matches!(self.state, JumpState::Jumping | JumpState::InFlight) {
            self.stop_requested = true;
        }

        let previous = self.state;
        match self.state {
            JumpState::Grounded | JumpState::InFlight if input.pressed && self.charges > 0 => {
                self.state = JumpState::PrepareToJump;
            }
            JumpState::Grounded => {}
            JumpState::PrepareToJump => {
                self.state = JumpState::Jumping;
                self.charges = self.charges.saturating_sub(1);
                self.impulse_requested = true;
                self.stop_requested = false;
            }
            JumpState::Jumping => {
                if !grounded {
                    scheduler.schedule::<Jumped>(Duration::ZERO).actor = Some(actor);
                    self.state = JumpState::InFlight;
                }
            }
            JumpState::InFlight => {
                if grounded {
                    scheduler.schedule::<Landed>(Duration::ZERO).actor = Some(actor);
                    self.state = JumpState::Landed;
                }
            }
            JumpState::Landed => {
                self.state = JumpState::Grounded;
                self.charges = self.max_charges;
            }
        }

        if previous != self.state {
            debug!(
                "Actor {} jump {:?} -> {:?} ({} charges)",
                actor, previous, self.state, self.charges
            );
        }

        self.state
    }

    /// Hands this tick's velocity request to the physics body.
    ///
    /// A pending take-off wins over an early-release damping.
    pub fn apply_physics(
        &mut self,
        body: &mut dyn PhysicsBody,
        jump_modifier: f32,
        deceleration: f32,
    ) {
        if self.impulse_requested {
            self.impulse_requested = false;
            body.apply_vertical_impulse(self.take_off_speed * jump_modifier);
        } else if self.stop_requested {
            self.stop_requested = false;
            body.dampen_rise(deceleration);
        }
    }

    /// Back to grounded with a full budget (used on respawn).
    pub fn reset(&mut self) {
        self.state = JumpState::Grounded;
        self.charges = self.max_charges;
        self.impulse_requested = false;
        self.stop_requested = false;
    }
}

//=========================================================================
// Tests
//=========================================================================
