//=========================================================================
// Collaborator Hooks
//=========================================================================
//
// Capability interfaces the rules call out to. Implemented outside the
// core by the physics, animation and audio layers, and injected into
// each actor when it is created.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::Bounds;

//=== PhysicsBody =========================================================

/// Physics integration for one actor.
///
/// The core never integrates motion itself; it only reads grounded state
/// and bounds, and asks for velocity changes.
pub trait PhysicsBody: Send {
    /// Current collision box.
    fn bounds(&self) -> Bounds;

    /// Whether the body is resting on ground this step.
    fn is_grounded(&self) -> bool;

    /// Sets the vertical velocity to `speed` (jump take-off, bounce).
    fn apply_vertical_impulse(&mut self, speed: f32);

    /// Scales upward velocity by `factor` (early jump release).
    fn dampen_rise(&mut self, factor: f32);

    /// Moves the body without simulating the path.
    fn teleport_to(&mut self, position: Vec2);

    /// Turns the body's simulation on or off. Bodies that cannot be
    /// frozen may ignore this.
    fn set_simulated(&mut self, _enabled: bool) {}
}

//=== ActorHooks ==========================================================

/// Presentation hooks: animation triggers, sound effects, scene removal.
///
/// Every hook defaults to doing nothing, so an actor without a sound or
/// an animation simply skips it.
pub trait ActorHooks: Send {
    fn play_hurt(&mut self) {}
    fn play_recovered(&mut self) {}
    fn play_death(&mut self) {}
    fn play_spawn(&mut self) {}
    fn play_jump(&mut self) {}
    fn play_landed(&mut self) {}

    /// Removes the actor's scene objects.
    fn despawn(&mut self) {}
}

/// Hooks for actors with no presentation attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl ActorHooks for NoHooks {}
