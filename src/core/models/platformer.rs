//=========================================================================
// Platformer Models
//=========================================================================
//
// Singleton state shared by the gameplay events:
// - PlatformerModel: player binding, spawn point and rule tunables
// - Score: the running point total owned by the scoring collaborator
// - CameraRig: which actor the camera follows
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use glam::Vec2;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::actors::ActorId;

//=== PlatformerModel =====================================================

/// Shared gameplay state and tunables.
///
/// Installed by the simulation builder from [`crate::config::GameConfig`];
/// the defaults below match the default config.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformerModel {
    /// The player-controlled actor, if one is spawned.
    pub player: Option<ActorId>,

    /// Where the player reappears after dying.
    pub spawn_point: Vec2,

    /// Multiplier applied to the jump take-off speed.
    pub jump_modifier: f32,

    /// Factor applied to upward velocity when jump is released early.
    pub jump_deceleration: f32,

    /// Upward bounce given to an attacker that kills its target.
    pub kill_bounce: f32,

    /// Upward bounce given to an attacker that only hurts its target.
    pub hurt_bounce: f32,

    /// Points lost when the attacker hits a defender from the side.
    pub collision_penalty: i32,

    pub respawn_delay: Duration,
    pub input_enable_delay: Duration,
    pub hurt_recovery: Duration,
    pub enemy_despawn_delay: Duration,
}

impl Default for PlatformerModel {
    fn default() -> Self {
        Self {
            player: None,
            spawn_point: Vec2::ZERO,
            jump_modifier: 1.5,
            jump_deceleration: 0.5,
            kill_bounce: 2.0,
            hurt_bounce: 7.0,
            collision_penalty: 1,
            respawn_delay: Duration::from_secs(2),
            input_enable_delay: Duration::from_secs(1),
            hurt_recovery: Duration::from_millis(500),
            enemy_despawn_delay: Duration::from_secs(1),
        }
    }
}

//=== Score ===============================================================

/// Rejected score changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("score change {delta} would drop the total {current} below zero")]
    Underflow { current: i32, delta: i32 },
}

/// Running point total. Never negative.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    points: i32,
}

impl Score {
    pub fn current_total(&self) -> i32 {
        self.points
    }

    /// Applies `delta` and returns the new total.
    ///
    /// A change that would take the total below zero is rejected and the
    /// total is left untouched.
    pub fn try_apply(&mut self, delta: i32) -> Result<i32, ScoreError> {
        let total = self.points.saturating_add(delta);
        if total < 0 {
            return Err(ScoreError::Underflow {
                current: self.points,
                delta,
            });
        }

        self.points = total;
        Ok(total)
    }

    pub fn reset(&mut self) {
        self.points = 0;
    }
}

//=== CameraRig ===========================================================

/// Camera follow binding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CameraRig {
    pub follow: Option<ActorId>,
    pub look_at: Option<ActorId>,
}

impl CameraRig {
    /// Points the camera at `actor`.
    pub fn bind(&mut self, actor: ActorId) {
        self.follow = Some(actor);
        self.look_at = Some(actor);
    }

    /// Releases the camera if it is currently bound to `actor`.
    ///
    /// Returns true if a binding was removed.
    pub fn detach_from(&mut self, actor: ActorId) -> bool {
        let mut detached = false;
        if self.follow == Some(actor) {
            self.follow = None;
            detached = true;
        }
        if self.look_at == Some(actor) {
            self.look_at = None;
            detached = true;
        }
        detached
    }

    pub fn is_following(&self, actor: ActorId) -> bool {
        self.follow == Some(actor)
    }
}

//=========================================================================
// Tests
//=========================================================================
