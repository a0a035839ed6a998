//=========================================================================
// Game Configuration
//=========================================================================
//
// Rule tunables loaded from RON.
//
// Every field has a default, so a config file only lists what it changes:
//
// ```text
// (
//     max_jump_charges: 3,
//     respawn_delay_secs: 1.5,
//     spawn_point: (4.0, 2.0),
// )
// ```
//
// The simulation builder validates the config and installs it into the
// model registry as the `PlatformerModel` singleton.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::jump::JumpController;
use crate::core::models::PlatformerModel;

//=== ConfigError =========================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("config serialize error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

//=== GameConfig ==========================================================

/// Tunables for the rules, the jump machine and the driving loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Simulation ticks per second when run on its own thread.
    pub tick_rate: f64,

    pub max_jump_charges: u32,
    pub jump_take_off_speed: f32,
    pub jump_modifier: f32,
    pub jump_deceleration: f32,

    pub kill_bounce: f32,
    pub hurt_bounce: f32,
    pub collision_penalty: i32,

    pub player_max_health: u32,

    pub respawn_delay_secs: f64,
    pub input_enable_delay_secs: f64,
    pub hurt_recovery_secs: f64,
    pub enemy_despawn_delay_secs: f64,

    pub spawn_point: Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_jump_charges: 2,
            jump_take_off_speed: 7.0,
            jump_modifier: 1.5,
            jump_deceleration: 0.5,
            kill_bounce: 2.0,
            hurt_bounce: 7.0,
            collision_penalty: 1,
            player_max_health: 1,
            respawn_delay_secs: 2.0,
            input_enable_delay_secs: 1.0,
            hurt_recovery_secs: 0.5,
            enemy_despawn_delay_secs: 1.0,
            spawn_point: Vec2::ZERO,
        }
    }
}

impl GameConfig {
    //--- Loading ----------------------------------------------------------

    /// Parses and validates a config from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Loaded config from {}", path.display());
        Self::from_ron_str(&text)
    }

    /// Pretty-printed RON, readable back with [`GameConfig::from_ron_str`].
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new().indentor("    ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    //--- Validation -------------------------------------------------------

    /// Rejects values the rules cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(invalid(format!("tick_rate must be positive, got {}", self.tick_rate)));
        }
        match Duration::try_from_secs_f64(1.0 / self.tick_rate) {
            Ok(frame) if !frame.is_zero() => {}
            _ => {
                return Err(invalid(format!(
                    "tick_rate {} does not give a representable frame length",
                    self.tick_rate
                )));
            }
        }
        if self.max_jump_charges == 0 {
            return Err(invalid("max_jump_charges must be at least 1".to_string()));
        }
        if self.player_max_health == 0 {
            return Err(invalid("player_max_health must be at least 1".to_string()));
        }
        if self.collision_penalty < 0 {
            return Err(invalid(format!(
                "collision_penalty must not be negative, got {}",
                self.collision_penalty
            )));
        }

        let tunables = [
            ("jump_take_off_speed", self.jump_take_off_speed),
            ("jump_modifier", self.jump_modifier),
            ("jump_deceleration", self.jump_deceleration),
            ("kill_bounce", self.kill_bounce),
            ("hurt_bounce", self.hurt_bounce),
            ("spawn_point.x", self.spawn_point.x),
            ("spawn_point.y", self.spawn_point.y),
        ];
        for (name, value) in tunables {
            if !value.is_finite() {
                return Err(invalid(format!("{} must be finite, got {}", name, value)));
            }
        }

        let delays = [
            ("respawn_delay_secs", self.respawn_delay_secs),
            ("input_enable_delay_secs", self.input_enable_delay_secs),
            ("hurt_recovery_secs", self.hurt_recovery_secs),
            ("enemy_despawn_delay_secs", self.enemy_despawn_delay_secs),
        ];
        for (name, value) in delays {
            if Duration::try_from_secs_f64(value).is_err() {
                return Err(invalid(format!(
                    "{} must be a finite, non-negative number of seconds, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    //--- Conversion -------------------------------------------------------

    /// Length of one simulation frame at `tick_rate`.
    pub fn frame_duration(&self) -> Duration {
        secs(1.0 / self.tick_rate)
    }

    /// The rule tunables as a registry model, with no player bound.
    pub fn to_model(&self) -> PlatformerModel {
        PlatformerModel {
            player: None,
            spawn_point: self.spawn_point,
            jump_modifier: self.jump_modifier,
            jump_deceleration: self.jump_deceleration,
            kill_bounce: self.kill_bounce,
            hurt_bounce: self.hurt_bounce,
            collision_penalty: self.collision_penalty,
            respawn_delay: secs(self.respawn_delay_secs),
            input_enable_delay: secs(self.input_enable_delay_secs),
            hurt_recovery: secs(self.hurt_recovery_secs),
            enemy_despawn_delay: secs(self.enemy_despawn_delay_secs),
        }
    }

    /// A fresh jump machine for a newly spawned player.
    pub fn jump_controller(&self) -> JumpController {
        JumpController::new(self.max_jump_charges, self.jump_take_off_speed)
    }
}

//=== Internal Helpers ====================================================

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}

/// Invalid values collapse to zero; [`GameConfig::validate`] rejects them
/// before they get here.
fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_default()
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_default_model() {
        assert_eq!(GameConfig::default().to_model(), PlatformerModel::default());
    }

    #[test]
    fn partial_ron_keeps_remaining_defaults() {
        let config = GameConfig::from_ron_str(
            "(max_jump_charges: 3, respawn_delay_secs: 1.5, spawn_point: (4.0, 2.0))",
        )
        .unwrap();

        assert_eq!(config.max_jump_charges, 3);
        assert_eq!(config.spawn_point, Vec2::new(4.0, 2.0));
        assert_eq!(config.kill_bounce, 2.0);

        let model = config.to_model();
        assert_eq!(model.respawn_delay, Duration::from_millis(1500));
        assert_eq!(model.hurt_recovery, Duration::from_millis(500));
    }

    #[test]
    fn empty_ron_is_default() {
        assert_eq!(GameConfig::from_ron_str("()").unwrap(), GameConfig::default());
    }

    #[test]
    fn pretty_output_reads_back() {
        let mut config = GameConfig::default();
        config.hurt_bounce = 5.0;
        config.collision_penalty = 3;

        let text = config.to_ron_string().unwrap();
        assert_eq!(GameConfig::from_ron_str(&text).unwrap(), config);
    }

    #[test]
    fn malformed_ron_is_parse_error() {
        let err = GameConfig::from_ron_str("(tick_rate: fast)").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases = [
            "(tick_rate: 0.0)",
            "(tick_rate: -30.0)",
            "(tick_rate: 1e-300)",
            "(tick_rate: 1e300)",
            "(max_jump_charges: 0)",
            "(player_max_health: 0)",
            "(collision_penalty: -1)",
            "(respawn_delay_secs: -1.0)",
        ];
        for text in cases {
            let err = GameConfig::from_ron_str(text).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{} -> {:?}", text, err);
        }
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut config = GameConfig::default();
        config.hurt_recovery_secs = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.jump_modifier = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GameConfig::load("does/not/exist.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn frame_duration_follows_tick_rate() {
        let mut config = GameConfig::default();
        config.tick_rate = 50.0;
        assert_eq!(config.frame_duration(), Duration::from_millis(20));
    }

    #[test]
    fn jump_controller_uses_charge_budget() {
        let mut config = GameConfig::default();
        config.max_jump_charges = 4;
        let jump = config.jump_controller();
        assert_eq!(jump.charges(), 4);
        assert_eq!(jump.max_charges(), 4);
    }
}
