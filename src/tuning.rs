//! Data-driven game balance
//!
//! Every field has a default from [`crate::consts`], so a tuning file only
//! needs the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors raised while loading a tuning file
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Gameplay tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Pickup ===
    pub ball_tag: String,
    pub ball_layer: u32,
    pub max_pickup_distance: f32,

    // === Throwing ===
    pub throw_force_multiplier: f32,
    /// px/s
    pub min_swipe_speed: f32,
    pub swipe_sensitivity: f32,
    pub min_throw_force: f32,
    pub max_throw_force: f32,
    pub min_throw_lift: f32,
    pub hold_follow_rate: f32,

    // === Scoring ===
    pub descent_speed_threshold: f32,
    pub perfect_points: u32,
    pub regular_points: u32,
    /// Seconds
    pub score_state_ttl: f32,

    // === Round ===
    pub shots_needed: u32,
    /// Seconds
    pub game_time_limit: f32,
    pub download_reveal_delay: f32,
    pub instruction_reset_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ball_tag: BALL_TAG.to_string(),
            ball_layer: BALL_LAYER,
            max_pickup_distance: MAX_PICKUP_DISTANCE,

            throw_force_multiplier: THROW_FORCE_MULTIPLIER,
            min_swipe_speed: MIN_SWIPE_SPEED,
            swipe_sensitivity: SWIPE_SENSITIVITY,
            min_throw_force: MIN_THROW_FORCE,
            max_throw_force: MAX_THROW_FORCE,
            min_throw_lift: MIN_THROW_LIFT,
            hold_follow_rate: HOLD_FOLLOW_RATE,

            descent_speed_threshold: DESCENT_SPEED_THRESHOLD,
            perfect_points: PERFECT_POINTS,
            regular_points: REGULAR_POINTS,
            score_state_ttl: SCORE_STATE_TTL,

            shots_needed: SHOTS_NEEDED,
            game_time_limit: GAME_TIME_LIMIT,
            download_reveal_delay: DOWNLOAD_REVEAL_DELAY,
            instruction_reset_delay: INSTRUCTION_RESET_DELAY,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read and validate a JSON tuning file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load a tuning file, falling back to defaults on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject values that would break clamping or the round timer
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.min_throw_force <= self.max_throw_force) {
            return Err(TuningError::Invalid {
                field: "min_throw_force",
                reason: format!(
                    "{} exceeds max_throw_force {}",
                    self.min_throw_force, self.max_throw_force
                ),
            });
        }
        if !(0.0..1.0).contains(&self.min_throw_lift) {
            return Err(TuningError::Invalid {
                field: "min_throw_lift",
                reason: format!("{} must be in [0, 1)", self.min_throw_lift),
            });
        }
        if !(self.min_swipe_speed > 0.0) {
            return Err(TuningError::Invalid {
                field: "min_swipe_speed",
                reason: format!("{} must be positive", self.min_swipe_speed),
            });
        }
        if !(self.game_time_limit > 0.0) {
            return Err(TuningError::Invalid {
                field: "game_time_limit",
                reason: format!("{} must be positive", self.game_time_limit),
            });
        }
        if self.shots_needed == 0 {
            return Err(TuningError::Invalid {
                field: "shots_needed",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
