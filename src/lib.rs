//! Swipe Hoops - A swipe-to-throw basketball mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gestures, basket scoring, round timer)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player effect preferences
//! - `effects`: Particle/audio cue playback for score events
//! - `ui`: Panel toggles and HUD text mirrored by the host
//! - `sandbox`: Minimal in-memory host used by the demo runner and tests
//! - `autoplay`: Seeded auto-player that drives the sandbox with touch input

pub mod autoplay;
pub mod effects;
pub mod sandbox;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Tag carried by every throwable ball
    pub const BALL_TAG: &str = "ballTag";
    /// Physics layer balls live on
    pub const BALL_LAYER: u32 = 9;
    /// Pickup ray length (world units)
    pub const MAX_PICKUP_DISTANCE: f32 = 15.0;

    /// Swipe speed (px/s) / 100 is scaled by this to get the throw force
    pub const THROW_FORCE_MULTIPLIER: f32 = 15.0;
    /// Minimum swipe speed (px/s) that counts as a throw
    pub const MIN_SWIPE_SPEED: f32 = 150.0;
    /// How much the swipe bends the throw away from camera forward
    pub const SWIPE_SENSITIVITY: f32 = 1.5;
    pub const MIN_THROW_FORCE: f32 = 10.0;
    pub const MAX_THROW_FORCE: f32 = 50.0;
    /// Minimum vertical component of a normalized throw direction
    pub const MIN_THROW_LIFT: f32 = 0.3;
    /// Lerp rate (per second) of a held ball toward the pointer
    pub const HOLD_FOLLOW_RATE: f32 = 8.0;

    /// A ball must fall faster than this (y velocity) through the top trigger
    pub const DESCENT_SPEED_THRESHOLD: f32 = -1.0;
    pub const PERFECT_POINTS: u32 = 3;
    pub const REGULAR_POINTS: u32 = 1;
    /// Seconds a scored ball's record lives before purge
    pub const SCORE_STATE_TTL: f32 = 3.0;

    /// Shots needed to win the round
    pub const SHOTS_NEEDED: u32 = 3;
    /// Round length in seconds
    pub const GAME_TIME_LIMIT: f32 = 30.0;
    /// Delay before the download button appears after the round ends
    pub const DOWNLOAD_REVEAL_DELAY: f32 = 1.0;
    /// Delay before the post-score message resets
    pub const INSTRUCTION_RESET_DELAY: f32 = 2.0;
}

/// Convert a delay in seconds to a whole number of ticks (never zero)
#[inline]
pub fn secs_to_ticks(secs: f32, dt: f32) -> u64 {
    if dt <= 0.0 || secs <= 0.0 {
        return 1;
    }
    // Absorb float noise so 3.0 / (1/60) is 180 ticks, not 181
    ((secs / dt - 1e-3).ceil() as u64).max(1)
}

/// Lerp `from` toward `to` with `t` clamped to [0, 1]
#[inline]
pub fn lerp_clamped(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    from.lerp(to, t.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secs_to_ticks_rounds_up() {
        assert_eq!(secs_to_ticks(1.0, 0.25), 4);
        assert_eq!(secs_to_ticks(1.1, 0.25), 5);
        assert_eq!(secs_to_ticks(0.0, 0.25), 1);
    }

    #[test]
    fn test_lerp_clamped_never_overshoots() {
        let p = lerp_clamped(Vec3::ZERO, Vec3::X, 3.0);
        assert_eq!(p, Vec3::X);
    }
}
