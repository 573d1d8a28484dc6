//! Round bookkeeping: shots made, points, countdown and outcome

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// How the round stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Active,
    Won,
    Lost,
}

/// One timed round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    /// Baskets made
    pub score: u32,
    /// Sum of basket points (3 perfect / 1 regular)
    pub points: u32,
    /// Seconds left; may go slightly negative on the final tick
    pub time_remaining: f32,
    pub game_ended: bool,
    pub outcome: Outcome,
    pub shots_needed: u32,
    pub time_limit: f32,
    /// Balls in the scene when the round started
    pub total_balls: usize,
}

impl GameSession {
    pub fn new(tuning: &Tuning, total_balls: usize) -> Self {
        Self {
            score: 0,
            points: 0,
            time_remaining: tuning.game_time_limit,
            game_ended: false,
            outcome: Outcome::Active,
            shots_needed: tuning.shots_needed,
            time_limit: tuning.game_time_limit,
            total_balls,
        }
    }

    /// Back to a fresh round with the same limits
    pub fn reset(&mut self) {
        self.score = 0;
        self.points = 0;
        self.time_remaining = self.time_limit;
        self.game_ended = false;
        self.outcome = Outcome::Active;
    }

    /// Shots still needed to win
    pub fn shots_to_go(&self) -> u32 {
        self.shots_needed.saturating_sub(self.score)
    }

    /// Count a basket. Ignored once the round has ended.
    pub fn register_score(&mut self, points: u32) -> bool {
        if self.game_ended {
            log::debug!("Ignoring {} point basket after round end", points);
            return false;
        }
        self.score += 1;
        self.points += points;
        log::info!(
            "Ball scored! Score {}/{} ({} points)",
            self.score,
            self.shots_needed,
            self.points
        );
        true
    }

    /// Advance the countdown and check win/lose
    ///
    /// Returns the terminal outcome on the one tick it is reached.
    pub fn tick(&mut self, dt: f32) -> Option<Outcome> {
        if self.game_ended {
            return None;
        }
        self.time_remaining -= dt;

        let outcome = if self.score >= self.shots_needed {
            Outcome::Won
        } else if self.time_remaining <= 0.0 {
            Outcome::Lost
        } else {
            return None;
        };
        self.game_ended = true;
        self.outcome = outcome;
        log::info!("Round over: {:?}", outcome);
        Some(outcome)
    }

    /// Seconds shown on the HUD (whole seconds, rounded up)
    pub fn display_seconds(&self) -> u32 {
        self.time_remaining.max(0.0).ceil() as u32
    }

    pub fn hud_text(&self) -> String {
        format!(
            "Score: {}/{} | Time: {}",
            self.score,
            self.shots_needed,
            self.display_seconds()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::new(&Tuning::default(), 5)
    }

    #[test]
    fn test_new_session_is_active() {
        let s = session();
        assert_eq!(s.outcome, Outcome::Active);
        assert_eq!(s.time_remaining, 30.0);
        assert_eq!(s.shots_to_go(), 3);
        assert_eq!(s.hud_text(), "Score: 0/3 | Time: 30");
    }

    #[test]
    fn test_win_on_reaching_shots_needed() {
        let mut s = session();
        s.register_score(3);
        s.register_score(1);
        assert_eq!(s.tick(0.1), None);
        s.register_score(3);
        assert_eq!(s.tick(0.1), Some(Outcome::Won));
        assert_eq!(s.points, 7);
        assert!(s.game_ended);
    }

    #[test]
    fn test_lose_when_time_runs_out() {
        let mut s = session();
        assert_eq!(s.tick(29.5), None);
        assert_eq!(s.tick(0.5), Some(Outcome::Lost));
        assert_eq!(s.display_seconds(), 0);
    }

    #[test]
    fn test_win_beats_timeout_on_same_tick() {
        let mut s = session();
        for _ in 0..3 {
            s.register_score(1);
        }
        assert_eq!(s.tick(31.0), Some(Outcome::Won));
    }

    #[test]
    fn test_terminal_is_one_shot() {
        let mut s = session();
        s.tick(30.0);
        assert_eq!(s.outcome, Outcome::Lost);
        let remaining = s.time_remaining;

        assert!(!s.register_score(3));
        assert_eq!(s.tick(1.0), None);
        assert_eq!(s.score, 0);
        assert_eq!(s.time_remaining, remaining);
        assert_eq!(s.outcome, Outcome::Lost);
    }

    #[test]
    fn test_reset_restores_limits() {
        let mut s = session();
        s.register_score(3);
        s.tick(40.0);
        s.reset();
        assert_eq!(s, session());
    }
}
