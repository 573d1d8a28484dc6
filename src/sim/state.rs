//! Game state and events
//!
//! Everything the step function mutates lives in [`GameState`]; the host
//! owns physics and reads back [`GameEvent`]s and the UI state.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::gesture::{GestureEvent, GestureTracker};
use super::host::{Camera, EntityId};
use super::scoring::{ScoreRegistry, ScoringRules, ShotKind};
use super::session::{GameSession, Outcome};
use super::timers::Timers;
use crate::secs_to_ticks;
use crate::tuning::Tuning;
use crate::ui::{UiLayout, UiState};

/// Something the host may want to react to (effects, analytics, logging)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BallPickedUp {
        entity: EntityId,
    },
    BallThrown {
        entity: EntityId,
        velocity: Vec3,
        force: f32,
    },
    BallReleased {
        entity: EntityId,
    },
    /// A basket; `counted` is false when the round had already ended
    Scored {
        entity: EntityId,
        kind: ShotKind,
        points: u32,
        counted: bool,
    },
    RoundOver {
        outcome: Outcome,
    },
    DownloadButtonShown,
}

impl From<GestureEvent> for GameEvent {
    fn from(event: GestureEvent) -> Self {
        match event {
            GestureEvent::PickedUp { entity } => GameEvent::BallPickedUp { entity },
            GestureEvent::Thrown { entity, impulse } => GameEvent::BallThrown {
                entity,
                velocity: impulse.velocity(),
                force: impulse.force,
            },
            GestureEvent::Released { entity } => GameEvent::BallReleased { entity },
        }
    }
}

/// Complete game state for one scene
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub camera: Camera,
    pub session: GameSession,
    pub scores: ScoreRegistry,
    pub gesture: GestureTracker,
    pub timers: Timers,
    pub ui: UiState,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulation clock (seconds), the sum of every tick's `dt`
    pub time_secs: f64,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Start a round
    ///
    /// Tuning that fails validation is replaced by the defaults.
    pub fn new(tuning: Tuning, camera: Camera, layout: UiLayout, total_balls: usize) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Using default tuning: {}", e);
                Tuning::default()
            }
        };
        let session = GameSession::new(&tuning, total_balls);
        let mut ui = UiState::new(layout);
        ui.hud = session.hud_text();
        log::info!(
            "Game started with {} balls: {}",
            total_balls,
            crate::ui::START_MESSAGE
        );
        Self {
            tuning,
            camera,
            session,
            scores: ScoreRegistry::new(),
            gesture: GestureTracker::new(),
            timers: Timers::new(),
            ui,
            time_ticks: 0,
            time_secs: 0.0,
            events: Vec::new(),
        }
    }

    /// Reset everything to a fresh round (same tuning, camera and layout)
    pub fn restart(&mut self) {
        self.session.reset();
        self.scores.clear();
        self.timers.clear();
        self.gesture = GestureTracker::new();
        self.ui = UiState::new(self.ui.layout());
        self.ui.hud = self.session.hud_text();
        self.time_ticks = 0;
        self.time_secs = 0.0;
        self.events.clear();
        log::info!("Round restarted: {}", crate::ui::START_MESSAGE);
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn outcome(&self) -> Outcome {
        self.session.outcome
    }

    /// Score rules with delays converted to ticks at `dt`
    pub fn scoring_rules(&self, dt: f32) -> ScoringRules {
        ScoringRules {
            descent_speed_threshold: self.tuning.descent_speed_threshold,
            perfect_points: self.tuning.perfect_points,
            regular_points: self.tuning.regular_points,
            ttl_ticks: secs_to_ticks(self.tuning.score_state_ttl, dt),
        }
    }
}
