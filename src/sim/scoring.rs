//! Basket score detection
//!
//! Each ball walks a small state machine driven by the basket's trigger
//! zones: entering the top zone while falling arms it, touching the ring
//! marks it perfect, and reaching the bottom zone scores it. A scored ball
//! ignores further triggers until its record expires.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::host::{EntityId, TriggerZone};

/// Scoring progress for one ball
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallScoreState {
    pub passed_top_trigger: bool,
    pub touched_ring: bool,
    pub has_scored: bool,
    /// Tick at which the record is dropped (set once scored)
    pub purge_at_tick: Option<u64>,
}

/// Kind of basket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotKind {
    /// Ring contact before the basket
    Perfect,
    Regular,
}

/// A completed basket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub entity: EntityId,
    pub kind: ShotKind,
    pub points: u32,
}

/// Scoring rules that the registry needs per event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringRules {
    /// Y velocity must be below this at the top trigger
    pub descent_speed_threshold: f32,
    pub perfect_points: u32,
    pub regular_points: u32,
    /// How long a scored record lives
    pub ttl_ticks: u64,
}

/// Per-ball score records keyed by entity id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreRegistry {
    balls: BTreeMap<EntityId, BallScoreState>,
}

impl ScoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, entity: EntityId) -> Option<&BallScoreState> {
        self.balls.get(&entity)
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn clear(&mut self) {
        self.balls.clear();
    }

    /// Feed one trigger overlap for a ball
    ///
    /// `vertical_velocity` is the ball's Y velocity at the time of the event,
    /// or `None` if it has no rigid body. Returns the score when this event
    /// completes a basket.
    pub fn handle_trigger(
        &mut self,
        entity: EntityId,
        zone: TriggerZone,
        vertical_velocity: Option<f32>,
        now_tick: u64,
        rules: &ScoringRules,
    ) -> Option<ScoreEvent> {
        let state = self.balls.entry(entity).or_default();
        if state.has_scored {
            return None;
        }
        log::debug!("Ball {:?} triggered {:?}", entity, zone);

        match zone {
            TriggerZone::Top => {
                if vertical_velocity.is_some_and(|vy| vy < rules.descent_speed_threshold) {
                    state.passed_top_trigger = true;
                    log::debug!("Ball {:?} passed top trigger going down", entity);
                }
                None
            }
            // Ring contact counts whenever it happens before the basket
            TriggerZone::Ring => {
                state.touched_ring = true;
                log::debug!("Ball {:?} touched the ring", entity);
                None
            }
            TriggerZone::Bottom => {
                if !state.passed_top_trigger {
                    return None;
                }
                let (kind, points) = if state.touched_ring {
                    (ShotKind::Perfect, rules.perfect_points)
                } else {
                    (ShotKind::Regular, rules.regular_points)
                };
                state.has_scored = true;
                state.purge_at_tick = Some(now_tick + rules.ttl_ticks);
                log::info!("SCORE! Ball {:?}: {:?} for {} points", entity, kind, points);
                Some(ScoreEvent {
                    entity,
                    kind,
                    points,
                })
            }
        }
    }

    /// Drop scored records whose expiry tick has been reached
    pub fn purge_expired(&mut self, now_tick: u64) -> usize {
        let before = self.balls.len();
        self.balls
            .retain(|_, s| s.purge_at_tick.is_none_or(|at| now_tick < at));
        let purged = before - self.balls.len();
        if purged > 0 {
            log::debug!("Purged {} scored ball record(s)", purged);
        }
        purged
    }
}
