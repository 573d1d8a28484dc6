//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay engine-agnostic:
//! - Physics, ray-casts and overlaps come through [`PhysicsHost`] / [`TickInput`]
//! - Delays run on the simulation clock (summed `dt`), never wall-clock
//! - Stable iteration order (per-ball records keyed by entity id)
//! - No rendering or platform dependencies

pub mod gesture;
pub mod host;
pub mod scoring;
pub mod session;
pub mod state;
pub mod tick;
pub mod timers;

pub use gesture::{
    GestureEvent, GestureTracker, HeldBall, PointerFrame, PointerInput, ThrowImpulse, TouchPhase,
    TouchSample, enforce_min_lift, follow_step, swipe_throw_speed, throw_impulse,
};
pub use host::{Camera, EntityId, PhysicsHost, Ray, RayHit, TriggerOverlap, TriggerZone};
pub use scoring::{BallScoreState, ScoreEvent, ScoreRegistry, ScoringRules, ShotKind};
pub use session::{GameSession, Outcome};
pub use state::{GameEvent, GameState};
pub use tick::{TickInput, tick};
pub use timers::{TimerAction, Timers};
