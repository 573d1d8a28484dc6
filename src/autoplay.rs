//! Seeded auto-player for demos and soak runs
//!
//! Picks a resting ball, searches a grid of swipes by replaying the drag and
//! flying each candidate in a cloned sandbox, and feeds the chosen swipe back
//! as touch input.

use std::collections::VecDeque;

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::SIM_DT;
use crate::sandbox::Sandbox;
use crate::sim::{
    Camera, EntityId, GameState, PhysicsHost, PointerInput, ScoreEvent, ScoreRegistry, TouchPhase,
    follow_step, swipe_throw_speed, throw_impulse,
};
use crate::tuning::Tuning;

/// Longest predicted flight (seconds)
const FLIGHT_HORIZON: f32 = 4.0;
/// A ball slower than this is considered at rest
const REST_SPEED: f32 = 0.5;
/// Share of shots taken without aiming
const WILD_SHOT_CHANCE: f64 = 0.25;
/// Swipe heights tried by the search (px, stepped by 100)
const SEARCH_DY: std::ops::RangeInclusive<u32> = 900..=1800;
/// Hold times tried by the search (frames)
const SEARCH_FRAMES: std::ops::RangeInclusive<u32> = 10..=150;

/// A planned swipe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipePlan {
    pub ball: EntityId,
    pub start: Vec2,
    pub delta: Vec2,
    /// Held frames between press and release
    pub frames: u32,
    /// Predicted result, if the search found a make
    pub predicted: Option<ScoreEvent>,
}

/// Deterministic touch-input generator
#[derive(Debug, Clone)]
pub struct AutoPlayer {
    rng: Pcg32,
    /// Where to aim
    target: Vec3,
    script: VecDeque<PointerInput>,
    cooldown_ticks: u32,
}

impl AutoPlayer {
    pub fn new(seed: u64, target: Vec3) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            target,
            script: VecDeque::new(),
            cooldown_ticks: 30,
        }
    }

    /// Pointer input for the next tick
    pub fn next_input(&mut self, state: &GameState, sandbox: &Sandbox) -> PointerInput {
        if let Some(input) = self.script.pop_front() {
            return input;
        }
        if state.session.game_ended || state.gesture.held().is_some() {
            return PointerInput::default();
        }
        if self.cooldown_ticks > 0 {
            self.cooldown_ticks -= 1;
            return PointerInput::default();
        }

        if let Some(plan) = self.plan_shot(state, sandbox) {
            match plan.predicted {
                Some(score) => log::debug!("Auto-player lining up a {:?} shot", score.kind),
                None => log::debug!("Auto-player shooting blind"),
            }
            self.queue_swipe(&plan);
        }
        self.cooldown_ticks = self.rng.random_range(20..60);
        self.script.pop_front().unwrap_or_default()
    }

    /// Choose a ball and a swipe for it
    pub fn plan_shot(&mut self, state: &GameState, sandbox: &Sandbox) -> Option<SwipePlan> {
        let camera = &state.camera;
        let tuning = &state.tuning;

        let resting: Vec<(EntityId, Vec2)> = sandbox
            .bodies()
            .iter()
            .filter(|b| b.tag == tuning.ball_tag && b.velocity.length() < REST_SPEED)
            .filter(|b| camera.position.distance(b.position) < tuning.max_pickup_distance)
            .filter_map(|b| Some((b.entity, camera.world_to_screen(b.position)?)))
            .collect();
        if resting.is_empty() {
            return None;
        }
        let (ball, start) = resting[self.rng.random_range(0..resting.len())];

        let makes = if self.rng.random_bool(WILD_SHOT_CHANCE) {
            Vec::new()
        } else {
            search_makes(sandbox, camera, tuning, ball, start, self.target)
        };
        // Prefer makes whose neighbouring hold time also goes in
        let steady: Vec<SwipePlan> = makes
            .iter()
            .filter(|m| {
                makes
                    .iter()
                    .any(|n| n.delta.y == m.delta.y && n.frames.abs_diff(m.frames) == 1)
            })
            .copied()
            .collect();
        let pool = if steady.is_empty() { &makes } else { &steady };

        let plan = if pool.is_empty() {
            SwipePlan {
                ball,
                start,
                delta: Vec2::new(
                    self.rng.random_range(-80.0..80.0),
                    self.rng.random_range(300.0..1500.0),
                ),
                frames: self.rng.random_range(10..60),
                predicted: None,
            }
        } else {
            pool[self.rng.random_range(0..pool.len())]
        };
        Some(plan)
    }

    /// Queue touch began / moved frames / ended for a plan
    pub fn queue_swipe(&mut self, plan: &SwipePlan) {
        let end = plan.start + plan.delta;
        self.script
            .push_back(PointerInput::touch(TouchPhase::Began, plan.start));
        for _ in 1..plan.frames {
            self.script
                .push_back(PointerInput::touch(TouchPhase::Stationary, plan.start));
        }
        self.script
            .push_back(PointerInput::touch(TouchPhase::Moved, end));
        self.script
            .push_back(PointerInput::touch(TouchPhase::Ended, end));
    }

    pub fn pending_inputs(&self) -> usize {
        self.script.len()
    }
}

/// Where a held ball ends up after `frames` follow steps of a scripted swipe
///
/// Matches [`AutoPlayer::queue_swipe`]: every step but the last chases
/// `start`, the last chases `end`.
pub fn release_point(
    camera: &Camera,
    tuning: &Tuning,
    from: Vec3,
    start: Vec2,
    end: Vec2,
    frames: u32,
) -> Vec3 {
    let frames = frames.max(1);
    let t = tuning.hold_follow_rate * SIM_DT;
    (0..frames).fold(from, |position, i| {
        let pointer = if i + 1 < frames { start } else { end };
        follow_step(camera, position, pointer, t)
    })
}

/// Fly a would-be throw in a scratch copy of the sandbox
///
/// The swipe is pressed at `start` and spans `frames + 1` ticks from press
/// to release. The drag is replayed first, so the flight starts where the
/// real throw would.
pub fn predict_shot(
    sandbox: &Sandbox,
    camera: &Camera,
    tuning: &Tuning,
    ball: EntityId,
    start: Vec2,
    delta: Vec2,
    frames: u32,
) -> Option<ScoreEvent> {
    let frames = frames.max(1);
    let elapsed = (frames + 1) as f32 * SIM_DT;
    let speed = swipe_throw_speed(delta, elapsed, tuning.min_swipe_speed)?;
    let impulse = throw_impulse(camera, delta, speed, tuning);
    let from = sandbox.position(ball)?;
    let release = release_point(camera, tuning, from, start, start + delta, frames);

    let mut scratch = sandbox.clone();
    // Freeze everything else so only the thrown ball moves
    let others: Vec<EntityId> = scratch
        .bodies()
        .iter()
        .map(|b| b.entity)
        .filter(|&e| e != ball)
        .collect();
    for entity in others {
        scratch.set_kinematic(entity, true);
    }
    scratch.set_kinematic(ball, false);
    scratch.set_position(ball, release);
    scratch.set_velocity(ball, impulse.velocity());

    let rules = crate::sim::ScoringRules {
        descent_speed_threshold: tuning.descent_speed_threshold,
        perfect_points: tuning.perfect_points,
        regular_points: tuning.regular_points,
        ttl_ticks: u64::MAX / 2,
    };
    let mut registry = ScoreRegistry::new();
    let steps = (FLIGHT_HORIZON / SIM_DT) as u64;
    for step in 1..=steps {
        for overlap in scratch.step(SIM_DT) {
            if overlap.entity != ball {
                continue;
            }
            let vy = scratch.velocity(ball).map(|v| v.y);
            if let Some(score) = registry.handle_trigger(ball, overlap.zone, vy, step, &rules) {
                return Some(score);
            }
        }
        // Landed and rolling: no basket coming
        if scratch
            .position(ball)
            .is_some_and(|p| p.y <= 0.13 && step > 10)
        {
            return None;
        }
    }
    None
}

/// Every aimed swipe on the search grid that goes in
///
/// For each swipe height the sideways offset is aimed from the resting
/// ball, then aimed again from where that drag releases it.
pub fn search_makes(
    sandbox: &Sandbox,
    camera: &Camera,
    tuning: &Tuning,
    ball: EntityId,
    start: Vec2,
    target: Vec3,
) -> Vec<SwipePlan> {
    let Some(from) = sandbox.position(ball) else {
        return Vec::new();
    };

    let mut makes = Vec::new();
    for dy in SEARCH_DY.step_by(100) {
        let dy = dy as f32;
        let Some(first) = aim_dx(camera, tuning, from, target, dy) else {
            continue;
        };
        for frames in SEARCH_FRAMES {
            let drifted =
                release_point(camera, tuning, from, start, start + Vec2::new(first, dy), frames);
            let Some(dx) = aim_dx(camera, tuning, drifted, target, dy) else {
                continue;
            };
            let delta = Vec2::new(dx, dy);
            if let Some(score) = predict_shot(sandbox, camera, tuning, ball, start, delta, frames)
            {
                makes.push(SwipePlan {
                    ball,
                    start,
                    delta,
                    frames,
                    predicted: Some(score),
                });
            }
        }
    }
    makes
}

/// Horizontal swipe that lines a throw up with `target`
///
/// Lateral drift over the flight only depends on the throw direction, so
/// this bisects on the sideways offset where the ball crosses the target's
/// depth. `None` when no on-screen swipe reaches it.
pub fn aim_dx(
    camera: &Camera,
    tuning: &Tuning,
    from: Vec3,
    target: Vec3,
    dy: f32,
) -> Option<f32> {
    let miss = |dx: f32| -> Option<f32> {
        let direction = throw_impulse(camera, Vec2::new(dx, dy), 0.0, tuning).direction;
        if direction.z.abs() < 1e-4 {
            return None;
        }
        Some(from.x + direction.x / direction.z * (target.z - from.z) - target.x)
    };

    let half = camera.viewport.x * 0.5;
    let (mut lo, mut hi) = (-half, half);
    let (mut f_lo, f_hi) = (miss(lo)?, miss(hi)?);
    if f_lo.signum() == f_hi.signum() {
        return None;
    }
    for _ in 0..32 {
        let mid = (lo + hi) * 0.5;
        let f_mid = miss(mid)?;
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    Some((lo + hi) * 0.5)
}
