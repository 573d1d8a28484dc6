//! Per-frame simulation step
//!
//! One call runs gestures, then basket triggers, then the round clock, then
//! due timers. The host calls it from its frame update (or a test harness
//! calls it directly).

use super::gesture::PointerInput;
use super::host::{PhysicsHost, TriggerOverlap};
use super::scoring::ScoreEvent;
use super::session::Outcome;
use super::state::{GameEvent, GameState};
use super::timers::TimerAction;
use crate::ui::{KEEP_SHOOTING_MESSAGE, LOSE_MESSAGE, WIN_MESSAGE};

/// Inputs for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer/touch state this frame
    pub pointer: PointerInput,
    /// Trigger-zone entries the host detected since the last tick
    pub overlaps: Vec<TriggerOverlap>,
}

/// Advance the game by one frame
///
/// Message and download-button delays run on the accumulated clock, so `dt`
/// may vary between calls. Scored-ball records expire after a tick count
/// taken from the `dt` of the scoring tick.
pub fn tick<H: PhysicsHost + ?Sized>(
    state: &mut GameState,
    host: &mut H,
    input: &TickInput,
    dt: f32,
) {
    state.time_ticks += 1;
    state.time_secs += f64::from(dt);
    let now = state.time_ticks;

    // Gestures
    let pointer = input.pointer.resolve();
    if let Some(event) = state
        .gesture
        .update(host, &state.camera, &pointer, &state.tuning, dt)
    {
        state.events.push(event.into());
    }

    // Basket triggers
    let rules = state.scoring_rules(dt);
    for overlap in &input.overlaps {
        if overlap.tag != state.tuning.ball_tag {
            continue;
        }
        let vertical_velocity = host.velocity(overlap.entity).map(|v| v.y);
        if let Some(score) =
            state
                .scores
                .handle_trigger(overlap.entity, overlap.zone, vertical_velocity, now, &rules)
        {
            on_score(state, score);
        }
    }
    state.scores.purge_expired(now);

    // Round clock
    if let Some(outcome) = state.session.tick(dt) {
        end_round(state, outcome);
    }

    for action in state.timers.drain_due(state.time_secs) {
        run_timer(state, action);
    }

    state.ui.hud = state.session.hud_text();
    log::trace!("{}", state.ui.hud);
}

fn on_score(state: &mut GameState, score: ScoreEvent) {
    let counted = state.session.register_score(score.points);
    state.events.push(GameEvent::Scored {
        entity: score.entity,
        kind: score.kind,
        points: score.points,
        counted,
    });
    if !counted {
        return;
    }

    state.ui.message = format!("Great shot! {} more to go!", state.session.shots_to_go());
    log::info!("{}", state.ui.message);
    state.timers.schedule(
        state.time_secs,
        f64::from(state.tuning.instruction_reset_delay),
        TimerAction::ResetInstruction,
    );
}

fn end_round(state: &mut GameState, outcome: Outcome) {
    match outcome {
        Outcome::Won => {
            log::info!("Player won!");
            state.ui.show_win_panel();
            state.ui.message = WIN_MESSAGE.to_string();
        }
        Outcome::Lost => {
            log::info!("Time's up!");
            state.ui.show_lose_panel();
            state.ui.message = LOSE_MESSAGE.to_string();
        }
        Outcome::Active => return,
    }
    log::info!("{}", state.ui.message);
    state.events.push(GameEvent::RoundOver { outcome });

    if state.ui.download_button.is_some() {
        state.timers.schedule(
            state.time_secs,
            f64::from(state.tuning.download_reveal_delay),
            TimerAction::RevealDownloadButton,
        );
    }
}

fn run_timer(state: &mut GameState, action: TimerAction) {
    match action {
        TimerAction::RevealDownloadButton => {
            if state.ui.show_download_button() {
                state.events.push(GameEvent::DownloadButtonShown);
            }
        }
        TimerAction::ResetInstruction => {
            if !state.session.game_ended {
                state.ui.message = KEEP_SHOOTING_MESSAGE.to_string();
                log::info!("{}", KEEP_SHOOTING_MESSAGE);
            }
        }
    }
}
