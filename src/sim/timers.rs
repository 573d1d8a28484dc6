//! One-shot timers on the simulation clock
//!
//! Replaces fire-and-forget delayed callbacks. Due times are kept in
//! accumulated simulation seconds, so a host with a varying `dt` still
//! waits the full delay. Timers cannot be cancelled; each fires exactly
//! once on the first tick at or after its due time.

use serde::{Deserialize, Serialize};

/// Slack for float accumulation when comparing against a due time
const DUE_EPSILON: f64 = 1e-6;

/// What to do when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerAction {
    /// Show the download call-to-action after the round ends
    RevealDownloadButton,
    /// Replace the post-score message with the idle prompt
    ResetInstruction,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct PendingTimer {
    /// Simulation seconds
    due: f64,
    /// Insertion order, keeps same-time timers FIFO
    seq: u64,
    action: TimerAction,
}

/// Pending one-shot timers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    pending: Vec<PendingTimer>,
    next_seq: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `action` `delay` seconds after `now`
    pub fn schedule(&mut self, now: f64, delay: f64, action: TimerAction) {
        let timer = PendingTimer {
            due: now + delay.max(0.0),
            seq: self.next_seq,
            action,
        };
        self.next_seq += 1;
        self.pending.push(timer);
        log::debug!("Scheduled {:?} for t={:.3}s", action, timer.due);
    }

    /// Remove and return every action due at `now`, oldest first
    pub fn drain_due(&mut self, now: f64) -> Vec<TimerAction> {
        let mut due: Vec<PendingTimer> = Vec::new();
        self.pending.retain(|t| {
            if t.due <= now + DUE_EPSILON {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|t| t.action).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_when_due() {
        let mut timers = Timers::new();
        timers.schedule(10.0, 5.0, TimerAction::ResetInstruction);

        assert!(timers.drain_due(14.5).is_empty());
        assert_eq!(timers.drain_due(15.0), vec![TimerAction::ResetInstruction]);
        assert!(timers.drain_due(16.0).is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_late_drain_still_delivers_in_order() {
        let mut timers = Timers::new();
        timers.schedule(0.0, 3.0, TimerAction::RevealDownloadButton);
        timers.schedule(0.0, 1.0, TimerAction::ResetInstruction);
        timers.schedule(0.0, 3.0, TimerAction::ResetInstruction);

        assert_eq!(
            timers.drain_due(100.0),
            vec![
                TimerAction::ResetInstruction,
                TimerAction::RevealDownloadButton,
                TimerAction::ResetInstruction,
            ]
        );
    }

    #[test]
    fn test_short_frames_do_not_fire_early() {
        let mut timers = Timers::new();
        // Scheduled during a long 0.5 s frame
        timers.schedule(0.5, 1.0, TimerAction::RevealDownloadButton);

        let mut now = 0.5;
        for _ in 0..59 {
            now += 1.0 / 60.0;
            assert!(timers.drain_due(now).is_empty());
        }
        now += 1.0 / 60.0;
        assert_eq!(timers.drain_due(now), vec![TimerAction::RevealDownloadButton]);
    }

    #[test]
    fn test_accumulated_f32_steps_hit_due_time() {
        let mut timers = Timers::new();
        timers.schedule(0.0, 2.0, TimerAction::ResetInstruction);
        let dt = 1.0f32 / 60.0;
        let mut now = 0.0f64;
        for _ in 0..119 {
            now += dt as f64;
            assert!(timers.drain_due(now).is_empty());
        }
        now += dt as f64;
        assert_eq!(timers.drain_due(now).len(), 1);
    }

    #[test]
    fn test_clear_drops_pending() {
        let mut timers = Timers::new();
        timers.schedule(0.0, 1.0, TimerAction::ResetInstruction);
        timers.clear();
        assert!(timers.is_empty());
        assert!(timers.drain_due(5.0).is_empty());
    }
}
