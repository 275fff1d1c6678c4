//! Countdown engine implementation.
//!
//! The engine is an anchor-based state machine. It does not use internal
//! threads or timers: the caller invokes `tick()` periodically (the
//! presentation layer uses [`TICK_INTERVAL`]) and may read
//! `current_remaining()` at any time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Idle | Completed)
//! Completed -> Idle (reset / set_duration)
//! Completed -> Completed (start, firing the hook again)
//! ```
//!
//! Remaining time while running is always derived from the reading taken
//! when the run segment began, never by subtracting tick intervals, so a
//! stalled or throttled tick loop self-corrects on its next evaluation.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CountdownEngine::new(MonotonicClock::new(), 300.0);
//! engine.start();
//! // In a loop:
//! engine.tick(); // Returns Some(Event::TimerCompleted) once the countdown hits zero
//! ```

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{Clock, MonotonicClock};
use crate::events::Event;
use crate::time::format_seconds;

/// Refresh cadence for presentation layers (5 Hz).
pub const TICK_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Completed,
}

/// Internal run state. The anchor only exists while running.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RunState {
    Idle,
    Running {
        /// Clock reading when the current run segment began.
        anchor: Duration,
        /// Remaining seconds at `anchor`.
        remaining_at_anchor: f64,
    },
    Completed,
}

type CompletionHook = Box<dyn FnMut()>;

/// Single countdown driven by a monotonic [`Clock`].
pub struct CountdownEngine<C: Clock = MonotonicClock> {
    clock: C,
    configured_duration_secs: f64,
    remaining_secs: f64,
    run: RunState,
    completion_signaled: bool,
    on_complete: Option<CompletionHook>,
}

impl<C: Clock> CountdownEngine<C> {
    /// Create an idle engine loaded with `duration_secs`.
    pub fn new(clock: C, duration_secs: f64) -> Self {
        let duration_secs = sanitize(duration_secs);
        Self {
            clock,
            configured_duration_secs: duration_secs,
            remaining_secs: duration_secs,
            run: RunState::Idle,
            completion_signaled: false,
            on_complete: None,
        }
    }

    /// Create an idle engine with a completion hook.
    ///
    /// The hook runs on the caller of `tick()` (or `start()` for a zero
    /// duration), at most once per run-to-zero.
    pub fn with_completion<F>(clock: C, duration_secs: f64, on_complete: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let mut engine = Self::new(clock, duration_secs);
        engine.on_complete = Some(Box::new(on_complete));
        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        match self.run {
            RunState::Idle => TimerState::Idle,
            RunState::Running { .. } => TimerState::Running,
            RunState::Completed => TimerState::Completed,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.run, RunState::Running { .. })
    }

    pub fn configured_duration_secs(&self) -> f64 {
        self.configured_duration_secs
    }

    /// Remaining seconds as of the last command or tick.
    pub fn remaining_secs(&self) -> f64 {
        self.remaining_secs
    }

    /// Remaining seconds right now, computed from the anchor.
    ///
    /// Does not mutate state and never fires the completion hook; a
    /// countdown that has passed zero reads 0 here until the next `tick()`.
    pub fn current_remaining(&self) -> f64 {
        match self.run {
            RunState::Running {
                anchor,
                remaining_at_anchor,
            } => (remaining_at_anchor - self.elapsed_since(anchor)).max(0.0),
            RunState::Idle | RunState::Completed => self.remaining_secs,
        }
    }

    pub fn completion_signaled(&self) -> bool {
        self.completion_signaled
    }

    /// 0.0 .. 1.0 fraction of the configured duration already elapsed.
    pub fn progress(&self) -> f64 {
        if self.configured_duration_secs <= 0.0 {
            return 0.0;
        }
        (1.0 - self.current_remaining() / self.configured_duration_secs).clamp(0.0, 1.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let remaining = self.current_remaining();
        Event::StateSnapshot {
            state: self.state(),
            remaining_secs: remaining,
            duration_secs: self.configured_duration_secs,
            progress: self.progress(),
            display: format_seconds(remaining),
            phase: None,
            completed_focus_sessions: None,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a run segment from the current remaining time.
    ///
    /// No-op while running. Starting with nothing left (a finished run, or
    /// an idle engine at zero) re-arms completion and completes immediately.
    pub fn start(&mut self) -> Option<Event> {
        match self.run {
            RunState::Running { .. } => None,
            RunState::Idle | RunState::Completed => {
                self.completion_signaled = false;
                if self.remaining_secs <= 0.0 {
                    debug!("countdown started with nothing remaining");
                    return self.complete();
                }
                self.run = RunState::Running {
                    anchor: self.clock.now(),
                    remaining_at_anchor: self.remaining_secs,
                };
                debug!(remaining_secs = self.remaining_secs, "countdown started");
                Some(Event::TimerStarted {
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
        }
    }

    /// Freeze the countdown. No-op unless running.
    pub fn pause(&mut self) -> Option<Event> {
        let RunState::Running {
            anchor,
            remaining_at_anchor,
        } = self.run
        else {
            return None;
        };
        self.remaining_secs = (remaining_at_anchor - self.elapsed_since(anchor)).max(0.0);
        self.run = RunState::Idle;
        debug!(remaining_secs = self.remaining_secs, "countdown paused");
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Start when idle, pause when running.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Hard stop and reload. Optionally replaces the configured duration.
    pub fn reset(&mut self, new_duration_secs: Option<f64>) -> Option<Event> {
        if let Some(secs) = new_duration_secs {
            self.configured_duration_secs = sanitize(secs);
        }
        self.remaining_secs = self.configured_duration_secs;
        self.run = RunState::Idle;
        self.completion_signaled = false;
        debug!(duration_secs = self.configured_duration_secs, "countdown reset");
        Some(Event::TimerReset {
            duration_secs: self.configured_duration_secs,
            at: Utc::now(),
        })
    }

    /// Change the configured duration.
    ///
    /// Reflected immediately unless running; a running countdown keeps its
    /// original target until the next reset.
    pub fn set_duration(&mut self, secs: f64) {
        self.configured_duration_secs = sanitize(secs);
        if !self.is_running() {
            self.remaining_secs = self.configured_duration_secs;
            self.run = RunState::Idle;
        }
    }

    /// Call periodically. Returns `Some(Event::TimerCompleted)` exactly once
    /// when the countdown reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        let RunState::Running {
            anchor,
            remaining_at_anchor,
        } = self.run
        else {
            return None;
        };
        let candidate = remaining_at_anchor - self.elapsed_since(anchor);
        if candidate <= 0.0 {
            return self.complete();
        }
        self.remaining_secs = candidate;
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Option<Event> {
        self.remaining_secs = 0.0;
        self.run = RunState::Completed;
        if self.completion_signaled {
            return None;
        }
        self.completion_signaled = true;
        debug!("countdown completed");
        if let Some(hook) = self.on_complete.as_mut() {
            hook();
        }
        Some(Event::TimerCompleted { at: Utc::now() })
    }

    fn elapsed_since(&self, anchor: Duration) -> f64 {
        self.clock.now().saturating_sub(anchor).as_secs_f64()
    }
}

impl<C: Clock + fmt::Debug> fmt::Debug for CountdownEngine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownEngine")
            .field("clock", &self.clock)
            .field("configured_duration_secs", &self.configured_duration_secs)
            .field("remaining_secs", &self.remaining_secs)
            .field("run", &self.run)
            .field("completion_signaled", &self.completion_signaled)
            .field("has_completion_hook", &self.on_complete.is_some())
            .finish()
    }
}

fn sanitize(secs: f64) -> f64 {
    if secs.is_finite() {
        secs.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::cell::Cell;
    use std::rc::Rc;

    fn engine(secs: f64) -> (ManualClock, CountdownEngine<ManualClock>) {
        let clock = ManualClock::new();
        (clock.clone(), CountdownEngine::new(clock, secs))
    }

    fn counting_engine(secs: f64) -> (ManualClock, Rc<Cell<u32>>, CountdownEngine<ManualClock>) {
        let clock = ManualClock::new();
        let fired = Rc::new(Cell::new(0));
        let hook = Rc::clone(&fired);
        let engine =
            CountdownEngine::with_completion(clock.clone(), secs, move || hook.set(hook.get() + 1));
        (clock, fired, engine)
    }

    #[test]
    fn start_pause_toggle() {
        let (_clock, mut engine) = engine(60.0);
        assert_eq!(engine.state(), TimerState::Idle);

        assert!(engine.start().is_some());
        assert_eq!(engine.state(), TimerState::Running);
        assert!(engine.start().is_none());

        assert!(engine.pause().is_some());
        assert_eq!(engine.state(), TimerState::Idle);
        assert!(engine.pause().is_none());

        assert!(matches!(engine.toggle(), Some(Event::TimerStarted { .. })));
        assert!(matches!(engine.toggle(), Some(Event::TimerPaused { .. })));
    }

    #[test]
    fn pause_without_elapsed_time_keeps_remaining() {
        let (_clock, mut engine) = engine(42.0);
        engine.start();
        engine.pause();
        assert_eq!(engine.remaining_secs(), 42.0);
    }

    #[test]
    fn anchoring_does_not_accumulate_drift() {
        let (clock, mut engine) = engine(10.0);
        engine.start();
        clock.advance_secs(4.0);
        engine.tick();
        clock.advance_secs(3.0);
        engine.tick();
        assert_eq!(engine.remaining_secs(), 3.0);
    }

    #[test]
    fn pause_and_resume_continue_from_frozen_value() {
        let (clock, mut engine) = engine(10.0);
        engine.start();
        clock.advance_secs(2.5);
        engine.pause();
        clock.advance_secs(100.0);
        assert_eq!(engine.current_remaining(), 7.5);
        engine.start();
        clock.advance_secs(1.5);
        engine.tick();
        assert_eq!(engine.remaining_secs(), 6.0);
    }

    #[test]
    fn completion_fires_once() {
        let (clock, fired, mut engine) = counting_engine(5.0);
        engine.start();
        clock.advance_secs(5.0);
        assert!(engine.tick().is_some_and(|e| e.is_completion()));
        assert_eq!(engine.remaining_secs(), 0.0);
        assert_eq!(engine.state(), TimerState::Completed);
        assert_eq!(fired.get(), 1);

        clock.advance_secs(0.2);
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_secs(), 0.0);
        for _ in 0..10 {
            clock.advance_secs(0.2);
            engine.tick();
        }
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn start_from_completed_fires_again() {
        let (clock, fired, mut engine) = counting_engine(5.0);
        engine.start();
        clock.advance_secs(5.0);
        engine.tick();
        assert_eq!(fired.get(), 1);

        let event = engine.start();
        assert!(event.is_some_and(|e| e.is_completion()));
        assert_eq!(fired.get(), 2);
        assert!(engine.completion_signaled());
        assert_eq!(engine.remaining_secs(), 0.0);

        // Later ticks stay quiet until the next start or reset.
        clock.advance_secs(0.2);
        assert!(engine.tick().is_none());
        assert_eq!(fired.get(), 2);

        engine.reset(None);
        assert_eq!(engine.state(), TimerState::Idle);
        engine.start();
        clock.advance_secs(5.0);
        engine.tick();
        assert_eq!(fired.get(), 3);
    }

    #[test]
    fn zero_duration_completes_on_start() {
        let (_clock, fired, mut engine) = counting_engine(0.0);
        let event = engine.start();
        assert!(event.is_some_and(|e| e.is_completion()));
        assert_eq!(engine.state(), TimerState::Completed);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn reset_restores_configured_duration_from_any_state() {
        let (clock, mut engine) = engine(30.0);

        engine.start();
        clock.advance_secs(10.0);
        engine.reset(None);
        assert_eq!(engine.remaining_secs(), 30.0);
        assert_eq!(engine.state(), TimerState::Idle);

        engine.start();
        clock.advance_secs(10.0);
        engine.pause();
        engine.reset(None);
        assert_eq!(engine.remaining_secs(), 30.0);

        engine.start();
        clock.advance_secs(31.0);
        engine.tick();
        assert_eq!(engine.state(), TimerState::Completed);
        engine.reset(None);
        assert_eq!(engine.remaining_secs(), 30.0);
        assert!(!engine.completion_signaled());
    }

    #[test]
    fn reset_with_new_duration_replaces_configured_value() {
        let (_clock, mut engine) = engine(30.0);
        engine.reset(Some(90.0));
        assert_eq!(engine.configured_duration_secs(), 90.0);
        assert_eq!(engine.remaining_secs(), 90.0);
        engine.reset(Some(-5.0));
        assert_eq!(engine.remaining_secs(), 0.0);
    }

    #[test]
    fn set_duration_while_idle_is_immediate() {
        let (_clock, mut engine) = engine(30.0);
        engine.set_duration(45.0);
        assert_eq!(engine.remaining_secs(), 45.0);
    }

    #[test]
    fn set_duration_while_running_waits_for_reset() {
        let (clock, mut engine) = engine(30.0);
        engine.start();
        clock.advance_secs(5.0);
        engine.set_duration(100.0);
        engine.tick();
        assert_eq!(engine.remaining_secs(), 25.0);
        engine.reset(None);
        assert_eq!(engine.remaining_secs(), 100.0);
    }

    #[test]
    fn current_remaining_is_pull_based() {
        let (clock, mut engine) = engine(10.0);
        engine.start();
        clock.advance_secs(4.0);
        assert_eq!(engine.current_remaining(), 6.0);
        // Stored value only moves on tick.
        assert_eq!(engine.remaining_secs(), 10.0);
        clock.advance_secs(20.0);
        assert_eq!(engine.current_remaining(), 0.0);
        assert_eq!(engine.state(), TimerState::Running);
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let (clock, mut engine) = engine(100.0);
        assert_eq!(engine.progress(), 0.0);
        engine.start();
        clock.advance_secs(25.0);
        assert_eq!(engine.progress(), 0.25);

        let (_clock, empty) = self::engine(0.0);
        assert_eq!(empty.progress(), 0.0);
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let (_clock, engine) = engine(90.0);
        match engine.snapshot() {
            Event::StateSnapshot {
                state,
                remaining_secs,
                display,
                phase,
                ..
            } => {
                assert_eq!(state, TimerState::Idle);
                assert_eq!(remaining_secs, 90.0);
                assert_eq!(display, "01:30");
                assert!(phase.is_none());
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn pause_past_zero_clamps_without_completing() {
        let (clock, fired, mut engine) = counting_engine(2.0);
        engine.start();
        clock.advance_secs(3.0);
        engine.pause();
        assert_eq!(engine.remaining_secs(), 0.0);
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(fired.get(), 0);
        // Resuming with nothing left completes straight away.
        assert!(engine.start().is_some_and(|e| e.is_completion()));
        assert_eq!(fired.get(), 1);
    }
}
