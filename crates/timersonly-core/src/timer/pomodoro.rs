//! Pomodoro phase scheduler.
//!
//! Sequences focus and break phases on top of one [`CountdownEngine`],
//! which is reloaded (never replaced) whenever the phase changes.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::engine::{CountdownEngine, TimerState};
use crate::clock::{Clock, MonotonicClock};
use crate::error::ValidationError;
use crate::events::{Event, PhaseChangeCause};
use crate::time::{format_seconds, minutes_to_seconds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PomodoroPhase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl PomodoroPhase {
    pub const ALL: [PomodoroPhase; 3] = [
        PomodoroPhase::Focus,
        PomodoroPhase::ShortBreak,
        PomodoroPhase::LongBreak,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PomodoroPhase::Focus => "Focus",
            PomodoroPhase::ShortBreak => "Short Break",
            PomodoroPhase::LongBreak => "Long Break",
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, PomodoroPhase::Focus)
    }
}

impl fmt::Display for PomodoroPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PomodoroPhase {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "focus" => Ok(PomodoroPhase::Focus),
            "shortbreak" | "short" => Ok(PomodoroPhase::ShortBreak),
            "longbreak" | "long" => Ok(PomodoroPhase::LongBreak),
            _ => Err(ValidationError::InvalidValue {
                field: "phase".into(),
                message: format!("unknown phase '{s}'"),
            }),
        }
    }
}

/// Per-phase durations in minutes and the long-break cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroConfig {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    /// Focus sessions per long break.
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
}

fn default_focus_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_long_break_interval() -> u32 {
    4
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            long_break_interval: default_long_break_interval(),
        }
    }
}

/// Partial update for [`PomodoroConfig`]; `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroConfigPatch {
    pub focus_minutes: Option<u32>,
    pub short_break_minutes: Option<u32>,
    pub long_break_minutes: Option<u32>,
    pub long_break_interval: Option<u32>,
}

impl PomodoroConfigPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl PomodoroConfig {
    pub const FOCUS_RANGE: (u32, u32) = (1, 60);
    pub const SHORT_BREAK_RANGE: (u32, u32) = (1, 30);
    pub const LONG_BREAK_RANGE: (u32, u32) = (1, 60);
    pub const INTERVAL_RANGE: (u32, u32) = (2, 10);

    pub fn phase_minutes(&self, phase: PomodoroPhase) -> u32 {
        match phase {
            PomodoroPhase::Focus => self.focus_minutes,
            PomodoroPhase::ShortBreak => self.short_break_minutes,
            PomodoroPhase::LongBreak => self.long_break_minutes,
        }
    }

    pub fn phase_duration_secs(&self, phase: PomodoroPhase) -> f64 {
        minutes_to_seconds(f64::from(self.phase_minutes(phase)))
    }

    /// Merge `patch` into this config.
    pub fn apply(&mut self, patch: &PomodoroConfigPatch) {
        if let Some(v) = patch.focus_minutes {
            self.focus_minutes = v;
        }
        if let Some(v) = patch.short_break_minutes {
            self.short_break_minutes = v;
        }
        if let Some(v) = patch.long_break_minutes {
            self.long_break_minutes = v;
        }
        if let Some(v) = patch.long_break_interval {
            self.long_break_interval = v;
        }
    }

    /// Check every field against the ranges the settings UI offers.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("focus_minutes", self.focus_minutes, Self::FOCUS_RANGE)?;
        check_range(
            "short_break_minutes",
            self.short_break_minutes,
            Self::SHORT_BREAK_RANGE,
        )?;
        check_range(
            "long_break_minutes",
            self.long_break_minutes,
            Self::LONG_BREAK_RANGE,
        )?;
        check_range(
            "long_break_interval",
            self.long_break_interval,
            Self::INTERVAL_RANGE,
        )
    }
}

fn check_range(field: &str, value: u32, (min, max): (u32, u32)) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.into(),
            message: format!("{value} is outside {min}..={max}"),
        })
    }
}

/// Phase that follows `current`.
///
/// `sessions_after` is the focus-session count including the phase that is
/// ending. An interval of 0 is treated as 1.
pub fn next_phase(current: PomodoroPhase, sessions_after: u32, long_break_interval: u32) -> PomodoroPhase {
    match current {
        PomodoroPhase::Focus => {
            if sessions_after % long_break_interval.max(1) == 0 {
                PomodoroPhase::LongBreak
            } else {
                PomodoroPhase::ShortBreak
            }
        }
        PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak => PomodoroPhase::Focus,
    }
}

/// Focus/short-break/long-break cycler owning one countdown.
pub struct PomodoroScheduler<C: Clock = MonotonicClock> {
    engine: CountdownEngine<C>,
    phase: PomodoroPhase,
    completed_focus_sessions: u32,
    config: PomodoroConfig,
    /// Whether the engine was started since the current phase was loaded.
    phase_instance_started: bool,
}

impl<C: Clock> PomodoroScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self::with_config(clock, PomodoroConfig::default())
    }

    /// Start in Focus with no completed sessions.
    pub fn with_config(clock: C, config: PomodoroConfig) -> Self {
        let duration = config.phase_duration_secs(PomodoroPhase::Focus);
        Self {
            engine: CountdownEngine::new(clock, duration),
            phase: PomodoroPhase::Focus,
            completed_focus_sessions: 0,
            config,
            phase_instance_started: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> PomodoroPhase {
        self.phase
    }

    pub fn completed_focus_sessions(&self) -> u32 {
        self.completed_focus_sessions
    }

    /// 1-based number of the focus session in progress or up next.
    pub fn current_session(&self) -> u32 {
        self.completed_focus_sessions.saturating_add(1)
    }

    pub fn config(&self) -> &PomodoroConfig {
        &self.config
    }

    pub fn engine(&self) -> &CountdownEngine<C> {
        &self.engine
    }

    pub fn state(&self) -> TimerState {
        self.engine.state()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn phase_instance_started(&self) -> bool {
        self.phase_instance_started
    }

    /// Configured duration of the current phase.
    pub fn duration_secs(&self) -> f64 {
        self.config.phase_duration_secs(self.phase)
    }

    pub fn current_remaining(&self) -> f64 {
        self.engine.current_remaining()
    }

    pub fn snapshot(&self) -> Event {
        let remaining = self.engine.current_remaining();
        Event::StateSnapshot {
            state: self.engine.state(),
            remaining_secs: remaining,
            duration_secs: self.engine.configured_duration_secs(),
            progress: self.engine.progress(),
            display: format_seconds(remaining),
            phase: Some(self.phase),
            completed_focus_sessions: Some(self.completed_focus_sessions),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume the current phase.
    ///
    /// Yields the engine event, plus a phase change if the phase had
    /// nothing left to run.
    pub fn start(&mut self) -> Vec<Event> {
        let Some(event) = self.engine.start() else {
            return Vec::new();
        };
        self.phase_instance_started = true;
        self.follow_up(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.engine.pause()
    }

    pub fn toggle(&mut self) -> Vec<Event> {
        if self.is_running() {
            self.pause().into_iter().collect()
        } else {
            self.start()
        }
    }

    /// Reload the current phase's full duration, idle.
    pub fn reset_phase(&mut self) -> Option<Event> {
        self.load_phase(self.phase)
    }

    /// Advance to the next phase without waiting for completion.
    ///
    /// Counts a focus session exactly as completion would and leaves the
    /// engine idle.
    pub fn skip_phase(&mut self) -> Option<Event> {
        Some(self.advance(PhaseChangeCause::Skipped))
    }

    /// Jump straight to `target`. Never touches the session count.
    pub fn set_phase(&mut self, target: PomodoroPhase) -> Option<Event> {
        let from = self.phase;
        self.load_phase(target);
        debug!(%from, to = %target, "phase set manually");
        Some(self.phase_changed(from, PhaseChangeCause::Manual))
    }

    /// Merge new durations or interval into the config.
    ///
    /// The loaded countdown follows a change to the current phase's
    /// duration only if it has not been started in this phase instance.
    pub fn update_config(&mut self, patch: PomodoroConfigPatch) -> Option<Event> {
        let before = self.duration_secs();
        self.config.apply(&patch);
        let after = self.duration_secs();

        let applied_to_current = before != after && !self.phase_instance_started;
        if applied_to_current {
            self.engine.reset(Some(after));
        }
        debug!(?patch, applied_to_current, "pomodoro config updated");
        Some(Event::ConfigUpdated {
            config: self.config,
            applied_to_current,
            at: Utc::now(),
        })
    }

    /// Drive the countdown; on completion the next phase is loaded idle.
    pub fn tick(&mut self) -> Vec<Event> {
        match self.engine.tick() {
            Some(event) => self.follow_up(event),
            None => Vec::new(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn follow_up(&mut self, event: Event) -> Vec<Event> {
        if event.is_completion() {
            let changed = self.advance(PhaseChangeCause::Completed);
            vec![event, changed]
        } else {
            vec![event]
        }
    }

    fn advance(&mut self, cause: PhaseChangeCause) -> Event {
        let from = self.phase;
        let to = match from {
            PomodoroPhase::Focus => {
                self.completed_focus_sessions = self.completed_focus_sessions.saturating_add(1);
                next_phase(from, self.completed_focus_sessions, self.config.long_break_interval)
            }
            PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak => PomodoroPhase::Focus,
        };
        self.load_phase(to);
        debug!(
            %from,
            %to,
            ?cause,
            sessions = self.completed_focus_sessions,
            "phase advanced"
        );
        self.phase_changed(from, cause)
    }

    fn load_phase(&mut self, phase: PomodoroPhase) -> Option<Event> {
        self.phase = phase;
        self.phase_instance_started = false;
        self.engine.reset(Some(self.config.phase_duration_secs(phase)))
    }

    fn phase_changed(&self, from: PomodoroPhase, cause: PhaseChangeCause) -> Event {
        Event::PhaseChanged {
            from,
            to: self.phase,
            completed_focus_sessions: self.completed_focus_sessions,
            cause,
            duration_secs: self.duration_secs(),
            at: Utc::now(),
        }
    }
}

impl<C: Clock + fmt::Debug> fmt::Debug for PomodoroScheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PomodoroScheduler")
            .field("phase", &self.phase)
            .field("completed_focus_sessions", &self.completed_focus_sessions)
            .field("config", &self.config)
            .field("phase_instance_started", &self.phase_instance_started)
            .field("engine", &self.engine)
            .finish()
    }
}
