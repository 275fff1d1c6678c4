use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{PomodoroConfig, PomodoroPhase, TimerState};

/// Why the scheduler moved to another phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseChangeCause {
    /// The countdown reached zero.
    Completed,
    /// The user skipped ahead.
    Skipped,
    /// The user picked a phase directly.
    Manual,
}

/// Every state change in the timer core produces an Event.
/// The presentation layer renders them or prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        remaining_secs: f64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: f64,
        at: DateTime<Utc>,
    },
    TimerReset {
        duration_secs: f64,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        at: DateTime<Utc>,
    },
    PhaseChanged {
        from: PomodoroPhase,
        to: PomodoroPhase,
        completed_focus_sessions: u32,
        cause: PhaseChangeCause,
        duration_secs: f64,
        at: DateTime<Utc>,
    },
    ConfigUpdated {
        config: PomodoroConfig,
        /// Whether the loaded countdown picked up the new duration.
        applied_to_current: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        remaining_secs: f64,
        duration_secs: f64,
        progress: f64,
        display: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        phase: Option<PomodoroPhase>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        completed_focus_sessions: Option<u32>,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// True for the event that marks a countdown reaching zero.
    pub fn is_completion(&self) -> bool {
        matches!(self, Event::TimerCompleted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = Event::TimerPaused {
            remaining_secs: 12.5,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TimerPaused");
        assert_eq!(json["remaining_secs"], 12.5);
    }

    #[test]
    fn phase_change_cause_is_lowercase() {
        let json = serde_json::to_string(&PhaseChangeCause::Skipped).unwrap();
        assert_eq!(json, "\"skipped\"");
    }
}
