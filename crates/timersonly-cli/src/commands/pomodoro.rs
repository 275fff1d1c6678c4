use clap::{Args, Subcommand};
use serde::Serialize;
use timersonly_core::{
    format_seconds, ManualClock, MonotonicClock, PomodoroConfig, PomodoroConfigPatch,
    PomodoroPhase, PomodoroScheduler,
};

use super::RunFlags;
use crate::session::{self, PomodoroSession, SessionOptions};

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct CycleArgs {
    /// Focus length in minutes
    #[arg(long)]
    pub focus: Option<u32>,
    /// Short break length in minutes
    #[arg(long)]
    pub short_break: Option<u32>,
    /// Long break length in minutes
    #[arg(long)]
    pub long_break: Option<u32>,
    /// Focus sessions per long break
    #[arg(long)]
    pub interval: Option<u32>,
}

impl CycleArgs {
    pub fn patch(&self) -> PomodoroConfigPatch {
        PomodoroConfigPatch {
            focus_minutes: self.focus,
            short_break_minutes: self.short_break,
            long_break_minutes: self.long_break,
            long_break_interval: self.interval,
        }
    }

    /// Defaults merged with the flags, validated.
    pub fn config(&self) -> Result<PomodoroConfig, timersonly_core::ValidationError> {
        let mut config = PomodoroConfig::default();
        config.apply(&self.patch());
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum PomodoroAction {
    /// Run focus/break cycles interactively
    Run {
        #[command(flatten)]
        cycle: CycleArgs,
        /// Phase to begin with (focus, short-break, long-break)
        #[arg(long)]
        phase: Option<PomodoroPhase>,
        /// Start each phase as soon as the previous one ends
        #[arg(long)]
        auto_continue: bool,
        #[command(flatten)]
        flags: RunFlags,
    },
    /// Print the phase sequence for a number of focus sessions
    Plan {
        #[command(flatten)]
        cycle: CycleArgs,
        /// Focus sessions to plan
        #[arg(long, default_value = "4")]
        sessions: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedPhase {
    pub phase: PomodoroPhase,
    pub minutes: u32,
    pub completed_focus_sessions: u32,
}

/// Walk the cycle by skipping phases on a scheduler that never runs.
pub fn plan(config: PomodoroConfig, sessions: u32) -> Vec<PlannedPhase> {
    let mut scheduler = PomodoroScheduler::with_config(ManualClock::new(), config);
    let mut planned = Vec::new();
    while scheduler.completed_focus_sessions() < sessions {
        planned.push(PlannedPhase {
            phase: scheduler.phase(),
            minutes: config.phase_minutes(scheduler.phase()),
            completed_focus_sessions: scheduler.completed_focus_sessions(),
        });
        scheduler.skip_phase();
    }
    if sessions > 0 {
        planned.push(PlannedPhase {
            phase: scheduler.phase(),
            minutes: config.phase_minutes(scheduler.phase()),
            completed_focus_sessions: scheduler.completed_focus_sessions(),
        });
    }
    planned
}

/// Run an interactive pomodoro cycle.
pub async fn run_cycle(
    config: PomodoroConfig,
    phase: Option<PomodoroPhase>,
    auto_continue: bool,
    flags: RunFlags,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut scheduler = PomodoroScheduler::with_config(MonotonicClock::new(), config);
    if let Some(phase) = phase {
        scheduler.set_phase(phase);
    }
    let options = SessionOptions {
        autostart: !flags.paused,
        sound: flags.sound,
    };
    let session = PomodoroSession::new(scheduler, auto_continue);
    session::run(session, flags.renderer(), options).await
}

pub async fn run(action: PomodoroAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PomodoroAction::Run {
            cycle,
            phase,
            auto_continue,
            flags,
        } => run_cycle(cycle.config()?, phase, auto_continue, flags).await,
        PomodoroAction::Plan {
            cycle,
            sessions,
            json,
        } => {
            let planned = plan(cycle.config()?, sessions);
            if json {
                println!("{}", serde_json::to_string_pretty(&planned)?);
            } else {
                for step in &planned {
                    println!(
                        "{:<12} {}",
                        step.phase.label(),
                        format_seconds(f64::from(step.minutes) * 60.0)
                    );
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_places_long_break_after_interval() {
        let planned = plan(PomodoroConfig::default(), 4);
        let phases: Vec<_> = planned.iter().map(|p| p.phase).collect();
        assert_eq!(
            phases,
            vec![
                PomodoroPhase::Focus,
                PomodoroPhase::ShortBreak,
                PomodoroPhase::Focus,
                PomodoroPhase::ShortBreak,
                PomodoroPhase::Focus,
                PomodoroPhase::ShortBreak,
                PomodoroPhase::Focus,
                PomodoroPhase::LongBreak,
            ]
        );
        assert_eq!(planned.last().map(|p| p.minutes), Some(15));
    }

    #[test]
    fn plan_of_zero_sessions_is_empty() {
        assert!(plan(PomodoroConfig::default(), 0).is_empty());
    }

    #[test]
    fn cycle_args_are_validated() {
        let args = CycleArgs {
            interval: Some(1),
            ..Default::default()
        };
        assert!(args.config().is_err());

        let args = CycleArgs {
            focus: Some(50),
            ..Default::default()
        };
        assert_eq!(args.config().unwrap().focus_minutes, 50);
    }
}
