use clap::Subcommand;
use timersonly_core::{minutes_to_seconds, CountdownEngine, MonotonicClock, ValidationError};

use super::RunFlags;
use crate::session::{self, SessionOptions, SimpleTimer};

/// Longest plain countdown offered.
pub const MAX_MINUTES: f64 = 120.0;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Count down from the given number of minutes
    Run {
        /// Minutes (fractions allowed, e.g. 1.5)
        minutes: f64,
        #[command(flatten)]
        flags: RunFlags,
    },
}

pub fn check_minutes(minutes: f64) -> Result<f64, ValidationError> {
    if minutes > 0.0 && minutes <= MAX_MINUTES {
        Ok(minutes)
    } else {
        Err(ValidationError::InvalidValue {
            field: "minutes".into(),
            message: format!("{minutes} is outside (0, {MAX_MINUTES}]"),
        })
    }
}

/// Run a plain countdown of `minutes` labelled `label`.
pub async fn run_countdown(
    minutes: f64,
    label: String,
    flags: RunFlags,
) -> Result<(), Box<dyn std::error::Error>> {
    let minutes = check_minutes(minutes)?;
    let engine = CountdownEngine::new(MonotonicClock::new(), minutes_to_seconds(minutes));
    let options = SessionOptions {
        autostart: !flags.paused,
        sound: flags.sound,
    };
    session::run(SimpleTimer::new(engine, label), flags.renderer(), options).await
}

pub async fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run { minutes, flags } => {
            let label = format!("{minutes} min");
            run_countdown(minutes, label, flags).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_must_be_in_range() {
        assert!(check_minutes(0.5).is_ok());
        assert!(check_minutes(120.0).is_ok());
        assert!(check_minutes(0.0).is_err());
        assert!(check_minutes(-2.0).is_err());
        assert!(check_minutes(121.0).is_err());
        assert!(check_minutes(f64::NAN).is_err());
    }
}
