use clap::Subcommand;
use timersonly_core::catalog::{self, TimerKind, TimerPreset};
use timersonly_core::{CoreError, PomodoroConfig};

use super::RunFlags;
use super::{pomodoro, timer};

#[derive(Subcommand)]
pub enum PresetAction {
    /// List built-in timers
    List {
        /// Only timers of this kind (simple, pomodoro)
        #[arg(long)]
        kind: Option<TimerKind>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one timer and its related timers
    Show {
        slug: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a built-in timer
    Run {
        slug: String,
        /// Start each pomodoro phase as soon as the previous one ends
        #[arg(long)]
        auto_continue: bool,
        #[command(flatten)]
        flags: RunFlags,
    },
    /// Check the catalog for duplicate slugs and missing fields
    Validate,
}

fn lookup(slug: &str) -> Result<TimerPreset, CoreError> {
    catalog::find(slug).ok_or_else(|| CoreError::UnknownTimer(slug.to_string()))
}

pub async fn run(action: PresetAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PresetAction::List { kind, json } => {
            let presets: Vec<TimerPreset> = catalog::all()
                .into_iter()
                .filter(|p| kind.map_or(true, |k| p.kind == k))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&presets)?);
            } else {
                for p in &presets {
                    println!("{:<30} {:>4} min  {:<8} {}", p.slug, p.minutes, p.kind, p.label);
                }
            }
        }
        PresetAction::Show { slug, json } => {
            let preset = lookup(&slug)?;
            let related = catalog::neighbors(&slug);
            if json {
                let value = serde_json::json!({ "preset": preset, "related": related });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", preset.label);
                println!("{}", preset.description);
                println!("{} minutes, {}", preset.minutes, preset.kind);
                let slugs: Vec<&str> = related.iter().map(|p| p.slug.as_str()).collect();
                println!("related: {}", slugs.join(", "));
            }
        }
        PresetAction::Run {
            slug,
            auto_continue,
            flags,
        } => {
            let preset = lookup(&slug)?;
            match preset.kind {
                TimerKind::Simple => {
                    timer::run_countdown(f64::from(preset.minutes), preset.label, flags).await?;
                }
                TimerKind::Pomodoro => {
                    let config = PomodoroConfig {
                        focus_minutes: preset.minutes,
                        ..PomodoroConfig::default()
                    };
                    config.validate()?;
                    pomodoro::run_cycle(config, None, auto_continue, flags).await?;
                }
            }
        }
        PresetAction::Validate => {
            let summary = catalog::validate(&catalog::all())?;
            println!("All {} timers validated successfully!", summary.total);
            println!("   - {} simple timers", summary.simple);
            println!("   - {} pomodoro timers", summary.pomodoro);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_miss_is_unknown_timer() {
        assert!(matches!(lookup("nope"), Err(CoreError::UnknownTimer(s)) if s == "nope"));
        assert_eq!(lookup("exam-timer").unwrap().minutes, 60);
    }

    #[test]
    fn every_pomodoro_preset_is_a_valid_focus_length() {
        for preset in catalog::all().into_iter().filter(|p| p.kind == TimerKind::Pomodoro) {
            let config = PomodoroConfig {
                focus_minutes: preset.minutes,
                ..PomodoroConfig::default()
            };
            assert!(config.validate().is_ok(), "{}", preset.slug);
        }
    }

    #[test]
    fn every_simple_preset_is_a_valid_countdown() {
        for preset in catalog::all().into_iter().filter(|p| p.kind == TimerKind::Simple) {
            assert!(timer::check_minutes(f64::from(preset.minutes)).is_ok(), "{}", preset.slug);
        }
    }
}
