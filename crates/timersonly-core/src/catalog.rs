//! Fixed catalog of per-duration timer presets.
//!
//! Each preset backs one landing route (`/t/{slug}`) and one
//! `timersonly preset run {slug}` invocation.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    Simple,
    Pomodoro,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimerKind::Simple => "simple",
            TimerKind::Pomodoro => "pomodoro",
        })
    }
}

impl FromStr for TimerKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(TimerKind::Simple),
            "pomodoro" => Ok(TimerKind::Pomodoro),
            _ => Err(ValidationError::InvalidValue {
                field: "kind".into(),
                message: format!("expected 'simple' or 'pomodoro', got '{s}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerPreset {
    pub slug: String,
    pub label: String,
    pub description: String,
    /// Countdown length, or focus length for pomodoro presets.
    pub minutes: u32,
    pub kind: TimerKind,
}

const SIMPLE_DURATIONS: &[u32] = &[
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 12, 13, 14, 15, // short
    20, 25, 30, 35, 40, 45, 50, 55, 60, // medium
    75, 90, 120,
];

const POMODORO_DURATIONS: &[u32] = &[15, 20, 25, 30, 45];

/// (slug, label, description, minutes, kind)
const SPECIAL_PRESETS: &[(&str, &str, &str, u32, TimerKind)] = &[
    (
        "study-timer",
        "Study Timer",
        "A minimalist study timer designed to keep you focused during revision, reading, and homework.",
        50,
        TimerKind::Pomodoro,
    ),
    (
        "adhd-focus-timer",
        "ADHD Focus Timer",
        "A gentle focus timer with shorter intervals, ideal for ADHD brains that thrive on frequent resets.",
        20,
        TimerKind::Pomodoro,
    ),
    (
        "workout-rest-timer",
        "Workout Rest Timer",
        "A clean, no-clutter timer for tracking rest periods between sets at the gym.",
        2,
        TimerKind::Simple,
    ),
    (
        "meditation-timer",
        "Meditation Timer",
        "A calm, distraction-free meditation timer with a soft visual design and no ads.",
        10,
        TimerKind::Simple,
    ),
    (
        "exam-timer",
        "Exam Timer",
        "A simple exam timer to keep you aware of the remaining time without adding stress or distractions.",
        60,
        TimerKind::Simple,
    ),
];

fn minute_word(minutes: u32) -> &'static str {
    if minutes == 1 {
        "minute"
    } else {
        "minutes"
    }
}

fn simple_description(minutes: u32) -> String {
    let label = format!("{minutes} {}", minute_word(minutes));
    match minutes {
        0..=3 => format!(
            "A clean, minimalist {label} timer for quick tasks, stretching, or tiny breaks."
        ),
        4..=15 => format!(
            "Use this distraction-free {label} timer for study sprints, coffee breaks, or short focus sessions."
        ),
        16..=30 => format!(
            "A calm {label} countdown timer ideal for deep work, reading, or productivity blocks."
        ),
        31..=60 => format!(
            "A minimalist {label} timer for longer focus blocks, workouts, or cooking sessions."
        ),
        _ => format!(
            "A simple {label} timer designed for long study sessions, workouts, or meditation."
        ),
    }
}

fn simple_preset(minutes: u32) -> TimerPreset {
    TimerPreset {
        slug: format!("{minutes}-minute-timer"),
        label: format!("{minutes} Minute Timer"),
        description: simple_description(minutes),
        minutes,
        kind: TimerKind::Simple,
    }
}

fn pomodoro_preset(minutes: u32) -> TimerPreset {
    TimerPreset {
        slug: format!("{minutes}-minute-pomodoro-timer"),
        label: format!("{minutes} Minute Pomodoro Timer"),
        description: format!(
            "A clean Pomodoro timer with {minutes}-minute focus intervals and gentle breaks."
        ),
        minutes,
        kind: TimerKind::Pomodoro,
    }
}

/// Every preset: simple durations, then pomodoro durations, then the
/// special use-case timers.
pub fn all() -> Vec<TimerPreset> {
    let simple = SIMPLE_DURATIONS.iter().copied().map(simple_preset);
    let pomodoro = POMODORO_DURATIONS.iter().copied().map(pomodoro_preset);
    let special = SPECIAL_PRESETS
        .iter()
        .map(|&(slug, label, description, minutes, kind)| TimerPreset {
            slug: slug.into(),
            label: label.into(),
            description: description.into(),
            minutes,
            kind,
        });
    simple.chain(pomodoro).chain(special).collect()
}

pub fn find(slug: &str) -> Option<TimerPreset> {
    all().into_iter().find(|p| p.slug == slug)
}

/// Related presets for quick links.
///
/// Same-kind presets up to three positions either side of `slug`, without
/// `slug` itself. An unknown slug gets the first six presets.
pub fn neighbors(slug: &str) -> Vec<TimerPreset> {
    let presets = all();
    let Some(kind) = presets.iter().find(|p| p.slug == slug).map(|p| p.kind) else {
        return presets.into_iter().take(6).collect();
    };
    let same_kind: Vec<TimerPreset> = presets.into_iter().filter(|p| p.kind == kind).collect();
    let index = same_kind
        .iter()
        .position(|p| p.slug == slug)
        .unwrap_or_default();
    let lo = index.saturating_sub(3);
    let hi = (index + 4).min(same_kind.len());
    same_kind[lo..hi]
        .iter()
        .filter(|p| p.slug != slug)
        .cloned()
        .collect()
}

/// Counts reported by a successful [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub total: usize,
    pub simple: usize,
    pub pomodoro: usize,
}

/// Check slugs are unique and non-empty, minutes positive, and labels and
/// descriptions present. Reports every problem, not just the first.
pub fn validate(presets: &[TimerPreset]) -> Result<CatalogSummary, ValidationError> {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();

    for (index, preset) in presets.iter().enumerate() {
        if preset.slug.trim().is_empty() {
            problems.push(format!("Empty slug at index {index}"));
        } else if !seen.insert(preset.slug.as_str()) {
            problems.push(format!(
                "Duplicate slug found: \"{}\" at index {index}",
                preset.slug
            ));
        }
        if preset.minutes == 0 {
            problems.push(format!(
                "Invalid minutes (0) for timer \"{}\" - must be > 0",
                preset.slug
            ));
        }
        if preset.description.trim().is_empty() {
            problems.push(format!("Empty description for timer \"{}\"", preset.slug));
        }
        if preset.label.trim().is_empty() {
            problems.push(format!("Empty label for timer \"{}\"", preset.slug));
        }
    }

    if !problems.is_empty() {
        return Err(ValidationError::Catalog(problems));
    }
    let simple = presets.iter().filter(|p| p.kind == TimerKind::Simple).count();
    Ok(CatalogSummary {
        total: presets.len(),
        simple,
        pomodoro: presets.len() - simple,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let summary = validate(&all()).unwrap();
        assert_eq!(summary.simple, 26 + 3);
        assert_eq!(summary.pomodoro, 5 + 2);
        assert_eq!(summary.total, 36);
    }

    #[test]
    fn simple_presets_are_tiered() {
        let one = find("1-minute-timer").unwrap();
        assert_eq!(one.label, "1 Minute Timer");
        assert!(one.description.contains("1 minute timer for quick tasks"));

        let ten = find("10-minute-timer").unwrap();
        assert!(ten.description.starts_with("Use this distraction-free 10 minutes"));

        let long = find("120-minute-timer").unwrap();
        assert!(long.description.starts_with("A simple 120 minutes timer"));
    }

    #[test]
    fn find_misses_unknown_slug() {
        assert!(find("61-minute-timer").is_none());
        let study = find("study-timer").unwrap();
        assert_eq!(study.kind, TimerKind::Pomodoro);
        assert_eq!(study.minutes, 50);
    }

    #[test]
    fn neighbors_stay_within_kind() {
        let near = neighbors("25-minute-pomodoro-timer");
        assert!(near.iter().all(|p| p.kind == TimerKind::Pomodoro));
        assert!(near.iter().all(|p| p.slug != "25-minute-pomodoro-timer"));
        assert_eq!(near.len(), 5);

        let edge = neighbors("1-minute-timer");
        let slugs: Vec<_> = edge.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["2-minute-timer", "3-minute-timer", "4-minute-timer"]);
    }

    #[test]
    fn neighbors_of_unknown_slug_fall_back_to_first_six() {
        let near = neighbors("nope");
        assert_eq!(near.len(), 6);
        assert_eq!(near[0].slug, "1-minute-timer");
    }

    #[test]
    fn validate_reports_all_problems() {
        let mut presets = vec![simple_preset(5), simple_preset(5)];
        presets.push(TimerPreset {
            slug: String::new(),
            label: " ".into(),
            description: String::new(),
            minutes: 0,
            kind: TimerKind::Simple,
        });
        match validate(&presets) {
            Err(ValidationError::Catalog(problems)) => {
                assert_eq!(problems.len(), 5);
                assert!(problems[0].starts_with("Duplicate slug"));
            }
            other => panic!("expected catalog error, got {other:?}"),
        }
    }
}
