//! # TimersOnly Core Library
//!
//! This library provides the timer logic behind TimersOnly: a minimalist
//! countdown and a Pomodoro focus/break cycler. Presentation layers (the
//! `timersonly` CLI) are thin shells that issue commands and redraw.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: an anchor-based state machine over a monotonic
//!   [`Clock`]; the caller invokes `tick()` periodically for progress updates
//! - **Pomodoro Scheduler**: phase sequencing and session counting on top of
//!   one engine
//! - **Catalog**: the fixed set of per-duration timer presets
//! - **Themes & Storage**: the color palette and the single persisted
//!   preference (the selected theme)
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: Core countdown state machine
//! - [`PomodoroScheduler`]: Focus/short-break/long-break cycler
//! - [`Config`]: Preference file management
//! - [`TimerPreset`]: Catalog entry for a per-duration timer

pub mod catalog;
pub mod chime;
pub mod clock;
pub mod error;
pub mod events;
pub mod hotkeys;
pub mod storage;
pub mod theme;
pub mod time;
pub mod timer;

pub use catalog::{CatalogSummary, TimerKind, TimerPreset};
pub use chime::{Chime, ChimeError};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::{Event, PhaseChangeCause};
pub use hotkeys::{KeyPress, TimerCommand};
pub use storage::Config;
pub use theme::{Theme, ThemeId};
pub use time::{format_seconds, minutes_to_seconds};
pub use timer::{
    CountdownEngine, PomodoroConfig, PomodoroConfigPatch, PomodoroPhase, PomodoroScheduler,
    TimerState, TICK_INTERVAL,
};
