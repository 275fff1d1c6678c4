mod engine;
mod pomodoro;

pub use engine::{CountdownEngine, TimerState, TICK_INTERVAL};
pub use pomodoro::{
    next_phase, PomodoroConfig, PomodoroConfigPatch, PomodoroPhase, PomodoroScheduler,
};
