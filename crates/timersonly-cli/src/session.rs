//! Interactive timer loop.
//!
//! A current-thread runtime multiplexes the refresh tick, stdin key lines
//! and Ctrl-C, so every mutation of the timer runs to completion before the
//! next one starts.

use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use timersonly_core::chime::{self, Chime, ChimeError};
use timersonly_core::clock::Clock;
use timersonly_core::hotkeys::{self, KeyPress, TimerCommand};
use timersonly_core::{
    CountdownEngine, Event, PhaseChangeCause, PomodoroScheduler, TimerState, TICK_INTERVAL,
};

use crate::render::{Frame, Renderer};

/// Commands a running timer understands.
pub trait Controls {
    fn toggle(&mut self) -> Vec<Event>;
    fn reset(&mut self) -> Vec<Event>;
    fn skip(&mut self) -> Vec<Event>;
    fn tick(&mut self) -> Vec<Event>;
    fn frame(&self) -> Frame;
    fn state(&self) -> TimerState;
    /// Nothing left to do; the loop may exit.
    fn finished(&self) -> bool;
    fn snapshot(&self) -> Event;
}

/// Plain countdown.
pub struct SimpleTimer<C: Clock> {
    engine: CountdownEngine<C>,
    label: String,
}

impl<C: Clock> SimpleTimer<C> {
    pub fn new(engine: CountdownEngine<C>, label: impl Into<String>) -> Self {
        Self {
            engine,
            label: label.into(),
        }
    }
}

impl<C: Clock> Controls for SimpleTimer<C> {
    fn toggle(&mut self) -> Vec<Event> {
        self.engine.toggle().into_iter().collect()
    }

    fn reset(&mut self) -> Vec<Event> {
        self.engine.reset(None).into_iter().collect()
    }

    fn skip(&mut self) -> Vec<Event> {
        Vec::new()
    }

    fn tick(&mut self) -> Vec<Event> {
        self.engine.tick().into_iter().collect()
    }

    fn frame(&self) -> Frame {
        Frame {
            title: self.label.clone(),
            remaining_secs: self.engine.current_remaining(),
            fraction_left: 1.0 - self.engine.progress(),
            state: self.engine.state(),
            footer: None,
        }
    }

    fn state(&self) -> TimerState {
        self.engine.state()
    }

    fn finished(&self) -> bool {
        self.engine.state() == TimerState::Completed
    }

    fn snapshot(&self) -> Event {
        self.engine.snapshot()
    }
}

/// Pomodoro cycle, optionally starting each new phase by itself.
pub struct PomodoroSession<C: Clock> {
    scheduler: PomodoroScheduler<C>,
    auto_continue: bool,
}

impl<C: Clock> PomodoroSession<C> {
    pub fn new(scheduler: PomodoroScheduler<C>, auto_continue: bool) -> Self {
        Self {
            scheduler,
            auto_continue,
        }
    }
}

impl<C: Clock> Controls for PomodoroSession<C> {
    fn toggle(&mut self) -> Vec<Event> {
        self.scheduler.toggle()
    }

    fn reset(&mut self) -> Vec<Event> {
        self.scheduler.reset_phase().into_iter().collect()
    }

    fn skip(&mut self) -> Vec<Event> {
        self.scheduler.skip_phase().into_iter().collect()
    }

    fn tick(&mut self) -> Vec<Event> {
        let mut events = self.scheduler.tick();
        let completed_phase = events.iter().any(|e| {
            matches!(
                e,
                Event::PhaseChanged {
                    cause: PhaseChangeCause::Completed,
                    ..
                }
            )
        });
        if completed_phase && self.auto_continue {
            events.extend(self.scheduler.start());
        }
        events
    }

    fn frame(&self) -> Frame {
        let engine = self.scheduler.engine();
        Frame {
            title: self.scheduler.phase().label().to_string(),
            remaining_secs: engine.current_remaining(),
            fraction_left: 1.0 - engine.progress(),
            state: engine.state(),
            footer: Some(format!(
                "Session {} of {}",
                self.scheduler.current_session(),
                self.scheduler.config().long_break_interval
            )),
        }
    }

    fn state(&self) -> TimerState {
        self.scheduler.state()
    }

    /// The cycle never ends by itself.
    fn finished(&self) -> bool {
        false
    }

    fn snapshot(&self) -> Event {
        self.scheduler.snapshot()
    }
}

/// Completion cue: the terminal bell.
pub struct TerminalBell;

impl Chime for TerminalBell {
    fn play(&mut self) -> Result<(), ChimeError> {
        let mut out = io::stdout().lock();
        out.write_all(b"\x07")
            .and_then(|()| out.flush())
            .map_err(|e| ChimeError(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub autostart: bool,
    pub sound: bool,
}

/// Translate one stdin line into a key press. An empty line is the space bar.
pub fn key_press_from_line(line: &str) -> KeyPress {
    let key = line.trim_end_matches(['\r', '\n']);
    let key = match key.trim() {
        "" | "space" => " ",
        other => other,
    };
    KeyPress::plain(key)
}

fn is_quit(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "q" | "quit" | "exit")
}

/// Apply a key-line to the timer, returning the resulting events.
pub fn handle_line<T: Controls>(timer: &mut T, line: &str) -> Vec<Event> {
    match hotkeys::command_for(&key_press_from_line(line)) {
        Some(TimerCommand::Toggle) => timer.toggle(),
        Some(TimerCommand::Reset) => timer.reset(),
        Some(TimerCommand::Skip) => timer.skip(),
        None => Vec::new(),
    }
}

fn emit(renderer: &Renderer, events: &[Event], sound: bool) -> io::Result<()> {
    for event in events {
        if event.is_completion() {
            chime::ring(&mut TerminalBell, sound);
        }
        if let Event::PhaseChanged { from, to, cause, .. } = event {
            info!(%from, %to, ?cause, "phase changed");
        }
        renderer.event(event)?;
    }
    Ok(())
}

/// Whether the loop should exit: the timer is done, or stdin has closed
/// and nothing is counting down that could still change.
pub fn should_stop<T: Controls>(timer: &T, stdin_open: bool) -> bool {
    timer.finished() || (!stdin_open && timer.state() != TimerState::Running)
}

/// Run `timer` until it finishes, the user quits, or Ctrl-C.
pub async fn run<T: Controls>(
    mut timer: T,
    renderer: Renderer,
    options: SessionOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ticker = interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    renderer.help();
    renderer.event(&timer.snapshot())?;
    if options.autostart {
        let events = timer.toggle();
        emit(&renderer, &events, options.sound)?;
    }
    info!(autostart = options.autostart, "timer session started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let events = timer.tick();
                emit(&renderer, &events, options.sound)?;
                renderer.draw(&timer.frame())?;
                if should_stop(&timer, stdin_open) {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    None => {
                        stdin_open = false;
                        if should_stop(&timer, stdin_open) {
                            break;
                        }
                    }
                    Some(line) if is_quit(&line) => break,
                    Some(line) => {
                        let events = handle_line(&mut timer, &line);
                        emit(&renderer, &events, options.sound)?;
                        renderer.draw(&timer.frame())?;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    renderer.finish();
    renderer.event(&timer.snapshot())?;
    info!("timer session ended");
    Ok(())
}
