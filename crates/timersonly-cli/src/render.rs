//! Terminal drawing for running timers.

use std::io::{self, Write};

use timersonly_core::theme::{darken_color, parse_hex, Rgb, Theme};
use timersonly_core::{format_seconds, Event, TimerState};

const BAR_WIDTH: usize = 30;

/// One redraw worth of timer state.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub title: String,
    pub remaining_secs: f64,
    /// Fraction of the duration still left, 0.0 ..= 1.0.
    pub fraction_left: f64,
    pub state: TimerState,
    pub footer: Option<String>,
}

/// Writes frames in place on one line, or events as JSON lines.
pub struct Renderer {
    accent: Option<Rgb>,
    track: Option<Rgb>,
    json: bool,
}

impl Renderer {
    pub fn new(theme: &Theme, color: bool, json: bool) -> Self {
        let (accent, track) = if color {
            let track = darken_color(theme.card_bg, 20.0)
                .ok()
                .and_then(|hex| parse_hex(&hex).ok());
            (parse_hex(theme.accent).ok(), track)
        } else {
            (None, None)
        };
        Self { accent, track, json }
    }

    pub fn help(&self) {
        if !self.json {
            println!("[space/enter] start/pause  [r] reset  [n] skip  [q] quit");
        }
    }

    pub fn draw(&self, frame: &Frame) -> io::Result<()> {
        if self.json {
            return Ok(());
        }
        let mut out = io::stdout().lock();
        write!(out, "\r\x1b[2K{}", self.line(frame))?;
        out.flush()
    }

    pub fn event(&self, event: &Event) -> io::Result<()> {
        if !self.json {
            return Ok(());
        }
        let line = serde_json::to_string(event).map_err(io::Error::other)?;
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()
    }

    /// Leave the drawn line intact before exiting.
    pub fn finish(&self) {
        if !self.json {
            println!();
        }
    }

    pub fn line(&self, frame: &Frame) -> String {
        let filled = (frame.fraction_left.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
        let bar = format!(
            "{}{}",
            paint(&"█".repeat(filled), self.accent),
            paint(&"░".repeat(BAR_WIDTH - filled), self.track),
        );
        let state = match frame.state {
            TimerState::Running => "",
            TimerState::Idle => " (paused)",
            TimerState::Completed => " (done)",
        };
        let mut line = format!(
            "{}  {}  {bar}{state}",
            frame.title,
            paint(&format_seconds(frame.remaining_secs), self.accent),
        );
        if let Some(footer) = &frame.footer {
            line.push_str("  ");
            line.push_str(footer);
        }
        line
    }
}

fn paint(text: &str, color: Option<Rgb>) -> String {
    match color {
        Some(Rgb { r, g, b }) => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
        None => text.to_string(),
    }
}
