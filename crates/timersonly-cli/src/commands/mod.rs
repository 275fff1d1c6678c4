pub mod config;
pub mod pomodoro;
pub mod preset;
pub mod theme;
pub mod timer;

use clap::Args;
use timersonly_core::Config;

use crate::render::Renderer;

/// Display and sound flags shared by every running timer.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct RunFlags {
    /// Ring the terminal bell when a countdown finishes
    #[arg(long)]
    pub sound: bool,
    /// Disable theme colors
    #[arg(long)]
    pub no_color: bool,
    /// Print events as JSON lines instead of drawing
    #[arg(long)]
    pub json: bool,
    /// Load the timer without starting it
    #[arg(long)]
    pub paused: bool,
}

impl RunFlags {
    pub fn renderer(&self) -> Renderer {
        let theme = Config::load_or_default().ui.theme;
        Renderer::new(theme.theme(), !self.no_color, self.json)
    }
}
