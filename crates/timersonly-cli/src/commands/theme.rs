use clap::Subcommand;
use timersonly_core::theme::THEMES;
use timersonly_core::{Config, ThemeId};
use tracing::info;

#[derive(Subcommand)]
pub enum ThemeAction {
    /// List available themes
    List,
    /// Print the selected theme
    Get,
    /// Select a theme
    Set {
        /// Theme id (peach, mint, lavender, sky, sand, dark, white)
        id: ThemeId,
    },
    /// Switch to the next theme
    Cycle,
}

pub fn run(action: ThemeAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ThemeAction::List => {
            let current = Config::load_or_default().ui.theme;
            for theme in THEMES.iter() {
                let marker = if theme.id == current { "*" } else { " " };
                println!(
                    "{marker} {:<9} {:<9} bg {} text {} accent {}",
                    theme.id, theme.name, theme.bg, theme.text, theme.accent
                );
            }
        }
        ThemeAction::Get => {
            println!("{}", Config::load()?.ui.theme);
        }
        ThemeAction::Set { id } => {
            let mut config = Config::load()?;
            config.ui.theme = id;
            config.save()?;
            info!(theme = %id, "theme selected");
            println!("{id}");
        }
        ThemeAction::Cycle => {
            let mut config = Config::load()?;
            config.ui.theme = config.ui.theme.next();
            config.save()?;
            info!(theme = %config.ui.theme, "theme cycled");
            println!("{}", config.ui.theme);
        }
    }
    Ok(())
}
