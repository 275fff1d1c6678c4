//! Keyboard shortcuts shared by every timer surface.
//!
//! | key   | command |
//! |-------|---------|
//! | space | toggle start/pause |
//! | `r`   | reset |
//! | `n`   | skip to the next phase |

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerCommand {
    Toggle,
    Reset,
    Skip,
}

/// A single key press as seen by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    /// The press landed in a text input (e.g. a settings field).
    pub in_text_field: bool,
}

impl KeyPress {
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }
}

/// Map a key press to a timer command.
///
/// Presses while typing or with ctrl/alt/meta held are ignored.
pub fn command_for(press: &KeyPress) -> Option<TimerCommand> {
    if press.in_text_field || press.ctrl || press.alt || press.meta {
        return None;
    }
    match press.key.to_lowercase().as_str() {
        " " => Some(TimerCommand::Toggle),
        "r" => Some(TimerCommand::Reset),
        "n" => Some(TimerCommand::Skip),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings() {
        assert_eq!(command_for(&KeyPress::plain(" ")), Some(TimerCommand::Toggle));
        assert_eq!(command_for(&KeyPress::plain("r")), Some(TimerCommand::Reset));
        assert_eq!(command_for(&KeyPress::plain("N")), Some(TimerCommand::Skip));
        assert_eq!(command_for(&KeyPress::plain("x")), None);
    }

    #[test]
    fn modifiers_and_text_fields_suppress_shortcuts() {
        let ctrl_r = KeyPress {
            ctrl: true,
            ..KeyPress::plain("r")
        };
        assert_eq!(command_for(&ctrl_r), None);

        let typing = KeyPress {
            in_text_field: true,
            ..KeyPress::plain(" ")
        };
        assert_eq!(command_for(&typing), None);
    }
}
