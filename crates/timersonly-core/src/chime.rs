//! Completion sound cue.
//!
//! Playback is fire-and-forget: a failure to play is logged and dropped,
//! and never reaches the timer state machine.

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
#[error("could not play chime: {0}")]
pub struct ChimeError(pub String);

/// Something that can make the completion sound.
pub trait Chime {
    fn play(&mut self) -> Result<(), ChimeError>;
}

/// Play `chime` if sound is enabled, swallowing any playback error.
///
/// Returns whether the chime played.
pub fn ring(chime: &mut dyn Chime, sound_enabled: bool) -> bool {
    if !sound_enabled {
        return false;
    }
    match chime.play() {
        Ok(()) => true,
        Err(err) => {
            debug!(%err, "chime playback failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        plays: u32,
        fail: bool,
    }

    impl Chime for Recorder {
        fn play(&mut self) -> Result<(), ChimeError> {
            if self.fail {
                return Err(ChimeError("no audio device".into()));
            }
            self.plays += 1;
            Ok(())
        }
    }

    #[test]
    fn disabled_sound_never_plays() {
        let mut chime = Recorder { plays: 0, fail: false };
        assert!(!ring(&mut chime, false));
        assert_eq!(chime.plays, 0);
    }

    #[test]
    fn playback_errors_are_swallowed() {
        let mut chime = Recorder { plays: 0, fail: true };
        assert!(!ring(&mut chime, true));
    }

    #[test]
    fn enabled_sound_plays() {
        let mut chime = Recorder { plays: 0, fail: false };
        assert!(ring(&mut chime, true));
        assert_eq!(chime.plays, 1);
    }
}
