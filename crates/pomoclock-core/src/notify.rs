//! Interval-boundary notification port.
//!
//! The engine describes *what* should be played as a [`Cue`]; a [`Notifier`]
//! decides *how*. Notifier failures are logged by the engine and otherwise
//! ignored.

use serde::{Deserialize, Serialize};

use crate::error::NotifyError;
use crate::settings::Settings;
use crate::timer::Mode;

/// How long the screen flash lasts.
pub const FLASH_MS: u64 = 1_000;
/// Pitch of the completion tone.
pub const TONE_NOTE: &str = "C5";
/// Length of the completion tone.
pub const TONE_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tone {
    pub note: String,
    pub duration_ms: u64,
}

/// Sound and flash to present when an interval ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    pub finished_mode: Mode,
    /// `None` when sound is disabled in settings.
    pub tone: Option<Tone>,
    pub flash_ms: u64,
}

impl Cue {
    pub fn for_completion(finished_mode: Mode, settings: &Settings) -> Self {
        let tone = settings.sound_enabled.then(|| Tone {
            note: TONE_NOTE.into(),
            duration_ms: TONE_MS,
        });
        Self {
            finished_mode,
            tone,
            flash_ms: FLASH_MS,
        }
    }
}

pub trait Notifier {
    /// Present the cue. Must return promptly; the countdown waits on it.
    fn notify(&mut self, cue: &Cue) -> Result<(), NotifyError>;
}

/// Notifier that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&mut self, _cue: &Cue) -> Result<(), NotifyError> {
        Ok(())
    }
}

impl<F> Notifier for F
where
    F: FnMut(&Cue) -> Result<(), NotifyError>,
{
    fn notify(&mut self, cue: &Cue) -> Result<(), NotifyError> {
        self(cue)
    }
}
