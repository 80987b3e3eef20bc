//! Backend abstraction for note playback.

use tracing::debug;

use crate::keyboard::Note;

/// Trait implemented by sound backends.
///
/// Calls arrive from the frame loop and must return promptly. `start` on a
/// note that is already sounding is never issued; [`VoiceTracker`] filters
/// those out.
///
/// [`VoiceTracker`]: crate::audio::VoiceTracker
pub trait NotePlayer: Send {
    fn start(&mut self, note: Note);
    fn stop(&mut self, note: Note);
}

/// Silent backend that only logs; used headless and by the replay CLI.
#[derive(Debug, Default)]
pub struct LogPlayer {
    _unit: (),
}

impl NotePlayer for LogPlayer {
    fn start(&mut self, note: Note) {
        debug!("[LogPlayer] start {} ({})", note, note.pitch());
    }

    fn stop(&mut self, note: Note) {
        debug!("[LogPlayer] stop {}", note);
    }
}
