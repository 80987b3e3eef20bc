// VoiceTracker - which notes are sounding
//
// A note starts the first frame it is pressed and stops the first frame it
// is not. Holding a key never retriggers it.

use serde::Serialize;

use crate::audio::NotePlayer;
use crate::keyboard::{Note, PressedNotes};

/// Notes started and stopped by one call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VoiceChanges {
    pub started: Vec<Note>,
    pub stopped: Vec<Note>,
}

impl VoiceChanges {
    pub fn is_empty(&self) -> bool {
        self.started.is_empty() && self.stopped.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct VoiceTracker {
    sounding: PressedNotes,
}

impl VoiceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sounding(&self) -> &PressedNotes {
        &self.sounding
    }

    /// Make the sounding set equal `pressed`
    pub fn sync(&mut self, pressed: &PressedNotes, player: &mut dyn NotePlayer) -> VoiceChanges {
        let mut changes = VoiceChanges::default();

        for &note in pressed.difference(&self.sounding) {
            player.start(note);
            changes.started.push(note);
        }
        for &note in self.sounding.difference(pressed) {
            player.stop(note);
            changes.stopped.push(note);
        }

        self.sounding.clone_from(pressed);
        changes
    }

    /// Start `note` unless it is already sounding
    ///
    /// # Returns
    /// `true` if the note was started
    pub fn play(&mut self, note: Note, player: &mut dyn NotePlayer) -> bool {
        if !self.sounding.insert(note) {
            return false;
        }
        player.start(note);
        true
    }

    /// Silence everything, e.g. on restart or exit
    pub fn stop_all(&mut self, player: &mut dyn NotePlayer) -> Vec<Note> {
        let stopped: Vec<Note> = std::mem::take(&mut self.sounding).into_iter().collect();
        for &note in &stopped {
            player.stop(note);
        }
        stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{PlayerCall, SpyPlayer};

    fn pressed(notes: &[Note]) -> PressedNotes {
        notes.iter().copied().collect()
    }

    #[test]
    fn test_held_note_not_retriggered() {
        let mut spy = SpyPlayer::default();
        let mut voices = VoiceTracker::new();

        voices.sync(&pressed(&[Note::C4]), &mut spy);
        let changes = voices.sync(&pressed(&[Note::C4]), &mut spy);

        assert!(changes.is_empty());
        assert_eq!(spy.calls(), vec![PlayerCall::Start(Note::C4)]);
    }

    #[test]
    fn test_release_stops_voice() {
        let mut spy = SpyPlayer::default();
        let mut voices = VoiceTracker::new();

        voices.sync(&pressed(&[Note::C4, Note::E4]), &mut spy);
        let changes = voices.sync(&pressed(&[Note::E4, Note::G4]), &mut spy);

        assert_eq!(changes.started, vec![Note::G4]);
        assert_eq!(changes.stopped, vec![Note::C4]);
        assert_eq!(voices.sounding(), &pressed(&[Note::E4, Note::G4]));
    }

    #[test]
    fn test_play_skips_sounding_note() {
        let mut spy = SpyPlayer::default();
        let mut voices = VoiceTracker::new();

        voices.sync(&pressed(&[Note::D3]), &mut spy);
        assert!(!voices.play(Note::D3, &mut spy));
        assert!(voices.play(Note::A4, &mut spy));
        assert_eq!(spy.calls().len(), 2);
    }

    #[test]
    fn test_stop_all() {
        let mut spy = SpyPlayer::default();
        let mut voices = VoiceTracker::new();

        voices.sync(&pressed(&[Note::B3, Note::C5]), &mut spy);
        let stopped = voices.stop_all(&mut spy);

        assert_eq!(stopped, vec![Note::B3, Note::C5]);
        assert!(voices.sounding().is_empty());
        assert_eq!(
            &spy.calls()[2..],
            &[PlayerCall::Stop(Note::B3), PlayerCall::Stop(Note::C5)]
        );
    }
}
