// PracticeLibrary - practice MIDI files on disk
//
// A library is a flat directory of `.mid` / `.midi` files. Each file is read
// into the ordered sequence of note-on events it contains, keeping only the
// pitches the keyboard can play.

use std::fs;
use std::path::{Path, PathBuf};

use midly::{MidiMessage, Smf, TrackEventKind};
use tracing::{info, warn};

use crate::error::PracticeError;
use crate::keyboard::Note;

#[derive(Debug, Clone)]
pub struct PracticeLibrary {
    dir: PathBuf,
}

impl PracticeLibrary {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List practice files, sorted by file name
    ///
    /// # Returns
    /// * `Ok(files)` - possibly empty
    /// * `Err(PracticeError::LibraryUnreadable)` - directory missing or unreadable
    pub fn scan(&self) -> Result<Vec<PathBuf>, PracticeError> {
        let unreadable = |reason: String| PracticeError::LibraryUnreadable {
            dir: self.dir.display().to_string(),
            reason,
        };

        let entries = fs::read_dir(&self.dir).map_err(|e| unreadable(e.to_string()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| unreadable(e.to_string()))?.path();
            if path.is_file() && is_midi_file(&path) {
                files.push(path);
            }
        }
        files.sort();

        info!(
            "[PracticeLibrary] Found {} practice files in {:?}",
            files.len(),
            self.dir
        );
        Ok(files)
    }

    /// Read a practice file into its note sequence
    ///
    /// # Returns
    /// * `Ok(notes)` - at least one playable note
    /// * `Err(PracticeError)` - unreadable, invalid, or nothing playable
    pub fn load_notes(path: &Path) -> Result<Vec<Note>, PracticeError> {
        let bytes = fs::read(path).map_err(|e| PracticeError::FileUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let notes = notes_from_midi(&bytes).map_err(|e| PracticeError::InvalidMidi {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        if notes.is_empty() {
            return Err(PracticeError::NoPlayableNotes {
                path: path.display().to_string(),
            });
        }

        info!(
            "[PracticeLibrary] Loaded {} notes from {:?}",
            notes.len(),
            path
        );
        Ok(notes)
    }
}

fn is_midi_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.ends_with(".mid") || name.ends_with(".midi"))
        .unwrap_or(false)
}

/// Note-on events with non-zero velocity, track by track in file order.
///
/// Pitches outside the keyboard's scale are skipped with a warning.
pub fn notes_from_midi(bytes: &[u8]) -> Result<Vec<Note>, midly::Error> {
    let smf = Smf::parse(bytes)?;
    let mut notes = Vec::new();

    for track in &smf.tracks {
        for event in track {
            if let TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, vel },
                ..
            } = event.kind
            {
                if vel.as_int() == 0 {
                    continue;
                }
                match Note::from_pitch(key.as_int()) {
                    Some(note) => notes.push(note),
                    None => warn!("[PracticeLibrary] Unknown MIDI note: {}", key.as_int()),
                }
            }
        }
    }
    Ok(notes)
}
