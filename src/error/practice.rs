// Practice library error types and constants

use crate::error::ErrorCode;
use std::fmt;
use tracing::error;

/// Practice error code constants
///
/// Error code range: 3001-3004
pub struct PracticeErrorCodes {}

impl PracticeErrorCodes {
    /// Library directory could not be listed
    pub const LIBRARY_UNREADABLE: i32 = 3001;

    /// Practice file could not be read
    pub const FILE_UNREADABLE: i32 = 3002;

    /// Practice file is not a valid standard MIDI file
    pub const INVALID_MIDI: i32 = 3003;

    /// Practice file has no notes inside the supported scale
    pub const NO_PLAYABLE_NOTES: i32 = 3004;
}

/// Log a practice error with structured context
pub fn log_practice_error(err: &PracticeError, context: &str) {
    error!(
        "Practice error in {}: code={}, component=PracticeLibrary, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Practice library errors
///
/// Pitches outside the supported scale are not errors; they are skipped
/// with a warning while the rest of the sequence loads.
///
/// Error code ranges: 3001-3004
#[derive(Debug, Clone, PartialEq)]
pub enum PracticeError {
    LibraryUnreadable { dir: String, reason: String },
    FileUnreadable { path: String, reason: String },
    InvalidMidi { path: String, reason: String },
    NoPlayableNotes { path: String },
}

impl ErrorCode for PracticeError {
    fn code(&self) -> i32 {
        match self {
            PracticeError::LibraryUnreadable { .. } => PracticeErrorCodes::LIBRARY_UNREADABLE,
            PracticeError::FileUnreadable { .. } => PracticeErrorCodes::FILE_UNREADABLE,
            PracticeError::InvalidMidi { .. } => PracticeErrorCodes::INVALID_MIDI,
            PracticeError::NoPlayableNotes { .. } => PracticeErrorCodes::NO_PLAYABLE_NOTES,
        }
    }

    fn message(&self) -> String {
        match self {
            PracticeError::LibraryUnreadable { dir, reason } => {
                format!("Cannot list practice library {}: {}", dir, reason)
            }
            PracticeError::FileUnreadable { path, reason } => {
                format!("Cannot read {}: {}", path, reason)
            }
            PracticeError::InvalidMidi { path, reason } => {
                format!("{} is not a valid MIDI file: {}", path, reason)
            }
            PracticeError::NoPlayableNotes { path } => {
                format!("{} contains no playable notes", path)
            }
        }
    }
}

impl fmt::Display for PracticeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PracticeError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for PracticeError {}
