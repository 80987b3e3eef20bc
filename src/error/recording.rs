// Recording error types and constants

use crate::error::ErrorCode;
use std::fmt;
use tracing::error;

/// Recording error code constants
///
/// Error code range: 2001-2004
pub struct RecordingErrorCodes {}

impl RecordingErrorCodes {
    /// Writing the session file failed (disk, permissions)
    pub const PERSISTENCE: i32 = 2001;

    /// The event list could not be encoded as a MIDI file
    pub const ENCODE: i32 = 2002;

    /// The background export worker has shut down
    pub const WORKER_UNAVAILABLE: i32 = 2003;

    /// An export is already running
    pub const EXPORT_IN_FLIGHT: i32 = 2004;
}

/// Log a recording error with structured context
pub fn log_recording_error(err: &RecordingError, context: &str) {
    error!(
        "Recording error in {}: code={}, component=SessionRecorder, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Recording and export errors
///
/// A failed export never discards the recording: the session stays active
/// so the export can be retried.
///
/// Error code ranges: 2001-2004
#[derive(Debug, Clone, PartialEq)]
pub enum RecordingError {
    /// Session file could not be written
    Persistence { path: String, reason: String },

    /// MIDI encoding failed
    Encode { reason: String },

    /// Export worker channel closed
    WorkerUnavailable,

    /// Another export has not finished yet
    ExportInFlight,
}

impl ErrorCode for RecordingError {
    fn code(&self) -> i32 {
        match self {
            RecordingError::Persistence { .. } => RecordingErrorCodes::PERSISTENCE,
            RecordingError::Encode { .. } => RecordingErrorCodes::ENCODE,
            RecordingError::WorkerUnavailable => RecordingErrorCodes::WORKER_UNAVAILABLE,
            RecordingError::ExportInFlight => RecordingErrorCodes::EXPORT_IN_FLIGHT,
        }
    }

    fn message(&self) -> String {
        match self {
            RecordingError::Persistence { path, reason } => {
                format!("Failed to write {}: {}", path, reason)
            }
            RecordingError::Encode { reason } => format!("Failed to encode MIDI: {}", reason),
            RecordingError::WorkerUnavailable => "Export worker unavailable".to_string(),
            RecordingError::ExportInFlight => "Export already in progress".to_string(),
        }
    }
}

impl fmt::Display for RecordingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RecordingError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for RecordingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_error_codes() {
        assert_eq!(
            RecordingError::Persistence {
                path: "a.mid".to_string(),
                reason: "denied".to_string()
            }
            .code(),
            2001
        );
        assert_eq!(
            RecordingError::Encode {
                reason: "x".to_string()
            }
            .code(),
            2002
        );
        assert_eq!(RecordingError::WorkerUnavailable.code(), 2003);
        assert_eq!(RecordingError::ExportInFlight.code(), 2004);
    }

    #[test]
    fn test_persistence_message_names_path() {
        let err = RecordingError::Persistence {
            path: "records/recording_1.mid".to_string(),
            reason: "permission denied".to_string(),
        };
        assert_eq!(
            err.message(),
            "Failed to write records/recording_1.mid: permission denied"
        );
    }
}
