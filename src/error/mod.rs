// Error types for the air piano interaction core
//
// This module defines typed errors for calibration, recording and practice
// operations. Each error carries a stable numeric code so frontends and the
// CLI can report failures without matching on message text.
//
// Tracking gaps, unmapped pitches and empty sessions are deliberately absent:
// they are recovered where they occur and never surface as errors.

mod calibration;
mod practice;
mod recording;

pub use calibration::{log_calibration_error, CalibrationError, CalibrationErrorCodes};
pub use practice::{log_practice_error, PracticeError, PracticeErrorCodes};
pub use recording::{log_recording_error, RecordingError, RecordingErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
