// Calibration error types and constants

use crate::error::ErrorCode;
use std::fmt;
use tracing::error;

/// Calibration error code constants
///
/// Error code range: 1001-1004
pub struct CalibrationErrorCodes {}

impl CalibrationErrorCodes {
    /// Layout requested before the table plane was locked
    pub const TABLE_NOT_LOCKED: i32 = 1001;

    /// Layout requested with no hand available to anchor it
    pub const NO_ANCHOR_HAND: i32 = 1002;

    /// Anchor hand span too narrow to derive a usable key width
    pub const DEGENERATE_KEY_WIDTH: i32 = 1003;

    /// Hit-testing requested before the keyboard layout was built
    pub const LAYOUT_NOT_READY: i32 = 1004;
}

/// Log a calibration error with structured context
///
/// Logs the numeric code, the component and the human-readable message.
pub fn log_calibration_error(err: &CalibrationError, context: &str) {
    error!(
        "Calibration error in {}: code={}, component=KeyboardCalibration, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Calibration-related errors
///
/// These cover the two-phase calibration (table plane, then key width and
/// layout) and the readiness checks guarding hit-testing.
///
/// Error code ranges: 1001-1004
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Table plane has not been locked yet
    TableNotLocked,

    /// No hand present to anchor the keyboard
    NoAnchorHand,

    /// Thumb-to-pinky span produced a zero key width
    DegenerateKeyWidth { span_px: f32 },

    /// Keyboard layout not built
    LayoutNotReady,
}

impl ErrorCode for CalibrationError {
    fn code(&self) -> i32 {
        match self {
            CalibrationError::TableNotLocked => CalibrationErrorCodes::TABLE_NOT_LOCKED,
            CalibrationError::NoAnchorHand => CalibrationErrorCodes::NO_ANCHOR_HAND,
            CalibrationError::DegenerateKeyWidth { .. } => {
                CalibrationErrorCodes::DEGENERATE_KEY_WIDTH
            }
            CalibrationError::LayoutNotReady => CalibrationErrorCodes::LAYOUT_NOT_READY,
        }
    }

    fn message(&self) -> String {
        match self {
            CalibrationError::TableNotLocked => "Table plane not calibrated".to_string(),
            CalibrationError::NoAnchorHand => "No hand available to anchor keyboard".to_string(),
            CalibrationError::DegenerateKeyWidth { span_px } => {
                format!("Hand span {:.1}px too narrow for a key width", span_px)
            }
            CalibrationError::LayoutNotReady => "Keyboard layout not built".to_string(),
        }
    }
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CalibrationError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for CalibrationError {}
