// Air Piano Core - hand-landmark gesture interaction
// Turns per-frame hand landmarks into table-top key presses, mode gestures,
// MIDI recordings and practice-mode progress.

// Module declarations
pub mod audio;
pub mod calibration;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod keyboard;
pub mod landmarks;
pub mod practice;
pub mod recording;
pub mod session;
pub mod smoothing;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod zones;

// Re-exports for convenience
pub use config::AppConfig;
pub use engine::{FrameSource, InteractionEngine, RunSummary, StopReason};
pub use events::{FrameReport, InteractionEvent};
pub use keyboard::{Note, PressedNotes};
pub use landmarks::{Frame, HandObservation, Handedness, Landmark, RecordedFrame};
pub use session::Phase;

/// Install the stderr `tracing` subscriber used by the binaries.
///
/// Logs at `info`, or `debug` when `verbose`. Safe to call more than once.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}
