//! Session recording: pressed-note diffs to timed events, MIDI output and
//! background export.

pub mod export;
pub mod midi;
pub mod recorder;

pub use export::{ExportJob, ExportOutcome, ExportWorker};
pub use midi::{encode_recording, write_recording};
pub use recorder::{FinishedRecording, NoteEvent, NoteEventKind, SessionRecorder};
