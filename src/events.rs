//! Interaction events and per-frame reports exposed to renderers and the CLI.

use serde::{Deserialize, Serialize};

use crate::keyboard::Note;
use crate::landmarks::Handedness;
use crate::session::Phase;
use crate::zones::Mode;

/// Discrete transitions produced while processing frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum InteractionEvent {
    TableLocked {
        y_pixel: i32,
        z_reference: f32,
    },
    KeyboardBuilt {
        anchor: Handedness,
        anchor_x: i32,
        key_width: i32,
    },
    CalibrationRejected {
        code: i32,
        reason: String,
    },
    ModeSelected {
        mode: Mode,
    },
    NoteStarted {
        note: Note,
    },
    NoteStopped {
        note: Note,
    },
    PracticeFileChosen {
        path: String,
        notes: usize,
    },
    PracticeUnavailable {
        code: i32,
        reason: String,
    },
    PracticeProgress {
        note: Note,
        cursor: usize,
        total: usize,
    },
    PracticeCompleted {
        path: String,
    },
    ExitArmed,
    ExportStarted {
        events: usize,
    },
    ExportFinished {
        path: String,
    },
    ExportFailed {
        code: i32,
        reason: String,
    },
    Restarted,
    Exited,
    Aborted,
}

/// Transient status text and how long it has left.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BannerView {
    pub text: String,
    pub remaining_ms: u64,
}

/// Everything a renderer needs after one processed frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameReport {
    pub phase: Phase,
    /// Notes under a fingertip this frame, in keyboard order
    pub pressed: Vec<Note>,
    pub events: Vec<InteractionEvent>,
    pub banner: Option<BannerView>,
    /// Standing instruction for the current phase
    pub prompt: Option<String>,
    pub exit_menu_visible: bool,
    /// Practice mode: the note to play next
    pub expected_note: Option<Note>,
    /// The loop should stop after this frame
    pub finished: bool,
}

impl FrameReport {
    pub fn has_event(&self, predicate: impl Fn(&InteractionEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}
