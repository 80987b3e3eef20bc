// SessionRecorder - pressed-note sets to timed note events
//
// Each frame the recorder compares the pressed set with the notes it saw
// held on the previous frame. New notes become note-on events, vanished
// notes become note-off events. Events carry delta ticks relative to the
// previous event, derived from a cumulative tick clock anchored at start()
// so rounding never accumulates drift.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RecordingConfig;
use crate::error::RecordingError;
use crate::keyboard::{Note, PressedNotes};
use crate::recording::midi::write_recording;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteEventKind {
    On,
    Off,
}

/// One recorded transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub note: Note,
    pub kind: NoteEventKind,
    /// Ticks since the previous event (or since start for the first one)
    pub delta_ticks: u32,
}

/// Snapshot of a session ready to be written out
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedRecording {
    pub events: Vec<NoteEvent>,
}

impl FinishedRecording {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn total_ticks(&self) -> u64 {
        self.events.iter().map(|e| e.delta_ticks as u64).sum()
    }
}

#[derive(Debug, Clone)]
pub struct SessionRecorder {
    ticks_per_second: f64,
    active: bool,
    started_at: Option<Instant>,
    last_event_tick: u64,
    held: PressedNotes,
    events: Vec<NoteEvent>,
}

impl SessionRecorder {
    /// Create an inactive recorder
    pub fn new(config: &RecordingConfig) -> Self {
        Self {
            ticks_per_second: config.ticks_per_second(),
            active: false,
            started_at: None,
            last_event_tick: 0,
            held: PressedNotes::new(),
            events: Vec::new(),
        }
    }

    /// Begin a fresh session at `now`, discarding any previous events
    pub fn start(&mut self, now: Instant) {
        self.active = true;
        self.started_at = Some(now);
        self.last_event_tick = 0;
        self.held.clear();
        self.events.clear();
        info!("[SessionRecorder] Recording started");
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    pub fn held_notes(&self) -> &PressedNotes {
        &self.held
    }

    fn tick_at(&self, now: Instant) -> u64 {
        match self.started_at {
            Some(start) => {
                (now.saturating_duration_since(start).as_secs_f64() * self.ticks_per_second).round()
                    as u64
            }
            None => 0,
        }
    }

    fn push(&mut self, note: Note, kind: NoteEventKind, tick: u64) {
        let delta = tick.saturating_sub(self.last_event_tick);
        self.events.push(NoteEvent {
            note,
            kind,
            delta_ticks: u32::try_from(delta).unwrap_or(u32::MAX),
        });
        self.last_event_tick = tick.max(self.last_event_tick);
    }

    /// Diff this frame's pressed set against the held set
    ///
    /// Note-ons are emitted before note-offs, each in keyboard order. No-op
    /// while inactive.
    pub fn update(&mut self, pressed: &PressedNotes, now: Instant) {
        if !self.active {
            return;
        }

        let tick = self.tick_at(now);
        let started: Vec<Note> = pressed.difference(&self.held).copied().collect();
        let released: Vec<Note> = self.held.difference(pressed).copied().collect();

        for note in started {
            debug!("[SessionRecorder] note_on {} at tick {}", note, tick);
            self.push(note, NoteEventKind::On, tick);
        }
        for note in released {
            debug!("[SessionRecorder] note_off {} at tick {}", note, tick);
            self.push(note, NoteEventKind::Off, tick);
        }

        self.held.clone_from(pressed);
    }

    /// Snapshot the session with closing note-offs for still-held notes
    ///
    /// The recorder itself is left untouched so a failed export can be
    /// retried. Returns `None` while inactive.
    pub fn finalize(&self, now: Instant) -> Option<FinishedRecording> {
        if !self.active {
            return None;
        }

        let mut snapshot = self.clone();
        let tick = snapshot.tick_at(now);
        let held: Vec<Note> = snapshot.held.iter().copied().collect();
        for note in held {
            snapshot.push(note, NoteEventKind::Off, tick);
        }

        Some(FinishedRecording {
            events: snapshot.events,
        })
    }

    /// End the session once its file has been written
    ///
    /// `exported_events` is how many of [`events`](Self::events) the file
    /// covers. Events recorded after that snapshot, while a background
    /// write was running, are not in the file and are dropped with the
    /// session.
    ///
    /// # Returns
    /// The number of dropped events
    pub fn mark_saved(&mut self, exported_events: usize) -> usize {
        let dropped = self.events.len().saturating_sub(exported_events);
        self.active = false;
        self.held.clear();
        if dropped > 0 {
            debug!(
                "[SessionRecorder] {} events recorded after the export snapshot were dropped",
                dropped
            );
        }
        info!(
            "[SessionRecorder] Session closed with {} events",
            exported_events.min(self.events.len())
        );
        dropped
    }

    /// Finalize and write the session to `config.output_dir`
    ///
    /// # Returns
    /// * `Ok(Some(path))` - file written, recorder now inactive
    /// * `Ok(None)` - recorder inactive, or nothing was recorded
    /// * `Err(RecordingError)` - write failed, session kept for retry
    pub fn stop_and_save(
        &mut self,
        now: Instant,
        config: &RecordingConfig,
    ) -> Result<Option<PathBuf>, RecordingError> {
        self.stop_and_save_to(now, config, &config.output_dir)
    }

    /// Same as [`stop_and_save`](Self::stop_and_save) with an explicit directory
    pub fn stop_and_save_to(
        &mut self,
        now: Instant,
        config: &RecordingConfig,
        dir: &Path,
    ) -> Result<Option<PathBuf>, RecordingError> {
        let Some(recording) = self.finalize(now) else {
            return Ok(None);
        };
        if recording.is_empty() {
            info!("[SessionRecorder] Nothing recorded, skipping save");
            return Ok(None);
        }

        let path = write_recording(&recording, config, dir)?;
        self.mark_saved(self.events.len());
        Ok(Some(path))
    }
}
