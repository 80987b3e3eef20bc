//! InteractionEngine: the per-frame interaction state machine.
//!
//! One call to [`InteractionEngine::process_frame`] runs every component for a
//! single video frame and returns a [`FrameReport`]. The engine never sleeps
//! and never blocks on export; timed behavior is driven entirely by frame
//! timestamps so headless callers can feed synthetic time.

use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::audio::{NotePlayer, VoiceTracker};
use crate::calibration::find_anchor;
use crate::config::AppConfig;
use crate::error::{log_calibration_error, log_practice_error, CalibrationError, ErrorCode};
use crate::events::{FrameReport, InteractionEvent};
use crate::keyboard::PressedNotes;
use crate::landmarks::Frame;
use crate::practice::{PracticeLibrary, PracticeMatcher, PracticeMenu};
use crate::recording::ExportWorker;
use crate::session::{ActivePractice, Phase, SessionContext};
use crate::zones::{ExitChoice, Mode};

#[path = "core_export.rs"]
mod core_export;

/// InteractionEngine owns the session and its long-lived collaborators.
pub struct InteractionEngine {
    config: AppConfig,
    library: PracticeLibrary,
    player: Box<dyn NotePlayer>,
    voices: VoiceTracker,
    exporter: Option<ExportWorker>,
    /// Session id the in-flight export belongs to, and how many recorder
    /// events it covers
    export_session: Option<(u64, usize)>,
    next_session_id: u64,
    session: SessionContext,
    finished: bool,
}

impl InteractionEngine {
    /// Create an engine in the table-calibration phase.
    ///
    /// # Arguments
    /// * `config` - Interaction tuning
    /// * `player` - Sound backend for key presses
    pub fn new(config: AppConfig, player: Box<dyn NotePlayer>) -> Self {
        let exporter = match ExportWorker::spawn() {
            Ok(worker) => Some(worker),
            Err(err) => {
                error!("[InteractionEngine] Export disabled: {}", err);
                None
            }
        };
        let library = PracticeLibrary::new(config.practice.library_dir.clone());
        let session = SessionContext::new(&config, 0);

        info!("[InteractionEngine] Created, waiting for table calibration");
        Self {
            config,
            library,
            player,
            voices: VoiceTracker::new(),
            exporter,
            export_session: None,
            next_session_id: 1,
            session,
            finished: false,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn voices(&self) -> &VoiceTracker {
        &self.voices
    }

    /// The exit button or the abort input ended the interaction
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    // ========================================================================
    // FRAME PROCESSING
    // ========================================================================

    /// Run every component for one frame
    ///
    /// Frames after the engine has finished are ignored.
    pub fn process_frame(&mut self, frame: &Frame) -> FrameReport {
        let mut events = Vec::new();
        let mut pressed = PressedNotes::new();

        if !self.finished {
            self.poll_export(frame.timestamp, &mut events);

            if frame.abort {
                info!("[InteractionEngine] Abort input received");
                self.stop_voices(&mut events);
                events.push(InteractionEvent::Aborted);
                self.finished = true;
            } else {
                match self.session.phase {
                    Phase::CalibratingTable => self.calibrate_table(frame, &mut events),
                    Phase::CalibratingKeys => self.calibrate_keys(frame, &mut events),
                    Phase::SelectingMode => self.select_mode(frame, &mut events),
                    Phase::ChoosingPracticeFile => self.choose_practice_file(frame, &mut events),
                    Phase::Playing { mode } => {
                        pressed = self.play(mode, frame, &mut events);
                    }
                }
            }
        }

        self.report(frame.timestamp, pressed, events)
    }

    fn report(
        &mut self,
        now: Instant,
        pressed: PressedNotes,
        events: Vec<InteractionEvent>,
    ) -> FrameReport {
        let phase = self.session.phase;
        FrameReport {
            phase,
            pressed: pressed.into_iter().collect(),
            events,
            banner: self.session.live_banner(now),
            prompt: phase.prompt().map(str::to_string),
            exit_menu_visible: self.session.exit.is_visible(),
            expected_note: self
                .session
                .practice
                .as_ref()
                .and_then(|p| p.matcher.expected()),
            finished: self.finished,
        }
    }

    fn calibrate_table(&mut self, frame: &Frame, events: &mut Vec<InteractionEvent>) {
        if let Some(table) = self.session.table.update(frame) {
            events.push(InteractionEvent::TableLocked {
                y_pixel: table.y_pixel,
                z_reference: table.z_reference,
            });
            self.session.phase = Phase::CalibratingKeys;
        }
    }

    fn calibrate_keys(&mut self, frame: &Frame, events: &mut Vec<InteractionEvent>) {
        let Some(table) = self.session.table.calibration() else {
            log_calibration_error(&CalibrationError::TableNotLocked, "calibrate_keys");
            self.session.phase = Phase::CalibratingTable;
            return;
        };

        let anchor = match find_anchor(frame) {
            Ok(anchor) => anchor,
            Err(_) => {
                debug!("[InteractionEngine] Waiting for a hand to set key width");
                return;
            }
        };

        let key_width = match anchor.key_width(self.config.calibration.span_divisor) {
            Ok(width) => width,
            Err(err) => {
                warn!("[InteractionEngine] {}", err.message());
                events.push(InteractionEvent::CalibrationRejected {
                    code: err.code(),
                    reason: err.message(),
                });
                return;
            }
        };

        self.session
            .layout
            .build(frame.width, table.y_pixel, anchor.anchor_x, key_width);
        self.session.mode_selector.build(frame.width);
        self.session.anchor = Some(anchor);
        self.session.key_width = Some(key_width);
        self.session.phase = Phase::SelectingMode;

        events.push(InteractionEvent::KeyboardBuilt {
            anchor: anchor.side,
            anchor_x: anchor.anchor_x,
            key_width,
        });
    }

    fn select_mode(&mut self, frame: &Frame, events: &mut Vec<InteractionEvent>) {
        let fingertips = frame.fingertips();
        let Some(mode) = self.session.mode_selector.check_pressed(&fingertips) else {
            return;
        };

        match mode {
            Mode::Record => {
                info!("[InteractionEngine] Record mode selected");
                self.session.recorder.start(frame.timestamp);
                self.session.phase = Phase::Playing { mode };
                self.session.show_banner(
                    mode.banner(),
                    frame.timestamp,
                    self.config.gestures.mode_banner(),
                );
                events.push(InteractionEvent::ModeSelected { mode });
            }
            Mode::Practice => self.open_practice_menu(frame.timestamp, events),
        }
    }

    fn open_practice_menu(&mut self, now: Instant, events: &mut Vec<InteractionEvent>) {
        let status = self.config.gestures.status_banner();
        match self.library.scan() {
            Ok(files) if files.is_empty() => {
                warn!(
                    "[InteractionEngine] No practice files in {:?}",
                    self.library.dir()
                );
                self.session
                    .show_banner("No practice files found", now, status);
            }
            Ok(files) => {
                info!("[InteractionEngine] Practice mode selected");
                self.session.menu = Some(PracticeMenu::new(
                    files,
                    self.config.gestures.menu_dwell(),
                ));
                self.session.phase = Phase::ChoosingPracticeFile;
                events.push(InteractionEvent::ModeSelected {
                    mode: Mode::Practice,
                });
            }
            Err(err) => {
                log_practice_error(&err, "open_practice_menu");
                self.session.show_banner(err.message(), now, status);
                events.push(InteractionEvent::PracticeUnavailable {
                    code: err.code(),
                    reason: err.message(),
                });
            }
        }
    }

    fn choose_practice_file(&mut self, frame: &Frame, events: &mut Vec<InteractionEvent>) {
        let fingertip = frame.right.as_ref().map(|hand| {
            let tip = hand.index_tip();
            (tip.pixel_x(frame.width), tip.pixel_y(frame.height))
        });

        let Some(menu) = self.session.menu.as_mut() else {
            self.session.return_to_mode_selection();
            return;
        };
        let Some(path) = menu.update(fingertip, frame.timestamp) else {
            return;
        };

        match PracticeLibrary::load_notes(&path) {
            Ok(notes) => {
                events.push(InteractionEvent::PracticeFileChosen {
                    path: path.display().to_string(),
                    notes: notes.len(),
                });
                self.session.menu = None;
                self.session.practice = Some(ActivePractice {
                    path,
                    matcher: PracticeMatcher::new(notes),
                });
                self.session.phase = Phase::Playing {
                    mode: Mode::Practice,
                };
                self.session.show_banner(
                    Mode::Practice.banner(),
                    frame.timestamp,
                    self.config.gestures.mode_banner(),
                );
            }
            Err(err) => {
                log_practice_error(&err, "choose_practice_file");
                self.session.return_to_mode_selection();
                self.session.show_banner(
                    err.message(),
                    frame.timestamp,
                    self.config.gestures.status_banner(),
                );
                events.push(InteractionEvent::PracticeUnavailable {
                    code: err.code(),
                    reason: err.message(),
                });
            }
        }
    }

    /// One frame of record or practice play
    ///
    /// Order matters: hit-test, voices, recorder, exit gesture, then
    /// practice matching (skipped while the exit menu is open).
    fn play(
        &mut self,
        mode: Mode,
        frame: &Frame,
        events: &mut Vec<InteractionEvent>,
    ) -> PressedNotes {
        let fingertips = frame.fingertips();
        let pressed = match self.session.layout.check_pressed(&fingertips) {
            Ok(pressed) => pressed,
            Err(err) => {
                log_calibration_error(&err, "play");
                self.session.phase = Phase::CalibratingKeys;
                return PressedNotes::new();
            }
        };

        let changes = self.voices.sync(&pressed, self.player.as_mut());
        events.extend(
            changes
                .started
                .iter()
                .map(|&note| InteractionEvent::NoteStarted { note }),
        );
        events.extend(
            changes
                .stopped
                .iter()
                .map(|&note| InteractionEvent::NoteStopped { note }),
        );

        if mode == Mode::Record {
            self.session.recorder.update(&pressed, frame.timestamp);
        }

        if self.session.exit.update(frame) {
            events.push(InteractionEvent::ExitArmed);
        }

        if self.session.exit.is_visible() {
            if mode == Mode::Record {
                self.session.download.build(frame.width, frame.height);
                let hovered = self.session.download.check_pressed(&fingertips);
                if hovered && !self.session.download_hovered {
                    self.request_export(frame.timestamp, events);
                }
                self.session.download_hovered = hovered;
            }

            match self.session.exit.check_pressed(&fingertips) {
                Some(ExitChoice::Exit) => {
                    info!("[InteractionEngine] Exit selected");
                    self.stop_voices(events);
                    events.push(InteractionEvent::Exited);
                    self.finished = true;
                }
                Some(ExitChoice::Restart) => {
                    self.restart(events);
                    return PressedNotes::new();
                }
                None => {}
            }
            return pressed;
        }

        if mode == Mode::Practice {
            self.advance_practice(&pressed, frame.timestamp, events);
        }
        pressed
    }

    fn advance_practice(
        &mut self,
        pressed: &PressedNotes,
        now: Instant,
        events: &mut Vec<InteractionEvent>,
    ) {
        let Some(practice) = self.session.practice.as_mut() else {
            return;
        };
        let Some(note) = practice.matcher.advance(pressed) else {
            return;
        };

        self.voices.play(note, self.player.as_mut());
        events.push(InteractionEvent::PracticeProgress {
            note,
            cursor: practice.matcher.cursor(),
            total: practice.matcher.len(),
        });

        if practice.matcher.is_complete() {
            let path = practice.path.display().to_string();
            info!("[InteractionEngine] Song completed: {}", path);
            events.push(InteractionEvent::PracticeCompleted { path });
            self.stop_voices(events);
            self.session.return_to_mode_selection();
            self.session.show_banner(
                "Song Completed!",
                now,
                self.config.gestures.completion_banner(),
            );
        }
    }

    fn stop_voices(&mut self, events: &mut Vec<InteractionEvent>) {
        for note in self.voices.stop_all(self.player.as_mut()) {
            events.push(InteractionEvent::NoteStopped { note });
        }
    }

    /// Cold-start the interaction with a brand new session
    ///
    /// The export worker and any export already running are kept.
    fn restart(&mut self, events: &mut Vec<InteractionEvent>) {
        info!("[InteractionEngine] Restart requested");
        self.stop_voices(events);
        self.session = SessionContext::new(&self.config, self.next_session_id);
        self.next_session_id += 1;
        events.push(InteractionEvent::Restarted);
    }
}

// ========================================================================
// TEST HELPERS
// ========================================================================

#[cfg(test)]
mod tests;
