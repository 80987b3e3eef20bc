use std::time::Instant;

use tracing::{debug, info};

use super::InteractionEngine;
use crate::error::{log_recording_error, ErrorCode, RecordingError};
use crate::events::InteractionEvent;
use crate::recording::{ExportJob, ExportOutcome};

impl InteractionEngine {
    // ========================================================================
    // RECORDING EXPORT
    // ========================================================================

    /// Hand the current recording to the export worker
    ///
    /// The recorder stays active until the worker reports success, so a
    /// failed write can be retried from the same button.
    pub(super) fn request_export(&mut self, now: Instant, events: &mut Vec<InteractionEvent>) {
        let status = self.config.gestures.status_banner();

        if self.exporter.as_ref().is_some_and(|w| w.is_busy()) {
            debug!("[InteractionEngine] Export already running, ignoring download");
            return;
        }

        let recorded = self.session.recorder.events().len();
        let Some(recording) = self.session.recorder.finalize(now) else {
            self.session.show_banner("Nothing to save", now, status);
            return;
        };
        if recording.is_empty() {
            info!("[InteractionEngine] Download with an empty recording, nothing saved");
            self.session.show_banner("Nothing recorded", now, status);
            return;
        }

        let event_count = recording.events.len();
        let job = ExportJob {
            recording,
            config: self.config.recording.clone(),
        };
        let submitted = match self.exporter.as_mut() {
            Some(worker) => worker.submit(job),
            None => Err(RecordingError::WorkerUnavailable),
        };

        match submitted {
            Ok(()) => {
                info!(
                    "[InteractionEngine] Exporting {} events to {:?}",
                    event_count, self.config.recording.output_dir
                );
                self.export_session = Some((self.session.id, recorded));
                self.session.show_banner("Saving...", now, status);
                events.push(InteractionEvent::ExportStarted {
                    events: event_count,
                });
            }
            Err(err) => self.export_failed(err, now, events),
        }
    }

    /// Apply a finished export, if any
    pub(super) fn poll_export(&mut self, now: Instant, events: &mut Vec<InteractionEvent>) {
        let Some(outcome) = self.exporter.as_mut().and_then(|w| w.poll()) else {
            return;
        };
        self.apply_export_outcome(outcome, now, events);
    }

    fn apply_export_outcome(
        &mut self,
        outcome: ExportOutcome,
        now: Instant,
        events: &mut Vec<InteractionEvent>,
    ) {
        let owner = self.export_session.take();
        match outcome {
            ExportOutcome::Saved(path) => {
                // A restart while exporting leaves the new session's recorder alone
                if let Some((id, recorded)) = owner {
                    if id == self.session.id {
                        self.session.recorder.mark_saved(recorded);
                    }
                }
                let path = path.display().to_string();
                self.session.show_banner(
                    format!("Saved: {}", path),
                    now,
                    self.config.gestures.status_banner(),
                );
                events.push(InteractionEvent::ExportFinished { path });
            }
            ExportOutcome::Failed(err) => self.export_failed(err, now, events),
        }
    }

    fn export_failed(
        &mut self,
        err: RecordingError,
        now: Instant,
        events: &mut Vec<InteractionEvent>,
    ) {
        log_recording_error(&err, "export");
        self.session.show_banner(
            format!("Save failed: {}", err.message()),
            now,
            self.config.gestures.status_banner(),
        );
        events.push(InteractionEvent::ExportFailed {
            code: err.code(),
            reason: err.message(),
        });
    }

    /// Block until a running export finishes and apply its outcome
    ///
    /// Called once the frame loop has stopped so the last recording is not
    /// lost when the process exits right after pressing download.
    pub fn flush_export(&mut self, now: Instant) -> Vec<InteractionEvent> {
        let mut events = Vec::new();
        if let Some(outcome) = self.exporter.as_mut().and_then(|w| w.wait()) {
            self.apply_export_outcome(outcome, now, &mut events);
        }
        events
    }
}
