// ExportWorker - off-loop MIDI export
//
// Encoding and writing a recording can stall on disk I/O, so it runs on a
// dedicated thread. The interaction loop submits a job and polls for the
// outcome once per frame; it never blocks on the worker. At most one export
// is in flight at a time.

use std::path::PathBuf;
use std::thread::JoinHandle;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, warn};

use crate::config::RecordingConfig;
use crate::error::RecordingError;
use crate::recording::midi::write_recording;
use crate::recording::recorder::FinishedRecording;

/// One recording to write
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub recording: FinishedRecording,
    pub config: RecordingConfig,
}

/// Result reported back to the interaction loop
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Saved(PathBuf),
    Failed(RecordingError),
}

pub struct ExportWorker {
    jobs: Option<mpsc::UnboundedSender<ExportJob>>,
    outcomes: mpsc::UnboundedReceiver<ExportOutcome>,
    in_flight: bool,
    handle: Option<JoinHandle<()>>,
}

impl ExportWorker {
    /// Spawn the export thread
    pub fn spawn() -> Result<Self, RecordingError> {
        let (job_tx, mut job_rx) = mpsc::unbounded_channel::<ExportJob>();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        let handle = std::thread::Builder::new()
            .name("air-piano-export".to_string())
            .spawn(move || {
                while let Some(job) = job_rx.blocking_recv() {
                    debug!(
                        "[ExportWorker] Writing {} events",
                        job.recording.events.len()
                    );
                    let outcome =
                        match write_recording(&job.recording, &job.config, &job.config.output_dir)
                        {
                            Ok(path) => ExportOutcome::Saved(path),
                            Err(err) => ExportOutcome::Failed(err),
                        };
                    if outcome_tx.send(outcome).is_err() {
                        break;
                    }
                }
                debug!("[ExportWorker] Job channel closed, exiting");
            })
            .map_err(|e| {
                warn!("[ExportWorker] Failed to spawn export thread: {}", e);
                RecordingError::WorkerUnavailable
            })?;

        Ok(Self {
            jobs: Some(job_tx),
            outcomes: outcome_rx,
            in_flight: false,
            handle: Some(handle),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Queue a recording for export
    ///
    /// # Returns
    /// * `Err(RecordingError::ExportInFlight)` - previous export not finished
    /// * `Err(RecordingError::WorkerUnavailable)` - worker thread gone
    pub fn submit(&mut self, job: ExportJob) -> Result<(), RecordingError> {
        if self.in_flight {
            return Err(RecordingError::ExportInFlight);
        }
        let jobs = self.jobs.as_ref().ok_or(RecordingError::WorkerUnavailable)?;
        jobs.send(job)
            .map_err(|_| RecordingError::WorkerUnavailable)?;
        self.in_flight = true;
        Ok(())
    }

    /// Non-blocking check for a finished export
    pub fn poll(&mut self) -> Option<ExportOutcome> {
        match self.outcomes.try_recv() {
            Ok(outcome) => {
                self.in_flight = false;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if self.in_flight {
                    self.in_flight = false;
                    Some(ExportOutcome::Failed(RecordingError::WorkerUnavailable))
                } else {
                    None
                }
            }
        }
    }

    /// Block until the in-flight export finishes
    ///
    /// For shutdown paths and tests only; the frame loop uses [`poll`](Self::poll).
    pub fn wait(&mut self) -> Option<ExportOutcome> {
        if !self.in_flight {
            return None;
        }
        self.in_flight = false;
        Some(
            self.outcomes
                .blocking_recv()
                .unwrap_or(ExportOutcome::Failed(RecordingError::WorkerUnavailable)),
        )
    }
}

impl Drop for ExportWorker {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl std::fmt::Debug for ExportWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportWorker")
            .field("in_flight", &self.in_flight)
            .finish()
    }
}
