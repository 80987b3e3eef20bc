//! Frame sources and the cooperative frame loop.

use std::time::Instant;

use tracing::info;

use crate::engine::InteractionEngine;
use crate::events::FrameReport;
use crate::landmarks::Frame;

/// Trait implemented by anything that yields landmark frames.
///
/// `None` means the source is exhausted (camera closed, replay finished).
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<Frame>;
}

impl<I> FrameSource for I
where
    I: Iterator<Item = Frame>,
{
    fn next_frame(&mut self) -> Option<Frame> {
        self.next()
    }
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    SourceExhausted,
    Finished,
}

/// Summary of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: usize,
    pub reason: StopReason,
}

impl InteractionEngine {
    /// Pull frames until the source runs dry or the interaction finishes
    ///
    /// # Arguments
    /// * `source` - Frame producer, polled once per iteration
    /// * `on_report` - Receives every frame's report (rendering, logging)
    pub fn run<S, F>(&mut self, source: &mut S, mut on_report: F) -> RunSummary
    where
        S: FrameSource + ?Sized,
        F: FnMut(&FrameReport),
    {
        let mut frames = 0;
        let mut last_timestamp = None;

        let reason = loop {
            let Some(frame) = source.next_frame() else {
                break StopReason::SourceExhausted;
            };
            frames += 1;
            last_timestamp = Some(frame.timestamp);

            let report = self.process_frame(&frame);
            on_report(&report);
            if report.finished {
                break StopReason::Finished;
            }
        };

        let now = last_timestamp.unwrap_or_else(Instant::now);
        for event in self.flush_export(now) {
            info!("[InteractionEngine] After loop end: {:?}", event);
        }

        info!(
            "[InteractionEngine] Loop stopped after {} frames: {:?}",
            frames, reason
        );
        RunSummary { frames, reason }
    }
}
