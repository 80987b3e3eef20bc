//! "Both hands withdrawn" exit gesture.
//!
//! Taking both hands out of view for the absence period opens a menu with
//! restart and exit buttons. Any hand reappearing before then cancels the
//! countdown completely. Once open, the menu stays open until reset.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::landmarks::{Fingertip, Frame};
use crate::zones::Rect;

const BUTTON_WIDTH: i32 = 200;
const BUTTON_HEIGHT: i32 = 70;
const BUTTON_GAP: i32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitChoice {
    Restart,
    Exit,
}

#[derive(Debug, Clone)]
pub struct ExitGesture {
    absence: Duration,
    absent_since: Option<Instant>,
    visible: bool,
    restart_button: Rect,
    exit_button: Rect,
}

impl ExitGesture {
    pub fn new(absence: Duration) -> Self {
        Self {
            absence,
            absent_since: None,
            visible: false,
            restart_button: Rect::new(0, 0, -1, -1),
            exit_button: Rect::new(0, 0, -1, -1),
        }
    }

    /// Advance the debounce with this frame's hand presence.
    ///
    /// Returns `true` only on the frame the menu becomes visible.
    pub fn update(&mut self, frame: &Frame) -> bool {
        if self.visible {
            return false;
        }

        if !frame.both_hands_absent() {
            if self.absent_since.take().is_some() {
                debug!("[ExitGesture] Hand reappeared, countdown cancelled");
            }
            return false;
        }

        match self.absent_since {
            None => {
                self.absent_since = Some(frame.timestamp);
                false
            }
            Some(since) if frame.timestamp.saturating_duration_since(since) >= self.absence => {
                self.build(frame.width, frame.height);
                self.visible = true;
                info!("[ExitGesture] Both hands withdrawn, exit menu shown");
                true
            }
            Some(_) => false,
        }
    }

    /// Place restart (left) and exit (right) around the frame center.
    fn build(&mut self, frame_width: u32, frame_height: u32) {
        let cx = frame_width as i32 / 2;
        let cy = frame_height as i32 / 2;
        let y1 = cy - BUTTON_HEIGHT / 2;
        let y2 = cy + BUTTON_HEIGHT / 2;

        let restart_x2 = cx - BUTTON_GAP / 2;
        let exit_x1 = cx + BUTTON_GAP / 2;

        self.restart_button = Rect::new(restart_x2 - BUTTON_WIDTH, y1, restart_x2, y2);
        self.exit_button = Rect::new(exit_x1, y1, exit_x1 + BUTTON_WIDTH, y2);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn absent_since(&self) -> Option<Instant> {
        self.absent_since
    }

    pub fn buttons(&self) -> Option<(Rect, Rect)> {
        self.visible
            .then_some((self.restart_button, self.exit_button))
    }

    /// Whichever button contains a fingertip, restart checked first.
    pub fn check_pressed(&self, fingertips: &[Fingertip]) -> Option<ExitChoice> {
        if !self.visible {
            return None;
        }
        for tip in fingertips {
            if self.restart_button.contains_tip(tip) {
                return Some(ExitChoice::Restart);
            }
            if self.exit_button.contains_tip(tip) {
                return Some(ExitChoice::Exit);
            }
        }
        None
    }

    pub fn reset(&mut self) {
        self.absent_since = None;
        self.visible = false;
    }
}
