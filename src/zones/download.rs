//! "Download MIDI" trigger shown with the exit menu in record mode.

use crate::landmarks::Fingertip;
use crate::zones::Rect;

const BUTTON_WIDTH: i32 = 220;
const BUTTON_HEIGHT: i32 = 80;

#[derive(Debug, Clone, Default)]
pub struct DownloadButton {
    rect: Option<Rect>,
}

impl DownloadButton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Centered horizontally, three quarters of the way down the frame.
    pub fn build(&mut self, frame_width: u32, frame_height: u32) {
        let cx = frame_width as i32 / 2;
        let cy = (frame_height as f32 * 0.75) as i32;
        self.rect = Some(Rect::centered(cx, cy, BUTTON_WIDTH, BUTTON_HEIGHT));
    }

    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    pub fn check_pressed(&self, fingertips: &[Fingertip]) -> bool {
        match self.rect {
            Some(rect) => fingertips.iter().any(|tip| rect.contains_tip(tip)),
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.rect = None;
    }
}
