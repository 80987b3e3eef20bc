//! Record / practice mode buttons.
//!
//! Selection is a single-frame touch with no dwell, unlike the practice
//! file picker which requires a sustained hover.

use serde::{Deserialize, Serialize};

use crate::landmarks::Fingertip;
use crate::zones::Rect;

const BUTTON_HEIGHT: i32 = 60;
const BUTTON_CENTER_Y: i32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Record,
    Practice,
}

impl Mode {
    pub fn banner(&self) -> &'static str {
        match self {
            Mode::Record => "RECORD MODE",
            Mode::Practice => "PRACTICE MODE",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModeSelector {
    buttons: Option<(Rect, Rect)>,
}

impl ModeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the two buttons side by side near the top of the frame, each a
    /// third of the frame wide: record centered at 1/4, practice at 3/4.
    pub fn build(&mut self, frame_width: u32) {
        let w = frame_width as i32;
        let btn_width = w / 3;
        let y1 = BUTTON_CENTER_Y - BUTTON_HEIGHT / 2;
        let y2 = BUTTON_CENTER_Y + BUTTON_HEIGHT / 2;

        let rx1 = w / 4 - btn_width / 2;
        let px1 = 3 * w / 4 - btn_width / 2;

        self.buttons = Some((
            Rect::new(rx1, y1, rx1 + btn_width, y2),
            Rect::new(px1, y1, px1 + btn_width, y2),
        ));
    }

    pub fn record_button(&self) -> Option<Rect> {
        self.buttons.map(|(record, _)| record)
    }

    pub fn practice_button(&self) -> Option<Rect> {
        self.buttons.map(|(_, practice)| practice)
    }

    /// The mode under the first fingertip (in iteration order) touching
    /// either button. Unbuilt buttons select nothing.
    pub fn check_pressed(&self, fingertips: &[Fingertip]) -> Option<Mode> {
        let (record, practice) = self.buttons?;
        for tip in fingertips {
            if record.contains_tip(tip) {
                return Some(Mode::Record);
            }
            if practice.contains_tip(tip) {
                return Some(Mode::Practice);
            }
        }
        None
    }

    pub fn reset(&mut self) {
        self.buttons = None;
    }
}
