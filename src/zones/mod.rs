//! Rectangular gesture zones: mode buttons, exit menu and download trigger.
//!
//! All zones are axis-aligned pixel rectangles derived from the current
//! frame size. A fingertip selects a zone by being inside it on any edge
//! inclusive; only the practice menu needs a dwell.

pub mod download;
pub mod exit;
pub mod mode_selector;

use serde::{Deserialize, Serialize};

use crate::landmarks::Fingertip;

pub use download::DownloadButton;
pub use exit::{ExitChoice, ExitGesture};
pub use mode_selector::{Mode, ModeSelector};

/// Axis-aligned pixel rectangle, inclusive on all four edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Rectangle of `width` x `height` centered on `(cx, cy)`.
    pub fn centered(cx: i32, cy: i32, width: i32, height: i32) -> Self {
        Self::new(
            cx.saturating_sub(width / 2),
            cy.saturating_sub(height / 2),
            cx.saturating_add(width / 2),
            cy.saturating_add(height / 2),
        )
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }

    pub fn contains_tip(&self, tip: &Fingertip) -> bool {
        self.contains(tip.x, tip.y)
    }

    pub fn center(&self) -> (i32, i32) {
        (
            ((i64::from(self.x1) + i64::from(self.x2)) / 2) as i32,
            ((i64::from(self.y1) + i64::from(self.y2)) / 2) as i32,
        )
    }
}
