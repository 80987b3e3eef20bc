// PracticeMenu - dwell-based practice file picker
//
// The menu occupies a band at the top of the frame with one row per file.
// Hovering the same row for longer than the dwell period selects it. Losing
// the fingertip, leaving the band or moving between rows restarts the dwell
// from zero.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info};

/// Height of the menu band from the top of the frame
pub const MENU_HEIGHT: i32 = 250;
const ROW_HEIGHT: i32 = 40;
const FIRST_ROW_TOP: i32 = 45;

#[derive(Debug, Clone)]
pub struct PracticeMenu {
    items: Vec<PathBuf>,
    dwell: Duration,
    hovered_index: Option<usize>,
    hover_start: Option<Instant>,
    selected: Option<usize>,
}

impl PracticeMenu {
    pub fn new(items: Vec<PathBuf>, dwell: Duration) -> Self {
        Self {
            items,
            dwell,
            hovered_index: None,
            hover_start: None,
            selected: None,
        }
    }

    /// Inclusive pixel rows `(top, bottom)` covered by item `index`.
    ///
    /// Adjacent rows share their boundary pixel; the earlier row wins.
    pub fn row_bounds(index: usize) -> (i32, i32) {
        let top = FIRST_ROW_TOP + ROW_HEIGHT * index as i32;
        (top, top + ROW_HEIGHT)
    }

    /// Feed the pointing fingertip for this frame
    ///
    /// # Arguments
    /// * `fingertip` - pixel `(x, y)` of the pointing finger, `None` if absent
    /// * `now` - frame timestamp
    ///
    /// # Returns
    /// The chosen file, once, on the frame the dwell completes
    pub fn update(&mut self, fingertip: Option<(i32, i32)>, now: Instant) -> Option<PathBuf> {
        if self.selected.is_some() {
            return None;
        }

        let Some((_, y)) = fingertip else {
            self.clear_hover();
            return None;
        };

        if y > MENU_HEIGHT {
            self.clear_hover();
            return None;
        }

        let Some(index) = self.row_at(y) else {
            self.clear_hover();
            return None;
        };

        match (self.hovered_index, self.hover_start) {
            (Some(current), Some(start)) if current == index => {
                if now.saturating_duration_since(start) > self.dwell {
                    self.selected = Some(index);
                    let path = self.items[index].clone();
                    info!("[PracticeMenu] Selected {:?}", path);
                    return Some(path);
                }
            }
            _ => {
                debug!("[PracticeMenu] Hovering item {}", index);
                self.hovered_index = Some(index);
                self.hover_start = Some(now);
            }
        }
        None
    }

    fn row_at(&self, y: i32) -> Option<usize> {
        (0..self.items.len()).find(|&i| {
            let (top, bottom) = Self::row_bounds(i);
            top <= y && y <= bottom
        })
    }

    fn clear_hover(&mut self) {
        self.hovered_index = None;
        self.hover_start = None;
    }

    pub fn items(&self) -> &[PathBuf] {
        &self.items
    }

    pub fn hovered_index(&self) -> Option<usize> {
        self.hovered_index
    }

    pub fn is_active(&self) -> bool {
        self.selected.is_none()
    }
}
