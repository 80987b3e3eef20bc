//! Keyboard layout and per-frame hit-testing.
//!
//! The layout is a row of circular hit-zones, one per [`Note`], centered on
//! the anchor fingertip and spaced one key width apart just above the table
//! line. It is built once per calibration cycle and never reordered.
//!
//! Hit-testing recomputes the pressed set from raw fingertips every call and
//! carries no state between frames; callers diff consecutive results.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::KeyboardConfig;
use crate::error::CalibrationError;
use crate::keyboard::notes::Note;
use crate::landmarks::Fingertip;

/// Notes currently satisfying the hit-test, in keyboard order.
pub type PressedNotes = BTreeSet<Note>;

/// One key's hit-zone center in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDefinition {
    pub note: Note,
    pub center_x: i32,
    pub center_y: i32,
}

#[derive(Debug, Clone)]
pub struct KeyboardLayout {
    hit_radius: f32,
    row_offset: i32,
    keys: Option<Vec<KeyDefinition>>,
}

impl KeyboardLayout {
    /// An unbuilt layout; hit-testing fails until [`build`](Self::build).
    pub fn new(config: &KeyboardConfig) -> Self {
        Self {
            hit_radius: config.hit_radius_px,
            row_offset: config.row_offset_px,
            keys: None,
        }
    }

    /// Lay out every note around `anchor_x`, `row_offset` pixels above `table_y`.
    ///
    /// Note `i` lands at `anchor_x + (i - COUNT / 2) * key_width`, so the
    /// middle note sits exactly on the anchor.
    pub fn build(
        &mut self,
        frame_width: u32,
        table_y: i32,
        anchor_x: i32,
        key_width: i32,
    ) -> &[KeyDefinition] {
        let half = (Note::COUNT / 2) as i32;
        let center_y = table_y.saturating_sub(self.row_offset);

        let keys: Vec<KeyDefinition> = Note::ALL
            .iter()
            .enumerate()
            .map(|(i, &note)| KeyDefinition {
                note,
                center_x: anchor_x.saturating_add((i as i32 - half).saturating_mul(key_width)),
                center_y,
            })
            .collect();

        let off_screen = keys
            .iter()
            .filter(|k| k.center_x < 0 || k.center_x >= frame_width as i32)
            .count();
        if off_screen > 0 {
            warn!(
                "[KeyboardLayout] {} of {} keys fall outside the {}px frame",
                off_screen,
                keys.len(),
                frame_width
            );
        }
        info!(
            "[KeyboardLayout] Built {} keys: anchor_x={}, key_width={}, row_y={}",
            keys.len(),
            anchor_x,
            key_width,
            center_y
        );

        self.keys.insert(keys)
    }

    pub fn is_ready(&self) -> bool {
        self.keys.is_some()
    }

    pub fn keys(&self) -> Result<&[KeyDefinition], CalibrationError> {
        self.keys.as_deref().ok_or(CalibrationError::LayoutNotReady)
    }

    pub fn key(&self, note: Note) -> Option<&KeyDefinition> {
        self.keys.as_ref()?.get(note.index())
    }

    pub fn hit_radius(&self) -> f32 {
        self.hit_radius
    }

    /// Every note with a fingertip strictly inside its hit radius.
    ///
    /// # Returns
    /// * `Ok(PressedNotes)` - possibly empty
    /// * `Err(CalibrationError::LayoutNotReady)` - layout not built yet
    pub fn check_pressed(&self, fingertips: &[Fingertip]) -> Result<PressedNotes, CalibrationError> {
        let keys = self.keys()?;
        let mut pressed = PressedNotes::new();
        for tip in fingertips {
            for key in keys {
                if tip.distance_to(key.center_x, key.center_y) < self.hit_radius {
                    pressed.insert(key.note);
                }
            }
        }
        Ok(pressed)
    }

    /// Discard the built layout
    pub fn reset(&mut self) {
        self.keys = None;
    }
}
