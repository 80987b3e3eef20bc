// PracticeMatcher - sequence-order matching against a reference melody
//
// The cursor moves forward only when the expected note is among the notes
// pressed this frame. Timing, extra notes and wrong notes are ignored; there
// is no backtracking and no skipping.

use crate::keyboard::{Note, PressedNotes};

#[derive(Debug, Clone, PartialEq)]
pub struct PracticeMatcher {
    reference_notes: Vec<Note>,
    cursor: usize,
}

impl PracticeMatcher {
    pub fn new(reference_notes: Vec<Note>) -> Self {
        Self {
            reference_notes,
            cursor: 0,
        }
    }

    /// Advance past the expected note if it is currently pressed
    ///
    /// # Returns
    /// The matched note, which the caller should sound; `None` when the
    /// expected note is not pressed or the sequence is already complete.
    pub fn advance(&mut self, pressed: &PressedNotes) -> Option<Note> {
        let expected = self.expected()?;
        if !pressed.contains(&expected) {
            return None;
        }
        self.cursor += 1;
        Some(expected)
    }

    /// Next note the player has to hit
    pub fn expected(&self) -> Option<Note> {
        self.reference_notes.get(self.cursor).copied()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.reference_notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference_notes.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.reference_notes.len()
    }

    pub fn reference_notes(&self) -> &[Note] {
        &self.reference_notes
    }
}
