//! Virtual keyboard: the note scale and the hit-zone layout.

pub mod layout;
pub mod notes;

pub use layout::{KeyDefinition, KeyboardLayout, PressedNotes};
pub use notes::Note;
