//! Practice mode: pick a MIDI file by dwell, then play its notes in order.

pub mod library;
pub mod matcher;
pub mod menu;

pub use library::PracticeLibrary;
pub use matcher::PracticeMatcher;
pub use menu::PracticeMenu;
