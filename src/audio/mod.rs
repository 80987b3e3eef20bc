//! Note playback seam and voice bookkeeping.
//!
//! Sound output belongs to a platform backend behind [`NotePlayer`]; the
//! interaction core only decides when each note starts and stops.

pub mod player;
pub mod voices;

pub use player::{LogPlayer, NotePlayer};
pub use voices::{VoiceChanges, VoiceTracker};
