//! Engine module housing the frame-driven interaction core.
//!
//! `core` holds [`InteractionEngine`] and its per-phase handlers; `source`
//! defines where frames come from and the loop that drives the engine.

pub mod core;
pub mod source;

pub use core::InteractionEngine;
pub use source::{FrameSource, RunSummary, StopReason};
