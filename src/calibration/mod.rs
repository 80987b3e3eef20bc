// Calibration module - two-phase keyboard calibration
//
// This module provides the two calibration steps that precede play:
// 1. TableCalibrator: locks the table plane from a sustained fingertip hold
// 2. hand_span: picks the anchor hand and derives the key width from its span
//
// The calibration workflow:
// 1. Rest a fingertip on the table until the table line locks
// 2. Show a hand; its index fingertip centers the keyboard
// 3. The keyboard layout is built once from table line, anchor and key width

pub mod hand_span;
pub mod table;

pub use hand_span::{dominant_hand, find_anchor, key_width_from_span, AnchorHand};
pub use table::{TableCalibration, TableCalibrator, TablePhase};
