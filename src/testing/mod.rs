//! Synthetic hand and frame builders.
//!
//! Unit tests and, through the `testing` feature, integration tests use
//! these to produce deterministic landmark frames without a detector. All
//! timing goes through explicit `Instant`s so state machines can be driven
//! at any simulated rate.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::audio::NotePlayer;
use crate::keyboard::Note;
use crate::landmarks::{
    Frame, HandObservation, Handedness, Landmark, FINGERTIP_INDICES, LANDMARK_COUNT,
};

/// Default frame size used by the builders.
pub const FRAME_W: u32 = 640;
pub const FRAME_H: u32 = 480;

/// A hand with every landmark at the same normalized point.
pub fn flat_hand(handedness: Handedness, x: f32, y: f32) -> HandObservation {
    HandObservation::new(handedness, [Landmark::new(x, y, 0.0); LANDMARK_COUNT])
}

/// A hand with explicit normalized fingertip positions (thumb to pinky).
/// Non-tip landmarks sit below the fingertips' centroid.
pub fn hand_with_tips(handedness: Handedness, tips: [(f32, f32); 5]) -> HandObservation {
    let cx = tips.iter().map(|t| t.0).sum::<f32>() / 5.0;
    let cy = tips.iter().map(|t| t.1).sum::<f32>() / 5.0;
    let mut landmarks = [Landmark::new(cx, (cy + 0.1).min(1.0), 0.0); LANDMARK_COUNT];
    for (slot, &(x, y)) in FINGERTIP_INDICES.iter().zip(tips.iter()) {
        landmarks[*slot] = Landmark::new(x, y, 0.0);
    }
    HandObservation::new(handedness, landmarks)
}

/// Normalized coordinate landing on pixel `px` after truncation.
pub fn norm(px: i32, extent: u32) -> f32 {
    (px as f32 + 0.5) / extent as f32
}

/// A hand whose five fingertips all touch pixel `(px, py)`.
pub fn pointing_hand(handedness: Handedness, px: i32, py: i32) -> HandObservation {
    let p = (norm(px, FRAME_W), norm(py, FRAME_H));
    hand_with_tips(handedness, [p; 5])
}

/// Same as [`pointing_hand`] with a custom depth on every landmark.
pub fn pointing_hand_at_depth(handedness: Handedness, px: i32, py: i32, z: f32) -> HandObservation {
    let mut hand = pointing_hand(handedness, px, py);
    for lm in hand.landmarks.iter_mut() {
        lm.z = z;
    }
    hand
}

/// A hand spread flat with thumb and pinky tips `span_px` apart horizontally
/// and the index tip at `(index_x, y)`.
pub fn spread_hand(handedness: Handedness, index_x: i32, y: i32, span_px: i32) -> HandObservation {
    let ny = norm(y, FRAME_H);
    let thumb = (index_x - span_px / 2) as f32 / FRAME_W as f32;
    let pinky = (index_x - span_px / 2 + span_px) as f32 / FRAME_W as f32;
    let index = norm(index_x, FRAME_W);
    hand_with_tips(
        handedness,
        [(thumb, ny), (index, ny), (index, ny), (pinky, ny), (pinky, ny)],
    )
}

/// Builds a frame at `base + offset_ms` with the given hands.
pub fn frame_at(base: Instant, offset_ms: u64, hands: Vec<HandObservation>) -> Frame {
    Frame::from_hands(
        base + Duration::from_millis(offset_ms),
        FRAME_W,
        FRAME_H,
        hands,
    )
}

/// A frame at `base + offset_ms` with no hands.
pub fn empty_frame_at(base: Instant, offset_ms: u64) -> Frame {
    Frame::empty(base + Duration::from_millis(offset_ms), FRAME_W, FRAME_H)
}

/// Table line produced by [`calibration_frames`].
pub const SCRIPT_TABLE_Y: i32 = 400;
/// Anchor fingertip x produced by [`calibration_frames`].
pub const SCRIPT_ANCHOR_X: i32 = 320;
/// Key width produced by [`calibration_frames`] (300 px span / 5), wide
/// enough that a fingertip on one key center reaches no neighbour.
pub const SCRIPT_KEY_WIDTH: i32 = 60;
/// Offset of the first frame after [`calibration_frames`].
pub const SCRIPT_END_MS: u64 = 1700;

/// Frames taking a fresh engine through both calibration phases: a left
/// fingertip held on the table for 1.5 s, then a spread right hand.
pub fn calibration_frames(base: Instant) -> Vec<Frame> {
    let touch = pointing_hand(Handedness::Left, 200, SCRIPT_TABLE_Y);
    vec![
        frame_at(base, 0, vec![touch.clone()]),
        frame_at(base, 750, vec![touch.clone()]),
        frame_at(base, 1500, vec![touch]),
        frame_at(
            base,
            1600,
            vec![spread_hand(
                Handedness::Right,
                SCRIPT_ANCHOR_X,
                300,
                SCRIPT_KEY_WIDTH * 5,
            )],
        ),
    ]
}

/// Pixel center of `note`'s key after [`calibration_frames`].
pub fn script_key_center(note: Note) -> (i32, i32) {
    let half = (Note::COUNT / 2) as i32;
    (
        SCRIPT_ANCHOR_X + (note.index() as i32 - half) * SCRIPT_KEY_WIDTH,
        SCRIPT_TABLE_Y - 35,
    )
}

/// A hand whose fingertips all rest on `note`'s key after [`calibration_frames`].
pub fn hand_on_key(handedness: Handedness, note: Note) -> HandObservation {
    let (x, y) = script_key_center(note);
    pointing_hand(handedness, x, y)
}

/// A call received by [`SpyPlayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCall {
    Start(Note),
    Stop(Note),
}

/// Player that records every call. Clones share the same log, so a test can
/// keep one handle after boxing another into the engine.
#[derive(Debug, Clone, Default)]
pub struct SpyPlayer {
    calls: Arc<Mutex<Vec<PlayerCall>>>,
}

impl SpyPlayer {
    pub fn calls(&self) -> Vec<PlayerCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: PlayerCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl NotePlayer for SpyPlayer {
    fn start(&mut self, note: Note) {
        self.record(PlayerCall::Start(note));
    }

    fn stop(&mut self, note: Note) {
        self.record(PlayerCall::Stop(note));
    }
}
