//! Hand-landmark observations and fingertip extraction.
//!
//! The external detector hands us, per video frame, zero to two hands of 21
//! normalized landmarks each. Everything downstream works in pixel space on
//! the five fingertips of each hand, so this module owns that conversion.
//!
//! A missing hand is `None`, never a zeroed landmark array.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Landmark indices of the 21-point hand model.
pub mod indices {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;
}

/// Number of landmarks per detected hand.
pub const LANDMARK_COUNT: usize = 21;

/// Fingertip landmarks used for hit-testing, thumb to pinky.
pub const FINGERTIP_INDICES: [usize; 5] = [
    indices::THUMB_TIP,
    indices::INDEX_TIP,
    indices::MIDDLE_TIP,
    indices::RING_TIP,
    indices::PINKY_TIP,
];

/// One normalized landmark: `x`, `y` in `[0, 1]` relative to the frame,
/// `z` relative depth (more negative is closer to the camera).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Pixel-space x, truncated toward zero.
    pub fn pixel_x(&self, frame_width: u32) -> i32 {
        (self.x * frame_width as f32) as i32
    }

    /// Pixel-space y, truncated toward zero.
    pub fn pixel_y(&self, frame_height: u32) -> i32 {
        (self.y * frame_height as f32) as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }
}

/// A single detected hand for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    pub handedness: Handedness,
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandObservation {
    pub fn new(handedness: Handedness, landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self {
            handedness,
            landmarks,
        }
    }

    pub fn landmark(&self, index: usize) -> &Landmark {
        &self.landmarks[index]
    }

    pub fn index_tip(&self) -> &Landmark {
        self.landmark(indices::INDEX_TIP)
    }

    /// Horizontal thumb-tip to pinky-tip distance in normalized units.
    pub fn thumb_pinky_span(&self) -> f32 {
        (self.landmark(indices::THUMB_TIP).x - self.landmark(indices::PINKY_TIP).x).abs()
    }

    fn push_fingertips(&self, frame_width: u32, frame_height: u32, out: &mut Vec<Fingertip>) {
        for &tip in FINGERTIP_INDICES.iter() {
            let lm = self.landmark(tip);
            out.push(Fingertip {
                x: lm.pixel_x(frame_width),
                y: lm.pixel_y(frame_height),
                z: lm.z,
            });
        }
    }
}

/// A fingertip in pixel space, keeping the raw relative depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fingertip {
    pub x: i32,
    pub y: i32,
    pub z: f32,
}

impl Fingertip {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Euclidean pixel distance to `(cx, cy)`.
    ///
    /// Computed in `f64`, so saturated coordinates from a wild landmark
    /// give a huge distance instead of overflowing.
    pub fn distance_to(&self, cx: i32, cy: i32) -> f32 {
        let dx = f64::from(self.x) - f64::from(cx);
        let dy = f64::from(self.y) - f64::from(cy);
        (dx * dx + dy * dy).sqrt() as f32
    }
}

/// Fingertips of both hands, left hand first, thumb to pinky. Yields 0-10 points.
pub fn extract_fingertips(
    left: Option<&HandObservation>,
    right: Option<&HandObservation>,
    frame_width: u32,
    frame_height: u32,
) -> Vec<Fingertip> {
    let mut fingertips = Vec::with_capacity(10);
    for hand in [left, right].into_iter().flatten() {
        hand.push_fingertips(frame_width, frame_height, &mut fingertips);
    }
    fingertips
}

/// Everything the interaction core sees of one captured video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub timestamp: Instant,
    pub width: u32,
    pub height: u32,
    pub left: Option<HandObservation>,
    pub right: Option<HandObservation>,
    /// Universal abort input (e.g. Escape) sampled with this frame.
    pub abort: bool,
}

impl Frame {
    /// A frame with no hands detected.
    pub fn empty(timestamp: Instant, width: u32, height: u32) -> Self {
        Self {
            timestamp,
            width,
            height,
            left: None,
            right: None,
            abort: false,
        }
    }

    /// Sort detector output into left/right slots by handedness tag.
    /// A later hand with the same tag replaces an earlier one.
    pub fn from_hands<I>(timestamp: Instant, width: u32, height: u32, hands: I) -> Self
    where
        I: IntoIterator<Item = HandObservation>,
    {
        let mut frame = Self::empty(timestamp, width, height);
        for hand in hands {
            match hand.handedness {
                Handedness::Left => frame.left = Some(hand),
                Handedness::Right => frame.right = Some(hand),
            }
        }
        frame
    }

    pub fn with_abort(mut self) -> Self {
        self.abort = true;
        self
    }

    pub fn both_hands_absent(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn fingertips(&self) -> Vec<Fingertip> {
        extract_fingertips(self.left.as_ref(), self.right.as_ref(), self.width, self.height)
    }
}

/// Serializable frame as captured to a JSON-lines replay file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Milliseconds since the start of the capture.
    pub t_ms: u64,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub hands: Vec<HandObservation>,
    #[serde(default)]
    pub abort: bool,
}

impl RecordedFrame {
    pub fn into_frame(self, base: Instant) -> Frame {
        let mut frame = Frame::from_hands(
            base + Duration::from_millis(self.t_ms),
            self.width,
            self.height,
            self.hands,
        );
        frame.abort = self.abort;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{flat_hand, hand_with_tips};

    #[test]
    fn test_fingertips_left_hand_first() {
        let left = flat_hand(Handedness::Left, 0.25, 0.5);
        let right = flat_hand(Handedness::Right, 0.75, 0.5);

        let tips = extract_fingertips(Some(&left), Some(&right), 640, 480);

        assert_eq!(tips.len(), 10);
        assert!(tips[..5].iter().all(|t| t.x < 320));
        assert!(tips[5..].iter().all(|t| t.x > 320));
    }

    #[test]
    fn test_distance_between_extreme_coordinates() {
        let tip = Fingertip::new(i32::MAX, i32::MIN);
        let d = tip.distance_to(i32::MIN, i32::MAX);
        assert!(d.is_finite());
        assert!(d > 1.0e9);
        assert_eq!(Fingertip::new(3, 4).distance_to(0, 0), 5.0);
    }

    #[test]
    fn test_no_hands_no_fingertips() {
        assert!(extract_fingertips(None, None, 640, 480).is_empty());
    }

    #[test]
    fn test_pixel_conversion_truncates() {
        let tips = [(0.5, 0.5); 5];
        let hand = hand_with_tips(Handedness::Right, tips);
        let out = extract_fingertips(None, Some(&hand), 641, 481);
        assert_eq!(out[0].x, 320);
        assert_eq!(out[0].y, 240);
    }

    #[test]
    fn test_thumb_pinky_span() {
        let hand = hand_with_tips(
            Handedness::Left,
            [(0.2, 0.5), (0.3, 0.5), (0.35, 0.5), (0.4, 0.5), (0.5, 0.5)],
        );
        assert!((hand.thumb_pinky_span() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_from_hands_sorts_by_handedness() {
        let now = Instant::now();
        let frame = Frame::from_hands(
            now,
            640,
            480,
            vec![
                flat_hand(Handedness::Right, 0.7, 0.5),
                flat_hand(Handedness::Left, 0.3, 0.5),
            ],
        );
        assert!(frame.left.is_some());
        assert!(frame.right.is_some());
        assert!(!frame.both_hands_absent());
    }

    #[test]
    fn test_recorded_frame_offsets_timestamp() {
        let base = Instant::now();
        let recorded: RecordedFrame =
            serde_json::from_str(r#"{"t_ms": 1500, "width": 640, "height": 480}"#).unwrap();
        let frame = recorded.into_frame(base);
        assert_eq!(frame.timestamp - base, Duration::from_millis(1500));
        assert!(frame.both_hands_absent());
        assert!(!frame.abort);
    }

    #[test]
    fn test_fingertip_distance() {
        let tip = Fingertip::new(3, 4);
        assert_eq!(tip.distance_to(0, 0), 5.0);
    }
}
