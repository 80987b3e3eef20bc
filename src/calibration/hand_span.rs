// Key-width calibration from the player's hand span
//
// After the table is locked, the hand with the widest thumb-to-pinky spread
// anchors the keyboard: its index fingertip gives the horizontal center and
// its span (divided by five) gives the key pitch.

use tracing::warn;

use crate::error::CalibrationError;
use crate::landmarks::{Frame, HandObservation, Handedness};

/// Hand chosen to anchor the keyboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorHand {
    pub side: Handedness,
    /// Pixel x of the anchor hand's index fingertip
    pub anchor_x: i32,
    /// Horizontal thumb-to-pinky span in pixels
    pub span_px: f32,
}

impl AnchorHand {
    /// Derive the key width for this hand
    ///
    /// # Returns
    /// * `Ok(width)` - key width in whole pixels
    /// * `Err(CalibrationError::DegenerateKeyWidth)` - span too narrow
    pub fn key_width(&self, span_divisor: u32) -> Result<i32, CalibrationError> {
        let width = key_width_from_span(self.span_px, span_divisor);
        if width < 1 {
            return Err(CalibrationError::DegenerateKeyWidth {
                span_px: self.span_px,
            });
        }
        Ok(width)
    }
}

/// Key width in whole pixels: `trunc(span_px / divisor)`
pub fn key_width_from_span(span_px: f32, divisor: u32) -> i32 {
    (span_px / divisor.max(1) as f32) as i32
}

/// Pick which hand anchors the keyboard
///
/// A lone hand is always chosen. With both hands present the wider normalized
/// span wins; equal spans go to the right hand.
pub fn dominant_hand(
    left: Option<&HandObservation>,
    right: Option<&HandObservation>,
) -> Option<Handedness> {
    match (left, right) {
        (None, None) => None,
        (Some(_), None) => Some(Handedness::Left),
        (None, Some(_)) => Some(Handedness::Right),
        (Some(l), Some(r)) => {
            if l.thumb_pinky_span() > r.thumb_pinky_span() {
                Some(Handedness::Left)
            } else {
                Some(Handedness::Right)
            }
        }
    }
}

/// Locate the anchor hand in a frame
///
/// # Returns
/// * `Ok(AnchorHand)` - anchor position and span
/// * `Err(CalibrationError::NoAnchorHand)` - no hand in this frame
pub fn find_anchor(frame: &Frame) -> Result<AnchorHand, CalibrationError> {
    let side = dominant_hand(frame.left.as_ref(), frame.right.as_ref())
        .ok_or(CalibrationError::NoAnchorHand)?;
    let hand = match side {
        Handedness::Left => frame.left.as_ref(),
        Handedness::Right => frame.right.as_ref(),
    }
    .ok_or(CalibrationError::NoAnchorHand)?;

    let span_px = hand.thumb_pinky_span() * frame.width as f32;
    if span_px < 1.0 {
        warn!(
            "[HandSpan] {} hand span {:.2}px, hand probably edge-on to camera",
            side.as_str(),
            span_px
        );
    }

    Ok(AnchorHand {
        side,
        anchor_x: hand.index_tip().pixel_x(frame.width),
        span_px,
    })
}
