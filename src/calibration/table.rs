// TableCalibrator - table plane detection
//
// The table is located by asking the player to rest a fingertip on it. Once
// an index fingertip has been continuously visible for the hold period, its
// pixel height becomes the table line and its smoothed depth becomes the
// table depth reference.
//
// State machine: UNCALIBRATED -> ARMED(hold timer running) -> LOCKED
//
// Any frame without a hand drops the timer back to UNCALIBRATED; there is no
// partial credit. LOCKED is permanent until reset() (restart gesture).

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::CalibrationConfig;
use crate::landmarks::{Frame, Handedness, Landmark};
use crate::smoothing::LandmarkSmoother;

/// Locked table plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableCalibration {
    /// Pixel row of the table surface
    pub y_pixel: i32,
    /// Smoothed fingertip depth at lock time
    pub z_reference: f32,
}

/// Observable calibrator state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TablePhase {
    Uncalibrated,
    Armed { since: Instant },
    Locked(TableCalibration),
}

/// TableCalibrator locks the table plane from a sustained fingertip hold
#[derive(Debug, Clone)]
pub struct TableCalibrator {
    hold: Duration,
    hold_started: Option<Instant>,
    left_z: LandmarkSmoother,
    right_z: LandmarkSmoother,
    locked: Option<TableCalibration>,
}

impl TableCalibrator {
    /// Create an unlocked calibrator
    ///
    /// # Arguments
    /// * `config` - Hold duration and smoothing window
    pub fn new(config: &CalibrationConfig) -> Self {
        Self {
            hold: config.hold(),
            hold_started: None,
            left_z: LandmarkSmoother::new(config.smoothing_window),
            right_z: LandmarkSmoother::new(config.smoothing_window),
            locked: None,
        }
    }

    /// Feed one frame into the calibration state machine
    ///
    /// When both hands are present the left index fingertip is used.
    ///
    /// # Returns
    /// * `Some(TableCalibration)` - only on the frame that locks the table
    /// * `None` - still calibrating, or already locked
    pub fn update(&mut self, frame: &Frame) -> Option<TableCalibration> {
        if self.locked.is_some() {
            return None;
        }

        let (side, fingertip): (Handedness, Landmark) =
            match (frame.left.as_ref(), frame.right.as_ref()) {
                (Some(left), _) => (Handedness::Left, *left.index_tip()),
                (None, Some(right)) => (Handedness::Right, *right.index_tip()),
                (None, None) => {
                    if self.hold_started.take().is_some() {
                        debug!("[TableCalibrator] Tracking lost, hold timer reset");
                    }
                    return None;
                }
            };

        let z_smooth = match side {
            Handedness::Left => self.left_z.smooth(fingertip.z),
            Handedness::Right => self.right_z.smooth(fingertip.z),
        };

        let started = match self.hold_started {
            Some(started) => started,
            None => {
                debug!("[TableCalibrator] {} fingertip detected, hold timer started", side.as_str());
                self.hold_started = Some(frame.timestamp);
                return None;
            }
        };

        if frame.timestamp.saturating_duration_since(started) < self.hold {
            return None;
        }

        let calibration = TableCalibration {
            y_pixel: fingertip.pixel_y(frame.height),
            z_reference: z_smooth,
        };
        info!(
            "[TableCalibrator] Table locked at y={}px, z_ref={:.4}",
            calibration.y_pixel, calibration.z_reference
        );
        self.locked = Some(calibration);
        self.hold_started = None;
        Some(calibration)
    }

    pub fn phase(&self) -> TablePhase {
        match (self.locked, self.hold_started) {
            (Some(calibration), _) => TablePhase::Locked(calibration),
            (None, Some(since)) => TablePhase::Armed { since },
            (None, None) => TablePhase::Uncalibrated,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }

    pub fn calibration(&self) -> Option<TableCalibration> {
        self.locked
    }

    /// Unlock and clear the hold timer and smoothing history
    pub fn reset(&mut self) {
        self.locked = None;
        self.hold_started = None;
        self.left_z.clear();
        self.right_z.clear();
    }
}
