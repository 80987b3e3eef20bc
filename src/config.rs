//! Configuration management for interaction tuning
//!
//! This module provides runtime configuration loading from JSON files so
//! thresholds, dwell times and recording parameters can be adjusted without
//! recompiling. Every section falls back to the defaults the interaction was
//! tuned with when a field, section or the whole file is missing.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub calibration: CalibrationConfig,
    pub keyboard: KeyboardConfig,
    pub gestures: GestureConfig,
    pub recording: RecordingConfig,
    pub practice: PracticeConfig,
}

/// Table and key-width calibration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Seconds a fingertip must stay continuously visible to lock the table
    pub hold_secs: f64,
    /// Number of depth readings averaged by the smoother
    pub smoothing_window: usize,
    /// Thumb-to-pinky span is divided by this to get the key width
    pub span_divisor: u32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            hold_secs: 1.5,
            smoothing_window: 5,
            span_divisor: 5,
        }
    }
}

impl CalibrationConfig {
    pub fn hold(&self) -> Duration {
        seconds(self.hold_secs, 1.5)
    }
}

/// Keyboard geometry parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Fingertip-to-key-center distance below which a key is pressed
    pub hit_radius_px: f32,
    /// Key row sits this many pixels above the table line
    pub row_offset_px: i32,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            hit_radius_px: 45.0,
            row_offset_px: 35,
        }
    }
}

/// Gesture timing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Both hands must be absent this long before the exit menu appears
    pub exit_absence_secs: f64,
    /// Practice menu rows must be hovered strictly longer than this
    pub menu_dwell_secs: f64,
    /// How long the "RECORD MODE"/"PRACTICE MODE" banner stays up
    pub mode_banner_secs: f64,
    /// How long the song-completed banner stays up
    pub completion_banner_secs: f64,
    /// How long save and error status banners stay up
    pub status_banner_secs: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            exit_absence_secs: 3.0,
            menu_dwell_secs: 2.0,
            mode_banner_secs: 1.0,
            completion_banner_secs: 1.5,
            status_banner_secs: 0.5,
        }
    }
}

impl GestureConfig {
    pub fn exit_absence(&self) -> Duration {
        seconds(self.exit_absence_secs, 3.0)
    }

    pub fn menu_dwell(&self) -> Duration {
        seconds(self.menu_dwell_secs, 2.0)
    }

    pub fn mode_banner(&self) -> Duration {
        seconds(self.mode_banner_secs, 1.0)
    }

    pub fn completion_banner(&self) -> Duration {
        seconds(self.completion_banner_secs, 1.5)
    }

    pub fn status_banner(&self) -> Duration {
        seconds(self.status_banner_secs, 0.5)
    }
}

/// Config seconds as a `Duration`
///
/// Negative and NaN values clamp to zero. Values no `Duration` can hold
/// (infinite, overflowing) use `default_secs`.
fn seconds(secs: f64, default_secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.max(0.0))
        .unwrap_or_else(|_| Duration::from_secs_f64(default_secs))
}

/// Recording and MIDI export parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Directory recordings are written into (created if absent)
    pub output_dir: PathBuf,
    pub ticks_per_beat: u16,
    pub tempo_bpm: u32,
    /// Note-on velocity for recorded presses
    pub velocity: u8,
    /// General MIDI program written at the start of the track
    pub program: u8,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("records"),
            ticks_per_beat: 480,
            tempo_bpm: 120,
            velocity: 90,
            program: 0,
        }
    }
}

impl RecordingConfig {
    /// Ticks elapsing per wall-clock second at the configured tempo
    pub fn ticks_per_second(&self) -> f64 {
        self.ticks_per_beat as f64 * self.tempo_bpm as f64 / 60.0
    }

    /// Tempo as microseconds per quarter note, as stored in MIDI tempo events
    pub fn tempo_micros(&self) -> u32 {
        60_000_000 / self.tempo_bpm.max(1)
    }
}

/// Practice library parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeConfig {
    /// Directory scanned for `.mid` / `.midi` practice files
    pub library_dir: PathBuf,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            library_dir: PathBuf::from("audio"),
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults if the file doesn't exist
    /// or the JSON is invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        Self::load_from_file("air_piano.json")
    }
}
