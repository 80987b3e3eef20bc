//! Per-session interaction state.
//!
//! Everything a restart must wipe lives in [`SessionContext`]: the table
//! calibration, the keyboard layout, the chosen mode, the exit gesture, the
//! recording and the practice progress. Restarting builds a new context
//! instead of resetting fields one by one, so nothing from the previous
//! session can leak into the next.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::calibration::{AnchorHand, TableCalibrator};
use crate::config::AppConfig;
use crate::events::BannerView;
use crate::keyboard::KeyboardLayout;
use crate::practice::{PracticeMatcher, PracticeMenu};
use crate::recording::SessionRecorder;
use crate::zones::{DownloadButton, ExitGesture, Mode, ModeSelector};

/// Where the interaction currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Phase {
    CalibratingTable,
    CalibratingKeys,
    SelectingMode,
    ChoosingPracticeFile,
    Playing { mode: Mode },
}

impl Phase {
    /// Standing instruction shown while in this phase
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            Phase::CalibratingTable => {
                Some("Please keep fingertip touching table for calibration.")
            }
            Phase::CalibratingKeys => Some("Step 2: Show your hand to calibrate key width."),
            Phase::SelectingMode => Some("Please select a mode: Record or Practice."),
            Phase::ChoosingPracticeFile => Some("Select MIDI File:"),
            Phase::Playing { .. } => None,
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        match self {
            Phase::Playing { mode } => Some(*mode),
            _ => None,
        }
    }
}

/// Status text that disappears on its own
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub expires_at: Instant,
}

impl Banner {
    pub fn new(text: impl Into<String>, now: Instant, lifetime: Duration) -> Self {
        Self {
            text: text.into(),
            expires_at: now + lifetime,
        }
    }

    pub fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    pub fn view(&self, now: Instant) -> BannerView {
        BannerView {
            text: self.text.clone(),
            remaining_ms: self.expires_at.saturating_duration_since(now).as_millis() as u64,
        }
    }
}

/// A chosen practice file and the progress through it
#[derive(Debug, Clone)]
pub struct ActivePractice {
    pub path: PathBuf,
    pub matcher: PracticeMatcher,
}

/// The single resettable aggregate of interaction state
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Distinguishes sessions across restarts
    pub id: u64,
    pub phase: Phase,
    pub table: TableCalibrator,
    pub anchor: Option<AnchorHand>,
    pub key_width: Option<i32>,
    pub layout: KeyboardLayout,
    pub mode_selector: ModeSelector,
    pub exit: ExitGesture,
    pub download: DownloadButton,
    /// A fingertip was on the download button last frame
    pub download_hovered: bool,
    pub recorder: SessionRecorder,
    pub menu: Option<PracticeMenu>,
    pub practice: Option<ActivePractice>,
    pub banner: Option<Banner>,
}

impl SessionContext {
    pub fn new(config: &AppConfig, id: u64) -> Self {
        Self {
            id,
            phase: Phase::CalibratingTable,
            table: TableCalibrator::new(&config.calibration),
            anchor: None,
            key_width: None,
            layout: KeyboardLayout::new(&config.keyboard),
            mode_selector: ModeSelector::new(),
            exit: ExitGesture::new(config.gestures.exit_absence()),
            download: DownloadButton::new(),
            download_hovered: false,
            recorder: SessionRecorder::new(&config.recording),
            menu: None,
            practice: None,
            banner: None,
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        self.phase.mode()
    }

    pub fn show_banner(&mut self, text: impl Into<String>, now: Instant, lifetime: Duration) {
        self.banner = Some(Banner::new(text, now, lifetime));
    }

    /// Current banner, dropping it once expired
    pub fn live_banner(&mut self, now: Instant) -> Option<BannerView> {
        if self.banner.as_ref().is_some_and(|b| !b.is_live(now)) {
            self.banner = None;
        }
        self.banner.as_ref().map(|b| b.view(now))
    }

    /// Leave play for mode selection, keeping calibration and layout
    pub fn return_to_mode_selection(&mut self) {
        self.phase = Phase::SelectingMode;
        self.menu = None;
        self.practice = None;
        self.exit.reset();
        self.download.reset();
        self.download_hovered = false;
    }
}
