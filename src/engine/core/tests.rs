use super::*;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::keyboard::Note;
use crate::landmarks::Handedness;
use crate::recording::{encode_recording, FinishedRecording, NoteEvent, NoteEventKind};
use crate::testing::{
    calibration_frames, empty_frame_at, frame_at, hand_on_key, pointing_hand, PlayerCall,
    SpyPlayer, SCRIPT_END_MS, SCRIPT_KEY_WIDTH,
};

struct Harness {
    engine: InteractionEngine,
    spy: SpyPlayer,
    base: Instant,
}

impl Harness {
    fn new(config: AppConfig) -> Self {
        let spy = SpyPlayer::default();
        Self {
            engine: InteractionEngine::new(config, Box::new(spy.clone())),
            spy,
            base: Instant::now(),
        }
    }

    fn calibrated(config: AppConfig) -> Self {
        let mut harness = Self::new(config);
        for frame in calibration_frames(harness.base) {
            harness.engine.process_frame(&frame);
        }
        harness
    }

    fn step(&mut self, ms: u64, hands: Vec<crate::landmarks::HandObservation>) -> FrameReport {
        let frame = frame_at(self.base, ms, hands);
        self.engine.process_frame(&frame)
    }

    fn empty(&mut self, ms: u64) -> FrameReport {
        let frame = empty_frame_at(self.base, ms);
        self.engine.process_frame(&frame)
    }

    /// Both hands away long enough to open the exit menu
    fn open_exit_menu(&mut self, from_ms: u64) -> u64 {
        self.empty(from_ms);
        let report = self.empty(from_ms + 3000);
        assert!(report.exit_menu_visible);
        from_ms + 3000
    }
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("air_piano_engine_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn config_with_dirs(name: &str) -> (AppConfig, PathBuf) {
    let root = temp_dir(name);
    let mut config = AppConfig::default();
    config.recording.output_dir = root.join("records");
    config.practice.library_dir = root.join("audio");
    (config, root)
}

fn write_song(dir: &std::path::Path, name: &str, notes: &[Note]) {
    fs::create_dir_all(dir).unwrap();
    let recording = FinishedRecording {
        events: notes
            .iter()
            .map(|&note| NoteEvent {
                note,
                kind: NoteEventKind::On,
                delta_ticks: 240,
            })
            .collect(),
    };
    let bytes = encode_recording(&recording, &Default::default()).unwrap();
    fs::write(dir.join(name), bytes).unwrap();
}

#[test]
fn test_calibration_reaches_mode_selection() {
    let mut harness = Harness::new(AppConfig::default());
    let reports: Vec<FrameReport> = calibration_frames(harness.base)
        .iter()
        .map(|f| harness.engine.process_frame(f))
        .collect();

    assert_eq!(reports[0].phase, Phase::CalibratingTable);
    assert!(reports[2].events.contains(&InteractionEvent::TableLocked {
        y_pixel: 400,
        z_reference: 0.0
    }));
    assert_eq!(reports[2].phase, Phase::CalibratingKeys);
    assert!(reports[3].events.contains(&InteractionEvent::KeyboardBuilt {
        anchor: Handedness::Right,
        anchor_x: 320,
        key_width: SCRIPT_KEY_WIDTH
    }));
    assert_eq!(reports[3].phase, Phase::SelectingMode);

    let key = harness.engine.session().layout.key(Note::C4).copied().unwrap();
    assert_eq!((key.center_x, key.center_y), (320, 365));
}

#[test]
fn test_zero_span_hand_rejected_and_waits() {
    let mut harness = Harness::new(AppConfig::default());
    let frames = calibration_frames(harness.base);
    for frame in &frames[..3] {
        harness.engine.process_frame(frame);
    }

    let report = harness.step(1600, vec![pointing_hand(Handedness::Right, 320, 300)]);
    assert!(report.has_event(|e| matches!(e, InteractionEvent::CalibrationRejected { code: 1003, .. })));
    assert_eq!(report.phase, Phase::CalibratingKeys);

    let report = harness.engine.process_frame(&frames[3]);
    assert_eq!(report.phase, Phase::SelectingMode);
}

#[test]
fn test_record_mode_sounds_and_records_notes() {
    let mut harness = Harness::calibrated(AppConfig::default());
    let t = SCRIPT_END_MS;

    let report = harness.step(t, vec![pointing_hand(Handedness::Right, 100, 80)]);
    assert_eq!(report.phase, Phase::Playing { mode: Mode::Record });
    assert_eq!(report.banner.as_ref().map(|b| b.text.as_str()), Some("RECORD MODE"));

    let report = harness.step(t + 500, vec![hand_on_key(Handedness::Right, Note::E4)]);
    assert_eq!(report.pressed, vec![Note::E4]);
    assert!(report.events.contains(&InteractionEvent::NoteStarted { note: Note::E4 }));

    let report = harness.step(t + 1000, vec![pointing_hand(Handedness::Right, 600, 200)]);
    assert!(report.pressed.is_empty());
    assert!(report.events.contains(&InteractionEvent::NoteStopped { note: Note::E4 }));

    let events = harness.engine.session().recorder.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].delta_ticks, 480);
    assert_eq!(events[1].delta_ticks, 480);
    assert_eq!(
        harness.spy.calls(),
        vec![PlayerCall::Start(Note::E4), PlayerCall::Stop(Note::E4)]
    );
}

#[test]
fn test_restart_discards_every_piece_of_session_state() {
    let mut harness = Harness::calibrated(AppConfig::default());
    let t = SCRIPT_END_MS;
    harness.step(t, vec![pointing_hand(Handedness::Right, 100, 80)]);
    harness.step(t + 100, vec![hand_on_key(Handedness::Left, Note::C4)]);

    let t = harness.open_exit_menu(t + 200);
    let report = harness.step(t + 100, vec![pointing_hand(Handedness::Right, 100, 240)]);

    assert!(report.events.contains(&InteractionEvent::Restarted));
    assert_eq!(report.phase, Phase::CalibratingTable);
    assert!(report.pressed.is_empty());
    assert!(!report.exit_menu_visible);

    let session = harness.engine.session();
    assert!(!session.table.is_locked());
    assert!(!session.layout.is_ready());
    assert!(session.mode().is_none());
    assert!(!session.recorder.is_active());
    assert!(session.recorder.events().is_empty());
    assert!(harness.engine.voices().sounding().is_empty());
    assert!(!harness.engine.is_finished());
}

#[test]
fn test_exit_button_finishes_and_silences() {
    let mut harness = Harness::calibrated(AppConfig::default());
    let t = SCRIPT_END_MS;
    harness.step(t, vec![pointing_hand(Handedness::Right, 100, 80)]);
    let t = harness.open_exit_menu(t + 100);

    // Left hand holds a key while the right touches exit
    let report = harness.step(
        t + 100,
        vec![
            hand_on_key(Handedness::Left, Note::D4),
            pointing_hand(Handedness::Right, 500, 240),
        ],
    );
    assert!(report.events.contains(&InteractionEvent::Exited));
    assert!(report.finished);
    assert!(harness.engine.voices().sounding().is_empty());
    assert_eq!(harness.spy.calls().last(), Some(&PlayerCall::Stop(Note::D4)));

    let after = harness.step(t + 200, vec![hand_on_key(Handedness::Left, Note::D4)]);
    assert!(after.events.is_empty());
    assert!(after.pressed.is_empty());
}

#[test]
fn test_abort_from_any_phase() {
    let mut harness = Harness::new(AppConfig::default());
    let frame = frame_at(harness.base, 0, vec![]).with_abort();
    let report = harness.engine.process_frame(&frame);

    assert!(report.finished);
    assert_eq!(report.events, vec![InteractionEvent::Aborted]);
    assert!(harness.engine.is_finished());
}

#[test]
fn test_exit_menu_pauses_practice_matching() {
    let (config, root) = config_with_dirs("pause");
    write_song(&config.practice.library_dir, "song.mid", &[Note::C4]);
    let mut harness = Harness::calibrated(config);
    let t = SCRIPT_END_MS;

    harness.step(t, vec![pointing_hand(Handedness::Right, 500, 80)]);
    harness.step(t + 100, vec![pointing_hand(Handedness::Right, 100, 60)]);
    let report = harness.step(t + 2200, vec![pointing_hand(Handedness::Right, 100, 60)]);
    assert_eq!(report.phase, Phase::Playing { mode: Mode::Practice });

    let t = harness.open_exit_menu(t + 2300);
    let report = harness.step(t + 100, vec![hand_on_key(Handedness::Right, Note::C4)]);
    assert_eq!(report.pressed, vec![Note::C4]);
    assert_eq!(report.expected_note, Some(Note::C4));
    assert!(!report.has_event(|e| matches!(e, InteractionEvent::PracticeProgress { .. })));

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_missing_library_keeps_mode_selection() {
    let (config, _root) = config_with_dirs("missing");
    let mut harness = Harness::calibrated(config);

    let report = harness.step(SCRIPT_END_MS, vec![pointing_hand(Handedness::Right, 500, 80)]);
    assert_eq!(report.phase, Phase::SelectingMode);
    assert!(report.has_event(|e| matches!(e, InteractionEvent::PracticeUnavailable { code: 3001, .. })));
    assert!(report.banner.is_some());
}

#[test]
fn test_unplayable_practice_file_returns_to_mode_selection() {
    let (config, root) = config_with_dirs("unplayable");
    fs::create_dir_all(&config.practice.library_dir).unwrap();
    fs::write(config.practice.library_dir.join("broken.mid"), b"garbage").unwrap();
    let mut harness = Harness::calibrated(config);
    let t = SCRIPT_END_MS;

    let report = harness.step(t, vec![pointing_hand(Handedness::Right, 500, 80)]);
    assert_eq!(report.phase, Phase::ChoosingPracticeFile);
    harness.step(t + 100, vec![pointing_hand(Handedness::Right, 100, 60)]);
    let report = harness.step(t + 2200, vec![pointing_hand(Handedness::Right, 100, 60)]);

    assert_eq!(report.phase, Phase::SelectingMode);
    assert!(report.has_event(|e| matches!(e, InteractionEvent::PracticeUnavailable { code: 3003, .. })));

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_download_exports_and_closes_recording() {
    let (config, root) = config_with_dirs("download");
    let output_dir = config.recording.output_dir.clone();
    let mut harness = Harness::calibrated(config);
    let t = SCRIPT_END_MS;

    harness.step(t, vec![pointing_hand(Handedness::Right, 100, 80)]);
    harness.step(t + 250, vec![hand_on_key(Handedness::Right, Note::A3)]);
    harness.step(t + 500, vec![]);
    let t = harness.open_exit_menu(t + 600);

    // Inside the download button, out of reach of every key
    let report = harness.step(t + 100, vec![pointing_hand(Handedness::Right, 290, 320)]);
    assert!(report.pressed.is_empty());
    assert!(report.has_event(|e| matches!(e, InteractionEvent::ExportStarted { events: 2 })));

    let events = harness.engine.flush_export(harness.base + Duration::from_millis(t + 150));
    let path = match events.as_slice() {
        [InteractionEvent::ExportFinished { path }] => PathBuf::from(path),
        other => panic!("unexpected events: {:?}", other),
    };
    assert!(path.starts_with(&output_dir));
    assert!(path.exists());
    assert!(!harness.engine.session().recorder.is_active());

    // Still hovering: no second export
    let report = harness.step(t + 200, vec![pointing_hand(Handedness::Right, 290, 320)]);
    assert!(!report.has_event(|e| matches!(e, InteractionEvent::ExportStarted { .. })));

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_download_with_nothing_recorded_is_noop() {
    let (config, root) = config_with_dirs("empty_download");
    let output_dir = config.recording.output_dir.clone();
    let mut harness = Harness::calibrated(config);
    let t = SCRIPT_END_MS;

    harness.step(t, vec![pointing_hand(Handedness::Right, 100, 80)]);
    let t = harness.open_exit_menu(t + 100);
    let report = harness.step(t + 100, vec![pointing_hand(Handedness::Right, 290, 320)]);

    assert!(!report.has_event(|e| matches!(e, InteractionEvent::ExportStarted { .. })));
    assert_eq!(report.banner.map(|b| b.text), Some("Nothing recorded".to_string()));
    assert!(!output_dir.exists());

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn test_failed_export_keeps_recording_and_retries() {
    let (config, root) = config_with_dirs("export_retry");
    let output_dir = config.recording.output_dir.clone();
    // A regular file where the output directory should be
    fs::create_dir_all(&root).unwrap();
    fs::write(&output_dir, b"not a directory").unwrap();

    let mut harness = Harness::calibrated(config);
    let t = SCRIPT_END_MS;
    harness.step(t, vec![pointing_hand(Handedness::Right, 100, 80)]);
    harness.step(t + 250, vec![hand_on_key(Handedness::Right, Note::A3)]);
    harness.step(t + 500, vec![]);
    let t = harness.open_exit_menu(t + 600);

    let report = harness.step(t + 100, vec![pointing_hand(Handedness::Right, 290, 320)]);
    assert!(report.has_event(|e| matches!(e, InteractionEvent::ExportStarted { events: 2 })));
    let events = harness.engine.flush_export(harness.base + Duration::from_millis(t + 150));
    assert!(
        matches!(events.as_slice(), [InteractionEvent::ExportFailed { code: 2001, .. }]),
        "unexpected events: {:?}",
        events
    );

    let recorder = &harness.engine.session().recorder;
    assert!(recorder.is_active());
    assert_eq!(recorder.events().len(), 2);

    // Lift the finger off the button
    let report = harness.step(t + 200, vec![pointing_hand(Handedness::Right, 600, 100)]);
    let banner = report.banner.clone().map(|b| b.text).unwrap_or_default();
    assert!(banner.starts_with("Save failed"), "banner was {:?}", banner);
    assert!(!report.has_event(|e| matches!(e, InteractionEvent::ExportStarted { .. })));

    fs::remove_file(&output_dir).unwrap();
    let report = harness.step(t + 300, vec![pointing_hand(Handedness::Right, 290, 320)]);
    assert!(report.has_event(|e| matches!(e, InteractionEvent::ExportStarted { events: 2 })));
    let events = harness.engine.flush_export(harness.base + Duration::from_millis(t + 350));
    let path = match events.as_slice() {
        [InteractionEvent::ExportFinished { path }] => PathBuf::from(path),
        other => panic!("unexpected events: {:?}", other),
    };
    assert!(path.starts_with(&output_dir));
    assert!(!harness.engine.session().recorder.is_active());

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_negative_hold_config_builds_engine() {
    let mut config = AppConfig::default();
    config.calibration.hold_secs = -1.0;
    config.gestures.exit_absence_secs = f64::INFINITY;
    let mut harness = Harness::new(config);

    let touch = pointing_hand(Handedness::Left, 200, 400);
    harness.step(0, vec![touch.clone()]);
    let report = harness.step(0, vec![touch]);
    assert_eq!(report.phase, Phase::CalibratingKeys);
}
