//! Integration tests for the `air_piano_cli` binary
//!
//! Each test writes its inputs (landmark captures, practice files) into a
//! private temp directory and checks the JSON the CLI prints.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use air_piano::config::RecordingConfig;
use air_piano::recording::{write_recording, FinishedRecording, NoteEvent, NoteEventKind};
use air_piano::testing::{pointing_hand, spread_hand, FRAME_H, FRAME_W};
use air_piano::{Handedness, HandObservation, Note, RecordedFrame};
use serde_json::Value;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_air_piano_cli"))
}

fn temp_root(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("air_piano_cli_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn recorded(t_ms: u64, hands: Vec<HandObservation>) -> RecordedFrame {
    RecordedFrame {
        t_ms,
        width: FRAME_W,
        height: FRAME_H,
        hands,
        abort: false,
    }
}

fn write_capture(path: &Path, frames: &[RecordedFrame]) {
    let lines: Vec<String> = frames
        .iter()
        .map(|f| serde_json::to_string(f).expect("serialize frame"))
        .collect();
    fs::write(path, lines.join("\n") + "\n").expect("write capture");
}

fn json_lines(bytes: &[u8]) -> Vec<Value> {
    String::from_utf8(bytes.to_vec())
        .expect("output UTF-8")
        .lines()
        .filter(|line| line.starts_with('{'))
        .map(|line| serde_json::from_str(line).expect("JSON line"))
        .collect()
}

fn has_event(report: &Value, kind: &str) -> bool {
    report["events"]
        .as_array()
        .is_some_and(|events| events.iter().any(|e| e["type"] == kind))
}

/// Replaying a calibration capture locks the table and builds the keyboard
#[test]
fn replay_capture_reports_calibration() {
    let root = temp_root("replay");
    let capture = root.join("capture.jsonl");
    let touch = pointing_hand(Handedness::Left, 200, 400);
    write_capture(
        &capture,
        &[
            recorded(0, vec![touch.clone()]),
            recorded(750, vec![touch.clone()]),
            recorded(1500, vec![touch]),
            recorded(1600, vec![spread_hand(Handedness::Right, 320, 300, 300)]),
        ],
    );

    let output = cli()
        .args(["replay", "--frames"])
        .arg(&capture)
        .output()
        .expect("failed to run air_piano_cli replay");
    assert!(
        output.status.success(),
        "CLI exited with {:?}",
        output.status.code()
    );

    let reports = json_lines(&output.stdout);
    assert_eq!(reports.len(), 4);
    assert!(has_event(&reports[2], "table_locked"));
    assert_eq!(reports[2]["events"][0]["payload"]["y_pixel"], 400);
    assert!(has_event(&reports[3], "keyboard_built"));
    assert_eq!(reports[3]["phase"]["name"], "selecting_mode");

    let summary = json_lines(&output.stderr)
        .pop()
        .expect("summary JSON on stderr");
    assert_eq!(summary["frames"], 4);
    assert_eq!(summary["finished"], false);

    fs::remove_dir_all(&root).expect("cleanup");
}

/// An abort frame ends the replay and `--events-only` hides quiet frames
#[test]
fn replay_abort_stops_early() {
    let root = temp_root("abort");
    let capture = root.join("capture.jsonl");
    let mut abort = recorded(100, vec![]);
    abort.abort = true;
    write_capture(&capture, &[recorded(0, vec![]), abort, recorded(200, vec![])]);

    let output = cli()
        .args(["replay", "--events-only", "--frames"])
        .arg(&capture)
        .output()
        .expect("failed to run air_piano_cli replay");
    assert!(output.status.success());

    let reports = json_lines(&output.stdout);
    assert_eq!(reports.len(), 1);
    assert!(has_event(&reports[0], "aborted"));
    assert_eq!(reports[0]["finished"], true);

    let summary = json_lines(&output.stderr).pop().expect("summary JSON");
    assert_eq!(summary["frames"], 2);
    assert_eq!(summary["finished"], true);

    fs::remove_dir_all(&root).expect("cleanup");
}

/// A malformed capture line is reported with its line number
#[test]
fn replay_rejects_malformed_capture() {
    let root = temp_root("malformed");
    let capture = root.join("capture.jsonl");
    fs::write(&capture, "{\"t_ms\": 0, \"width\": 640, \"height\": 480}\nnot json\n")
        .expect("write capture");

    let output = cli()
        .args(["replay", "--frames"])
        .arg(&capture)
        .output()
        .expect("failed to run air_piano_cli replay");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("stderr UTF-8");
    assert!(stderr.contains("line 2"), "unexpected stderr: {stderr}");

    fs::remove_dir_all(&root).expect("cleanup");
}

#[test]
fn notes_prints_practice_sequence() {
    let root = temp_root("notes");
    let recording = FinishedRecording {
        events: [Note::E4, Note::D4, Note::C4]
            .into_iter()
            .map(|note| NoteEvent {
                note,
                kind: NoteEventKind::On,
                delta_ticks: 480,
            })
            .collect(),
    };
    let path = write_recording(&recording, &RecordingConfig::default(), &root)
        .expect("write practice file");

    let output = cli()
        .args(["notes", "--file"])
        .arg(&path)
        .output()
        .expect("failed to run air_piano_cli notes");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let json: Value = serde_json::from_str(stdout.trim()).expect("note list JSON");
    assert_eq!(json, serde_json::json!(["E4", "D4", "C4"]));

    let output = cli()
        .args(["library", "--dir"])
        .arg(&root)
        .output()
        .expect("failed to run air_piano_cli library");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains("recording_"));

    fs::remove_dir_all(&root).expect("cleanup");
}

#[test]
fn notes_missing_file_fails() {
    let output = cli()
        .args(["notes", "--file", "/nonexistent/air_piano/song.mid"])
        .output()
        .expect("failed to run air_piano_cli notes");
    assert_eq!(output.status.code(), Some(1));
}

/// `config` merges a partial file over the defaults
#[test]
fn config_prints_effective_configuration() {
    let root = temp_root("config");
    let path = root.join("air_piano.json");
    fs::write(&path, r#"{ "gestures": { "menu_dwell_secs": 3.5 } }"#).expect("write config");

    let output = cli()
        .arg("config")
        .arg("--config")
        .arg(&path)
        .output()
        .expect("failed to run air_piano_cli config");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("config JSON");
    assert_eq!(json["gestures"]["menu_dwell_secs"], 3.5);
    assert_eq!(json["gestures"]["exit_absence_secs"], 3.0);
    assert_eq!(json["calibration"]["hold_secs"], 1.5);
    assert_eq!(json["keyboard"]["hit_radius_px"], 45.0);

    fs::remove_dir_all(&root).expect("cleanup");
}
