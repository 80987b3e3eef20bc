// MIDI output for recorded sessions.
//
// A finished recording becomes a single-track Standard MIDI File: tempo meta
// event, program change, then one note-on/note-off per recorded transition
// on channel 0 with the recorder's delta ticks, closed by end-of-track.
//
// Uses the `midly` crate for MIDI writing.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};
use tracing::info;

use crate::config::RecordingConfig;
use crate::error::RecordingError;
use crate::recording::recorder::{FinishedRecording, NoteEventKind};

const MAX_DELTA: u32 = (1 << 28) - 1;
const MAX_TEMPO: u32 = (1 << 24) - 1;
const MAX_DATA: u8 = 127;

/// Encode a recording as SMF bytes.
pub fn encode_recording(
    recording: &FinishedRecording,
    config: &RecordingConfig,
) -> Result<Vec<u8>, RecordingError> {
    let tempo = config.tempo_micros();
    if tempo > MAX_TEMPO {
        return Err(RecordingError::Encode {
            reason: format!("tempo of {} bpm is too slow to encode", config.tempo_bpm),
        });
    }

    let channel = u4::new(0);
    let velocity = u7::new(config.velocity.min(MAX_DATA));

    let mut track: Track<'static> = Vec::with_capacity(recording.events.len() + 3);
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo))),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: u7::new(config.program.min(MAX_DATA)),
            },
        },
    });

    for event in &recording.events {
        if event.delta_ticks > MAX_DELTA {
            return Err(RecordingError::Encode {
                reason: format!("delta of {} ticks exceeds the MIDI limit", event.delta_ticks),
            });
        }
        let key = u7::new(event.note.pitch());
        let message = match event.kind {
            NoteEventKind::On => MidiMessage::NoteOn { key, vel: velocity },
            NoteEventKind::Off => MidiMessage::NoteOff {
                key,
                vel: u7::new(0),
            },
        };
        track.push(TrackEvent {
            delta: u28::new(event.delta_ticks),
            kind: TrackEventKind::Midi { channel, message },
        });
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(config.ticks_per_beat.min(0x7FFF))),
    ));
    smf.tracks.push(track);

    let mut buf = Vec::new();
    smf.write(&mut buf).map_err(|e| RecordingError::Encode {
        reason: e.to_string(),
    })?;
    Ok(buf)
}

/// Timestamped, non-clobbering file name inside `dir`.
fn next_recording_path(dir: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let mut path = dir.join(format!("recording_{}.mid", stamp));
    let mut suffix = 1;
    while path.exists() {
        path = dir.join(format!("recording_{}_{}.mid", stamp, suffix));
        suffix += 1;
    }
    path
}

/// Encode and write a recording into `dir`, creating it if needed.
///
/// # Returns
/// Path of the written file
pub fn write_recording(
    recording: &FinishedRecording,
    config: &RecordingConfig,
    dir: &Path,
) -> Result<PathBuf, RecordingError> {
    let bytes = encode_recording(recording, config)?;

    fs::create_dir_all(dir).map_err(|e| RecordingError::Persistence {
        path: dir.display().to_string(),
        reason: e.to_string(),
    })?;

    let path = next_recording_path(dir);
    fs::write(&path, &bytes).map_err(|e| RecordingError::Persistence {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    info!(
        "[MidiWriter] Saved {} events to {:?}",
        recording.events.len(),
        path
    );
    Ok(path)
}
