use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use air_piano::audio::LogPlayer;
use air_piano::practice::PracticeLibrary;
use air_piano::{init_logging, AppConfig, Frame, InteractionEngine, RecordedFrame, StopReason};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "air_piano_cli",
    about = "Headless harness for the air piano interaction core"
)]
struct Cli {
    /// JSON configuration file (defaults to ./air_piano.json, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Drive the engine from a JSON-lines landmark capture and print frame reports
    Replay {
        #[arg(long)]
        frames: PathBuf,
        /// Only print reports that carry events
        #[arg(long)]
        events_only: bool,
    },
    /// Print the note sequence of a practice MIDI file
    Notes {
        #[arg(long)]
        file: PathBuf,
    },
    /// List practice files
    Library {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    };

    match cli.command {
        Commands::Replay {
            frames,
            events_only,
        } => run_replay(config, &frames, events_only),
        Commands::Notes { file } => run_notes(&file),
        Commands::Library { dir } => {
            let dir = dir.unwrap_or_else(|| config.practice.library_dir.clone());
            run_library(dir)
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::from(0))
        }
    }
}

fn load_frames(path: &PathBuf) -> Result<Vec<Frame>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let base = Instant::now();

    let mut frames = Vec::new();
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let recorded: RecordedFrame = serde_json::from_str(&line)
            .with_context(|| format!("parsing frame on line {}", line_no + 1))?;
        frames.push(recorded.into_frame(base));
    }
    Ok(frames)
}

fn run_replay(config: AppConfig, path: &PathBuf, events_only: bool) -> Result<ExitCode> {
    let frames = load_frames(path)?;
    let mut engine = InteractionEngine::new(config, Box::new(LogPlayer::default()));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut write_error = None;

    let summary = engine.run(&mut frames.into_iter(), |report| {
        if write_error.is_some() || (events_only && report.events.is_empty()) {
            return;
        }
        let written = serde_json::to_string(report)
            .map_err(anyhow::Error::from)
            .and_then(|json| writeln!(out, "{}", json).map_err(anyhow::Error::from));
        if let Err(err) = written {
            write_error = Some(err);
        }
    });

    if let Some(err) = write_error {
        return Err(err.context("writing frame reports"));
    }

    emit(&ReplaySummary {
        frames: summary.frames,
        finished: summary.reason == StopReason::Finished,
        phase: engine.phase(),
    })?;
    Ok(ExitCode::from(0))
}

#[derive(Serialize)]
struct ReplaySummary {
    frames: usize,
    finished: bool,
    phase: air_piano::Phase,
}

fn emit<T: Serialize>(value: &T) -> Result<()> {
    eprintln!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn run_notes(file: &PathBuf) -> Result<ExitCode> {
    let notes = PracticeLibrary::load_notes(file)
        .with_context(|| format!("loading practice file {}", file.display()))?;
    let names: Vec<&str> = notes.iter().map(|n| n.name()).collect();
    println!("{}", serde_json::to_string(&names)?);
    Ok(ExitCode::from(0))
}

fn run_library(dir: PathBuf) -> Result<ExitCode> {
    let files = PracticeLibrary::new(&dir)
        .scan()
        .with_context(|| format!("scanning {}", dir.display()))?;
    for file in files {
        println!("{}", file.display());
    }
    Ok(ExitCode::from(0))
}
