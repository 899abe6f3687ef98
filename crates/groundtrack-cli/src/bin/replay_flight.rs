//! Replay a recorded flight through the position classifier.
//!
//! Reads a CSV recording (one row per GPS fix), classifies every sample
//! against an airport layout and prints the result, so classifier or
//! layout changes can be checked against real departures offline.
//!
//! Usage:
//!   cargo run -p groundtrack-cli --bin replay_flight -- data/flight.csv

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use groundtrack_core::{AirportLayout, Classifier, Thresholds};
use groundtrack_feed::{ReplayReader, ZoneDebouncer};
use std::path::PathBuf;
use std::time::Duration;

/// Replay a recorded flight against an airport layout
#[derive(Parser, Debug)]
#[command(author, version, about = "Replay a recorded flight through the classifier")]
struct Args {
    /// Recorded flight CSV
    recording: PathBuf,

    /// Airport layout JSON
    #[arg(long, default_value = "data/lowg.json")]
    layout: PathBuf,

    /// Classifier thresholds JSON (defaults apply to omitted fields)
    #[arg(long)]
    thresholds: Option<PathBuf>,

    /// Report a zone transition only after N consecutive samples agree
    #[arg(long, default_value_t = 1)]
    debounce: u32,

    /// Print only confirmed zone transitions, not every sample
    #[arg(long, default_value_t = false)]
    transitions_only: bool,

    /// Pace output by the recorded timestamps instead of replaying at once
    #[arg(long, default_value_t = false)]
    realtime: bool,
}

/// Gaps longer than this are capped so a recording with a pause in it
/// does not stall the replay.
const MAX_PACING_GAP: Duration = Duration::from_secs(10);

fn main() -> Result<()> {
    let args = Args::parse();

    let layout = AirportLayout::from_file(&args.layout)
        .with_context(|| format!("loading airport layout from {}", args.layout.display()))?;

    let thresholds = match &args.thresholds {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading thresholds from {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing thresholds from {}", path.display()))?
        }
        None => Thresholds::default(),
    };
    let classifier = Classifier::new(thresholds);

    let mut debouncer = ZoneDebouncer::new(args.debounce);
    let mut row = 0usize;
    let mut skipped = 0usize;
    let mut last_timestamp: Option<DateTime<Utc>> = None;

    let reader = ReplayReader::from_path(&args.recording)
        .with_context(|| format!("opening recording {}", args.recording.display()))?;
    for result in reader {
        row += 1;
        let sample = match result {
            Ok(sample) => sample,
            Err(err) => {
                eprintln!("row {row}: skipping malformed row: {err}");
                skipped += 1;
                continue;
            }
        };
        if args.realtime {
            if let Some(last) = last_timestamp {
                let gap = (sample.timestamp - last)
                    .to_std()
                    .unwrap_or(Duration::ZERO)
                    .min(MAX_PACING_GAP);
                std::thread::sleep(gap);
            }
            last_timestamp = Some(sample.timestamp);
        }

        let classification = match classifier.classify(&layout, &sample) {
            Ok(classification) => classification,
            Err(err) => {
                eprintln!("row {row}: skipping invalid sample: {err}");
                skipped += 1;
                continue;
            }
        };

        if let Some(zone) = debouncer.observe(&classification.zone) {
            println!("row {row}: ==> {zone}");
        } else if !args.transitions_only {
            println!("row {row}: {classification}");
        }
    }

    println!("{} rows ({skipped} skipped)", row);
    Ok(())
}
