//! Recorded-flight replay.
//!
//! Reads CSV files captured from a live session (one row per GPS fix) and
//! yields [`TelemetrySample`]s, so classifier changes can be checked
//! against real departures without a running simulator.
//!
//! Expected header: `timestamp,lat,lon,altitude_m,heading_deg,ground_speed_mps`
//! (`timestamp` is RFC 3339 and optional — rows without one get the read time).

use crate::FeedError;
use chrono::{DateTime, Utc};
use groundtrack_core::{GeoPoint, TelemetrySample};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ReplayRow {
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    lat: f64,
    lon: f64,
    altitude_m: f64,
    heading_deg: f64,
    ground_speed_mps: f64,
}

/// Iterator over the samples of one recorded flight.
pub struct ReplayReader<R: Read> {
    rows: csv::DeserializeRecordsIntoIter<R, ReplayRow>,
}

impl ReplayReader<File> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> ReplayReader<R> {
    pub fn from_reader(reader: R) -> Self {
        let rows = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader)
            .into_deserialize();
        Self { rows }
    }
}

impl<R: Read> Iterator for ReplayReader<R> {
    type Item = Result<TelemetrySample, FeedError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.rows.next()? {
            Ok(row) => row,
            Err(err) => return Some(Err(err.into())),
        };
        Some(Ok(TelemetrySample {
            position: GeoPoint::new(row.lat, row.lon),
            heading_deg: row.heading_deg,
            ground_speed_mps: row.ground_speed_mps,
            altitude_m: row.altitude_m,
            timestamp: row.timestamp.unwrap_or_else(Utc::now),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDING: &str = "\
timestamp,lat,lon,altitude_m,heading_deg,ground_speed_mps
2024-06-01T09:30:00Z,46.9911,15.4395,340.2,163.8,0.1
2024-06-01T09:30:01Z,46.9912,15.4395,340.2,163.9,2.8
";

    #[test]
    fn reads_recorded_rows_in_order() {
        let samples: Vec<_> = ReplayReader::from_reader(RECORDING.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].ground_speed_mps, 0.1);
        assert_eq!(samples[1].heading_deg, 163.9);
        assert!(samples[0].timestamp < samples[1].timestamp);
    }

    #[test]
    fn missing_timestamp_defaults_to_now() {
        let csv = "\
timestamp,lat,lon,altitude_m,heading_deg,ground_speed_mps
,46.9911,15.4395,340.2,163.8,0.1
";
        let samples: Vec<_> = ReplayReader::from_reader(csv.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn malformed_row_is_an_isolated_error() {
        let csv = "\
timestamp,lat,lon,altitude_m,heading_deg,ground_speed_mps
2024-06-01T09:30:00Z,46.9911,15.4395,340.2,163.8,0.1
2024-06-01T09:30:01Z,not-a-number,15.4395,340.2,163.9,2.8
2024-06-01T09:30:02Z,46.9913,15.4395,340.2,164.0,4.1
";
        let results: Vec<_> = ReplayReader::from_reader(csv.as_bytes()).collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }
}
