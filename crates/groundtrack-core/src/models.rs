//! Core data models for surface position classification.

use crate::geo::GeoPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One parsed telemetry reading from the aircraft.
///
/// Produced by an acquisition path (UDP feed, recorded-flight replay) and
/// consumed once by the classifier; never retained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub position: GeoPoint,
    /// Degrees true, 0-360
    pub heading_deg: f64,
    pub ground_speed_mps: f64,
    /// Meters MSL
    pub altitude_m: f64,
    pub timestamp: DateTime<Utc>,
}

impl TelemetrySample {
    /// Reject samples whose fields cannot describe a real position.
    ///
    /// A failed sample is dropped by the caller; it must never halt the
    /// stream of subsequent classifications.
    pub fn validate(&self) -> Result<(), SampleError> {
        let lat = self.position.lat_deg;
        let lon = self.position.lon_deg;
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(SampleError::LatitudeOutOfRange { value: lat });
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(SampleError::LongitudeOutOfRange { value: lon });
        }
        if !self.heading_deg.is_finite() {
            return Err(SampleError::NotFinite { field: "heading_deg" });
        }
        if !self.ground_speed_mps.is_finite() || self.ground_speed_mps < 0.0 {
            return Err(SampleError::NotFinite {
                field: "ground_speed_mps",
            });
        }
        if !self.altitude_m.is_finite() {
            return Err(SampleError::NotFinite { field: "altitude_m" });
        }
        Ok(())
    }
}

/// A telemetry sample that cannot be classified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("latitude {value} outside [-90, 90]")]
    LatitudeOutOfRange { value: f64 },
    #[error("longitude {value} outside [-180, 180]")]
    LongitudeOutOfRange { value: f64 },
    #[error("field `{field}` is not a finite non-negative number")]
    NotFinite { field: &'static str },
}

/// Kind of layout feature, used in diagnostics for unmatched samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Runway,
    Taxiway,
    Parking,
    HoldingPoint,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeatureKind::Runway => "runway",
            FeatureKind::Taxiway => "taxiway",
            FeatureKind::Parking => "parking",
            FeatureKind::HoldingPoint => "holding point",
        };
        f.write_str(s)
    }
}

/// Closest modeled feature when no zone threshold was satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestFeature {
    pub kind: FeatureKind,
    pub ident: String,
    pub distance_m: f64,
}

/// The semantic zone an aircraft occupies, with the matched feature.
///
/// One variant per zone so a consumer can never see, say, a runway ident
/// attached to a parking result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "zone", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Zone {
    AtParking {
        stand: String,
    },
    OnTaxiway {
        taxiway: String,
    },
    AtHoldingPoint {
        holding_point: String,
        runway: String,
    },
    OnRunway {
        runway: String,
    },
    Airborne,
    Unknown {
        /// Best-effort nearest feature so a display can still say
        /// "near taxiway D, 12 m off centerline".
        nearest: Option<NearestFeature>,
    },
}

impl Zone {
    /// Identifier of the matched feature, if any.
    pub fn feature_ident(&self) -> Option<&str> {
        match self {
            Zone::AtParking { stand } => Some(stand),
            Zone::OnTaxiway { taxiway } => Some(taxiway),
            Zone::AtHoldingPoint { holding_point, .. } => Some(holding_point),
            Zone::OnRunway { runway } => Some(runway),
            Zone::Airborne => None,
            Zone::Unknown { nearest } => nearest.as_ref().map(|n| n.ident.as_str()),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::AtParking { stand } => write!(f, "At Parking {stand}"),
            Zone::OnTaxiway { taxiway } => write!(f, "On Taxiway {taxiway}"),
            Zone::AtHoldingPoint {
                holding_point,
                runway,
            } => write!(f, "At Holding Point {holding_point} (runway {runway})"),
            Zone::OnRunway { runway } => write!(f, "On Runway {runway}"),
            Zone::Airborne => f.write_str("Airborne"),
            Zone::Unknown { nearest: Some(n) } => {
                write!(f, "Unknown (near {} {}, {:.0} m)", n.kind, n.ident, n.distance_m)
            }
            Zone::Unknown { nearest: None } => f.write_str("Unknown"),
        }
    }
}

/// Result of classifying one telemetry sample.
///
/// A fresh value per call; the classifier never mutates a prior result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(flatten)]
    pub zone: Zone,
    /// Distance in meters to the matched feature's reference line/point
    /// (None for airborne).
    pub distance_m: Option<f64>,
    /// Sample heading, echoed for display.
    pub heading_deg: f64,
    /// Sample ground speed, echoed for display.
    pub ground_speed_mps: f64,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | hdg {:.1}° | {:.1} m/s",
            self.zone, self.heading_deg, self.ground_speed_mps
        )?;
        if let Some(d) = self.distance_m {
            write!(f, " | {d:.1} m off reference")?;
        }
        Ok(())
    }
}
