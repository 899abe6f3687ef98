//! Declarative airport layout documents and their loader.
//!
//! The on-disk format enumerates runways, taxiways, parking positions and
//! holding points per airport. Coordinates are `[lat, lon]` pairs in decimal
//! degrees; widths, radii and elevations are meters. Validation is
//! all-or-nothing: no partial layout is ever returned.

use crate::geo::{GeoPoint, initial_bearing_deg};
use crate::layout::{
    AirportLayout, HoldingPoint, LayoutError, ParkingPosition, Runway, RunwayEnd, Taxiway,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level layout document.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutFile {
    pub name: String,
    pub icao: String,
    #[serde(default)]
    pub field_elevation_m: f64,
    #[serde(default)]
    pub runways: Vec<RunwayDef>,
    #[serde(default)]
    pub taxiways: Vec<TaxiwayDef>,
    #[serde(default)]
    pub parking_positions: Vec<ParkingDef>,
    #[serde(default)]
    pub holding_points: Vec<HoldingPointDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunwayDef {
    /// Both-ends designator, e.g. "16C/34C"
    pub ident: String,
    /// Threshold coordinates, one per end, in ident order
    pub thresholds: [[f64; 2]; 2],
    pub width_m: f64,
    /// Published per-end headings; computed from the thresholds when absent
    #[serde(default)]
    pub headings_deg: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaxiwayDef {
    pub ident: String,
    pub centerline: Vec<[f64; 2]>,
    pub width_m: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParkingDef {
    pub ident: String,
    pub position: [f64; 2],
    pub heading_deg: f64,
    /// Falls back to the classifier's configured default when absent
    #[serde(default)]
    pub radius_m: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HoldingPointDef {
    pub ident: String,
    pub position: [f64; 2],
    pub runway: String,
    pub taxiway: String,
}

fn point(coord: [f64; 2]) -> GeoPoint {
    GeoPoint::new(coord[0], coord[1])
}

impl AirportLayout {
    /// Build and validate a layout from a parsed description.
    pub fn load(file: LayoutFile) -> Result<Self, LayoutError> {
        let mut runways = Vec::with_capacity(file.runways.len());
        for def in file.runways {
            runways.push(build_runway(def)?);
        }

        let taxiways = file
            .taxiways
            .into_iter()
            .map(|def| Taxiway {
                ident: def.ident,
                centerline: def.centerline.into_iter().map(point).collect(),
                width_m: def.width_m,
            })
            .collect();

        let parking_positions = file
            .parking_positions
            .into_iter()
            .map(|def| ParkingPosition {
                ident: def.ident,
                position: point(def.position),
                heading_deg: def.heading_deg,
                radius_m: def.radius_m,
            })
            .collect();

        let holding_points = file
            .holding_points
            .into_iter()
            .map(|def| HoldingPoint {
                ident: def.ident,
                position: point(def.position),
                runway_ident: def.runway,
                taxiway_ident: def.taxiway,
            })
            .collect();

        let layout = AirportLayout {
            name: file.name,
            icao: file.icao,
            field_elevation_m: file.field_elevation_m,
            runways,
            taxiways,
            parking_positions,
            holding_points,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Parse and validate a layout from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, LayoutError> {
        let file: LayoutFile = serde_json::from_str(json)?;
        Self::load(file)
    }

    /// Read, parse and validate a layout file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

fn build_runway(def: RunwayDef) -> Result<Runway, LayoutError> {
    let Some((ident1, ident2)) = def.ident.split_once('/') else {
        return Err(LayoutError::MalformedRunwayIdent { ident: def.ident });
    };
    let t1 = point(def.thresholds[0]);
    let t2 = point(def.thresholds[1]);

    let (heading1, heading2) = match def.headings_deg {
        Some([h1, h2]) => (h1, h2),
        None => (initial_bearing_deg(t1, t2), initial_bearing_deg(t2, t1)),
    };

    Ok(Runway {
        ends: [
            RunwayEnd {
                ident: ident1.to_string(),
                threshold: t1,
                heading_deg: heading1,
            },
            RunwayEnd {
                ident: ident2.to_string(),
                threshold: t2,
                heading_deg: heading2,
            },
        ],
        width_m: def.width_m,
    })
}
