//! Immutable airport layout model and nearest-feature queries.
//!
//! A layout is validated all-or-nothing at load time and treated as
//! read-only afterwards, so it can be shared by reference across any number
//! of concurrent classification calls without locking.

use crate::geo::{
    self, GeoPoint, SegmentProjection, angular_difference_deg, haversine_distance_m,
    initial_bearing_deg,
};
use serde::Serialize;
use std::cmp::Ordering;
use thiserror::Error;

/// Maximum difference tolerated between a runway end's published heading
/// and the bearing computed from its thresholds (absorbs magnetic/true
/// rounding in published charts).
pub const RUNWAY_HEADING_CONSISTENCY_DEG: f64 = 20.0;

/// One end of a runway: its designator, threshold and published heading.
#[derive(Debug, Clone, Serialize)]
pub struct RunwayEnd {
    /// Designator, e.g. "16C"
    pub ident: String,
    pub threshold: GeoPoint,
    /// Degrees true, direction of travel when departing from this end
    pub heading_deg: f64,
}

/// A runway, modeled as the segment between its two thresholds.
#[derive(Debug, Clone, Serialize)]
pub struct Runway {
    pub ends: [RunwayEnd; 2],
    pub width_m: f64,
}

impl Runway {
    /// Combined identifier, e.g. "16C/34C".
    pub fn ident(&self) -> String {
        format!("{}/{}", self.ends[0].ident, self.ends[1].ident)
    }

    /// True if `ident` names this runway or one of its ends.
    pub fn matches_ident(&self, ident: &str) -> bool {
        self.ident() == ident || self.ends.iter().any(|e| e.ident == ident)
    }
}

/// A named taxiway: an ordered centerline polyline with a nominal width.
#[derive(Debug, Clone, Serialize)]
pub struct Taxiway {
    pub ident: String,
    pub centerline: Vec<GeoPoint>,
    pub width_m: f64,
}

/// A parking stand with a nose-in heading and an acceptance radius.
#[derive(Debug, Clone, Serialize)]
pub struct ParkingPosition {
    pub ident: String,
    pub position: GeoPoint,
    pub heading_deg: f64,
    /// Acceptance radius; stands that publish none use the configured
    /// default at classification time.
    pub radius_m: Option<f64>,
}

/// A holding point short of a runway, sitting on a taxiway.
#[derive(Debug, Clone, Serialize)]
pub struct HoldingPoint {
    pub ident: String,
    pub position: GeoPoint,
    /// Designator of the runway this point guards, e.g. "16C"
    pub runway_ident: String,
    pub taxiway_ident: String,
}

/// Validated, immutable layout of one airport.
#[derive(Debug, Clone, Serialize)]
pub struct AirportLayout {
    pub name: String,
    pub icao: String,
    pub field_elevation_m: f64,
    pub runways: Vec<Runway>,
    pub taxiways: Vec<Taxiway>,
    pub parking_positions: Vec<ParkingPosition>,
    pub holding_points: Vec<HoldingPoint>,
}

/// A layout that fails validation. Fatal: the process must not run the
/// classifier against a partially valid layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("duplicate {category} identifier `{ident}`")]
    DuplicateIdent {
        category: &'static str,
        ident: String,
    },
    #[error("runway `{ident}`: identifier must name both ends, e.g. \"16C/34C\"")]
    MalformedRunwayIdent { ident: String },
    #[error("runway `{ident}`: threshold coordinates coincide")]
    CoincidentThresholds { ident: String },
    #[error("{category} `{ident}`: width_m must be positive (got {width_m})")]
    NonPositiveWidth {
        category: &'static str,
        ident: String,
        width_m: f64,
    },
    #[error(
        "runway end `{ident}`: published heading {published_deg:.1}° \
         disagrees with threshold bearing {bearing_deg:.1}°"
    )]
    HeadingInconsistent {
        ident: String,
        published_deg: f64,
        bearing_deg: f64,
    },
    #[error("taxiway `{ident}`: centerline needs at least 2 points (got {count})")]
    TooFewCenterlinePoints { ident: String, count: usize },
    #[error("taxiway `{ident}`: zero-length segment starting at point {index}")]
    ZeroLengthSegment { ident: String, index: usize },
    #[error("parking position `{ident}`: radius_m must be positive (got {radius_m})")]
    NonPositiveRadius { ident: String, radius_m: f64 },
    #[error("holding point `{ident}`: references unknown runway `{runway}`")]
    UnknownRunway { ident: String, runway: String },
    #[error("holding point `{ident}`: references unknown taxiway `{taxiway}`")]
    UnknownTaxiway { ident: String, taxiway: String },
    #[error("failed to read layout file")]
    Io(#[from] std::io::Error),
    #[error("failed to parse layout file")]
    Parse(#[from] serde_json::Error),
}

/// Nearest runway to a query point.
#[derive(Debug, Clone)]
pub struct RunwayFix<'a> {
    pub runway: &'a Runway,
    /// Perpendicular distance to the threshold-to-threshold centerline
    pub cross_track_m: f64,
    /// Unclamped along-track fraction; within [0, 1] means between thresholds
    pub along_frac: f64,
    /// End nearest to the projected point
    pub nearer_end: &'a RunwayEnd,
}

/// Nearest taxiway to a query point.
#[derive(Debug, Clone)]
pub struct TaxiwayFix<'a> {
    pub taxiway: &'a Taxiway,
    pub cross_track_m: f64,
    /// Along-track fraction within the closest sub-segment
    pub along_frac: f64,
}

/// Distance ties within this many meters fall back to ident order, so
/// repeated queries over equidistant features stay deterministic.
const TIE_EPSILON_M: f64 = 1e-6;

fn closer(best: f64, best_ident: &str, candidate: f64, ident: &str) -> bool {
    if (candidate - best).abs() <= TIE_EPSILON_M {
        return ident.cmp(best_ident) == Ordering::Less;
    }
    candidate < best
}

impl AirportLayout {
    /// Find the runway minimizing perpendicular distance from `point` to
    /// the segment joining its thresholds. Ties break by ident ascending.
    pub fn nearest_runway(&self, point: GeoPoint) -> Option<RunwayFix<'_>> {
        let mut best: Option<(RunwayFix<'_>, String)> = None;

        for runway in &self.runways {
            let proj = point_on_runway(runway, point);
            let ident = runway.ident();
            let replace = match &best {
                None => true,
                Some((fix, best_ident)) => {
                    closer(fix.cross_track_m, best_ident, proj.distance_m, &ident)
                }
            };
            if replace {
                let nearer_end = if proj.along_frac <= 0.5 {
                    &runway.ends[0]
                } else {
                    &runway.ends[1]
                };
                best = Some((
                    RunwayFix {
                        runway,
                        cross_track_m: proj.distance_m,
                        along_frac: proj.raw_frac,
                        nearer_end,
                    },
                    ident,
                ));
            }
        }

        best.map(|(fix, _)| fix)
    }

    /// Find the taxiway whose closest polyline sub-segment minimizes the
    /// perpendicular distance to `point`.
    pub fn nearest_taxiway(&self, point: GeoPoint) -> Option<TaxiwayFix<'_>> {
        let mut best: Option<TaxiwayFix<'_>> = None;

        for taxiway in &self.taxiways {
            let Some(proj) = nearest_subsegment(&taxiway.centerline, point) else {
                continue;
            };
            let replace = match &best {
                None => true,
                Some(fix) => closer(
                    fix.cross_track_m,
                    &fix.taxiway.ident,
                    proj.distance_m,
                    &taxiway.ident,
                ),
            };
            if replace {
                best = Some(TaxiwayFix {
                    taxiway,
                    cross_track_m: proj.distance_m,
                    along_frac: proj.along_frac,
                });
            }
        }

        best
    }

    /// Nearest parking stand by plain distance to its center.
    pub fn nearest_parking(&self, point: GeoPoint) -> Option<(&ParkingPosition, f64)> {
        let mut best: Option<(&ParkingPosition, f64)> = None;
        for parking in &self.parking_positions {
            let dist = haversine_distance_m(point, parking.position);
            let replace = match best {
                None => true,
                Some((p, d)) => closer(d, &p.ident, dist, &parking.ident),
            };
            if replace {
                best = Some((parking, dist));
            }
        }
        best
    }

    /// Nearest holding point by plain distance.
    pub fn nearest_holding_point(&self, point: GeoPoint) -> Option<(&HoldingPoint, f64)> {
        let mut best: Option<(&HoldingPoint, f64)> = None;
        for hp in &self.holding_points {
            let dist = haversine_distance_m(point, hp.position);
            let replace = match best {
                None => true,
                Some((h, d)) => closer(d, &h.ident, dist, &hp.ident),
            };
            if replace {
                best = Some((hp, dist));
            }
        }
        best
    }

    /// Validate cross-entity invariants. Called by the loader; also usable
    /// on hand-built layouts in tests.
    pub fn validate(&self) -> Result<(), LayoutError> {
        check_unique("runway", self.runways.iter().map(|r| r.ident()))?;
        check_unique("taxiway", self.taxiways.iter().map(|t| t.ident.clone()))?;
        check_unique(
            "parking position",
            self.parking_positions.iter().map(|p| p.ident.clone()),
        )?;
        check_unique(
            "holding point",
            self.holding_points.iter().map(|h| h.ident.clone()),
        )?;

        for runway in &self.runways {
            let [a, b] = &runway.ends;
            if haversine_distance_m(a.threshold, b.threshold) < 1.0 {
                return Err(LayoutError::CoincidentThresholds {
                    ident: runway.ident(),
                });
            }
            if runway.width_m <= 0.0 {
                return Err(LayoutError::NonPositiveWidth {
                    category: "runway",
                    ident: runway.ident(),
                    width_m: runway.width_m,
                });
            }
            for (end, other) in [(a, b), (b, a)] {
                let bearing = initial_bearing_deg(end.threshold, other.threshold);
                if angular_difference_deg(end.heading_deg, bearing)
                    > RUNWAY_HEADING_CONSISTENCY_DEG
                {
                    return Err(LayoutError::HeadingInconsistent {
                        ident: end.ident.clone(),
                        published_deg: end.heading_deg,
                        bearing_deg: bearing,
                    });
                }
            }
        }

        for taxiway in &self.taxiways {
            if taxiway.centerline.len() < 2 {
                return Err(LayoutError::TooFewCenterlinePoints {
                    ident: taxiway.ident.clone(),
                    count: taxiway.centerline.len(),
                });
            }
            if taxiway.width_m <= 0.0 {
                return Err(LayoutError::NonPositiveWidth {
                    category: "taxiway",
                    ident: taxiway.ident.clone(),
                    width_m: taxiway.width_m,
                });
            }
            for (i, pair) in taxiway.centerline.windows(2).enumerate() {
                if haversine_distance_m(pair[0], pair[1]) < 0.01 {
                    return Err(LayoutError::ZeroLengthSegment {
                        ident: taxiway.ident.clone(),
                        index: i,
                    });
                }
            }
        }

        for parking in &self.parking_positions {
            if let Some(radius_m) = parking.radius_m {
                if radius_m <= 0.0 {
                    return Err(LayoutError::NonPositiveRadius {
                        ident: parking.ident.clone(),
                        radius_m,
                    });
                }
            }
        }

        for hp in &self.holding_points {
            if !self.runways.iter().any(|r| r.matches_ident(&hp.runway_ident)) {
                return Err(LayoutError::UnknownRunway {
                    ident: hp.ident.clone(),
                    runway: hp.runway_ident.clone(),
                });
            }
            if !self.taxiways.iter().any(|t| t.ident == hp.taxiway_ident) {
                return Err(LayoutError::UnknownTaxiway {
                    ident: hp.ident.clone(),
                    taxiway: hp.taxiway_ident.clone(),
                });
            }
        }

        Ok(())
    }
}

fn check_unique(
    category: &'static str,
    idents: impl Iterator<Item = String>,
) -> Result<(), LayoutError> {
    let mut seen = std::collections::HashSet::new();
    for ident in idents {
        if !seen.insert(ident.clone()) {
            return Err(LayoutError::DuplicateIdent { category, ident });
        }
    }
    Ok(())
}

fn point_on_runway(runway: &Runway, point: GeoPoint) -> SegmentProjection {
    geo::point_to_segment(
        point,
        runway.ends[0].threshold,
        runway.ends[1].threshold,
    )
}

/// Minimum-distance projection over every consecutive point pair of a
/// polyline. None only for degenerate (<2 point) polylines, which
/// validation rejects.
fn nearest_subsegment(polyline: &[GeoPoint], point: GeoPoint) -> Option<SegmentProjection> {
    polyline
        .windows(2)
        .map(|pair| geo::point_to_segment(point, pair[0], pair[1]))
        .min_by(|a, b| {
            a.distance_m
                .partial_cmp(&b.distance_m)
                .unwrap_or(Ordering::Equal)
        })
}
