//! Spatial math for surface position classification.
//!
//! All functions are pure and total. Distances are computed on the great
//! circle (haversine); a local tangent plane with latitude-aware
//! meters-per-degree scaling is used only to resolve projection geometry,
//! which is accurate to well under a meter at airport scale.

use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_m: Option<f64>,
}

impl GeoPoint {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self {
            lat_deg,
            lon_deg,
            elevation_m: None,
        }
    }
}

/// Great-circle distance between two points in meters (haversine formula).
pub fn haversine_distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat_deg.to_radians();
    let phi2 = b.lat_deg.to_radians();
    let dphi = (b.lat_deg - a.lat_deg).to_radians();
    let dlambda = (b.lon_deg - a.lon_deg).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial bearing from `a` to `b` in degrees, normalized to [0, 360).
pub fn initial_bearing_deg(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat_deg.to_radians();
    let phi2 = b.lat_deg.to_radians();
    let delta_lambda = (b.lon_deg - a.lon_deg).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    x.atan2(y).to_degrees().rem_euclid(360.0)
}

/// Smallest angular difference between two headings, in [0, 180].
pub fn angular_difference_deg(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

/// Meters per degree of latitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lat(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_132.954 - 559.822 * (2.0 * lat_rad).cos() + 1.175 * (4.0 * lat_rad).cos()
        - 0.0023 * (6.0 * lat_rad).cos()
}

/// Meters per degree of longitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_412.84 * lat_rad.cos() - 93.5 * (3.0 * lat_rad).cos() + 0.118 * (5.0 * lat_rad).cos()
}

/// Result of projecting a point onto a line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Distance in meters from the point to the closest point on the
    /// segment (the perpendicular offset when the projection falls between
    /// the endpoints, otherwise the distance to the nearer endpoint).
    pub distance_m: f64,
    /// Normalized position of the projection along the segment, clamped
    /// to [0, 1].
    pub along_frac: f64,
    /// Unclamped along-track fraction; values outside [0, 1] mean the
    /// projection falls beyond an endpoint.
    pub raw_frac: f64,
}

/// Project `point` onto the segment from `start` to `end`.
///
/// Coordinates are mapped into a local ENU plane anchored at `start` (a
/// valid approximation for segments of runway/taxiway length) to find the
/// projection fraction; the distance itself is the haversine distance to
/// the closest segment point, so it agrees with [`haversine_distance_m`].
/// A zero-length segment degenerates to the plain distance to `start`.
pub fn point_to_segment(point: GeoPoint, start: GeoPoint, end: GeoPoint) -> SegmentProjection {
    let ref_lat = start.lat_deg;
    let m_lat = meters_per_deg_lat(ref_lat);
    let m_lon = meters_per_deg_lon(ref_lat);

    // Point in local coords
    let px = (point.lon_deg - start.lon_deg) * m_lon;
    let py = (point.lat_deg - start.lat_deg) * m_lat;

    // Segment end in local coords
    let sx = (end.lon_deg - start.lon_deg) * m_lon;
    let sy = (end.lat_deg - start.lat_deg) * m_lat;

    let seg_len_sq = sx * sx + sy * sy;
    if seg_len_sq < 1e-4 {
        return SegmentProjection {
            distance_m: haversine_distance_m(point, start),
            along_frac: 0.0,
            raw_frac: 0.0,
        };
    }

    // t = ((P-A) · (B-A)) / |B-A|²
    let raw = (px * sx + py * sy) / seg_len_sq;
    let t = raw.clamp(0.0, 1.0);

    // Closest segment point back in geographic coordinates; distances to
    // segments and distances to point features share one earth model.
    let closest = GeoPoint::new(
        start.lat_deg + t * (end.lat_deg - start.lat_deg),
        start.lon_deg + t * (end.lon_deg - start.lon_deg),
    );

    SegmentProjection {
        distance_m: haversine_distance_m(point, closest),
        along_frac: t,
        raw_frac: raw,
    }
}
