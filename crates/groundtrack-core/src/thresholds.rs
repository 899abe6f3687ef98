//! Classification thresholds.
//!
//! Every numeric gate in the classifier is a policy decision, not an
//! incidental value; different airports and aircraft classes need different
//! tolerances, so all of them live here and deserialize from JSON with
//! per-field defaults (a partial override file is enough).

use serde::{Deserialize, Serialize};

/// Configuration for the position classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Below this ground speed the aircraft counts as stationary
    pub stationary_speed_mps: f64,
    /// Acceptance radius around a holding point
    pub holding_point_radius_m: f64,
    /// Fallback acceptance radius for parking stands that publish none
    pub default_parking_radius_m: f64,
    /// Maximum deviation between sample heading and runway heading for a
    /// sample to be attributed to that runway
    pub runway_heading_tolerance_deg: f64,
    /// Above this ground speed, with no ground zone matched, the sample is
    /// treated as airborne
    pub airborne_speed_mps: f64,
    /// Height above field elevation beyond which the sample is airborne
    pub airborne_altitude_margin_m: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            stationary_speed_mps: 0.5,
            holding_point_radius_m: 5.0,
            default_parking_radius_m: 5.0,
            runway_heading_tolerance_deg: 45.0,
            airborne_speed_mps: 10.0,
            airborne_altitude_margin_m: 50.0,
        }
    }
}
