//! Datagram formats spoken by flight simulators.
//!
//! Three newline-free ASCII messages, each prefixed with a tag and the
//! simulator's name:
//!
//! ```text
//! XGPS<sim>,<longitude>,<latitude>,<altitude_msl_m>,<track_true_deg>,<groundspeed_mps>
//! XATT<sim>,<true_heading_deg>,<pitch_deg>,<roll_deg>
//! XAIRCRAFT<sim>,<device>,<icao_address>,<type>,<registration>,<callsign>,
//! ```
//!
//! Note the GPS message carries longitude before latitude.

use crate::FeedError;

/// One parsed datagram.
#[derive(Debug, Clone, PartialEq)]
pub enum WireMessage {
    Gps(GpsReport),
    Attitude(AttitudeReport),
    Aircraft(AircraftInfo),
}

/// Position fix from the simulator's GPS message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsReport {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub altitude_msl_m: f64,
    pub track_deg: f64,
    pub ground_speed_mps: f64,
}

/// Attitude message; only the true heading matters for classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttitudeReport {
    pub true_heading_deg: f64,
    pub pitch_deg: f64,
    pub roll_deg: f64,
}

/// Aircraft identity broadcast alongside the telemetry.
#[derive(Debug, Clone, PartialEq)]
pub struct AircraftInfo {
    pub icao_address: Option<String>,
    pub type_code: Option<String>,
    pub callsign: Option<String>,
}

/// Parse one datagram payload.
///
/// A malformed datagram is an isolated failure: the caller logs it and
/// keeps reading the socket.
pub fn parse_datagram(text: &str) -> Result<WireMessage, FeedError> {
    let text = text.trim_end_matches(['\r', '\n', '\0']);
    if let Some(rest) = text.strip_prefix("XAIRCRAFT") {
        return parse_aircraft(rest);
    }
    if let Some(rest) = text.strip_prefix("XGPS") {
        return parse_gps(rest);
    }
    if let Some(rest) = text.strip_prefix("XATT") {
        return parse_attitude(rest);
    }
    Err(FeedError::UnknownMessage {
        prefix: text.chars().take(12).collect(),
    })
}

fn parse_gps(rest: &str) -> Result<WireMessage, FeedError> {
    // First field is the simulator name; the five numbers follow.
    let mut fields = rest.split(',').skip(1);
    let lon_deg = number("XGPS", "longitude", fields.next())?;
    let lat_deg = number("XGPS", "latitude", fields.next())?;
    let altitude_msl_m = number("XGPS", "altitude_msl", fields.next())?;
    let track_deg = number("XGPS", "track", fields.next())?;
    let ground_speed_mps = number("XGPS", "groundspeed", fields.next())?;

    Ok(WireMessage::Gps(GpsReport {
        lat_deg,
        lon_deg,
        altitude_msl_m,
        track_deg,
        ground_speed_mps,
    }))
}

fn parse_attitude(rest: &str) -> Result<WireMessage, FeedError> {
    let mut fields = rest.split(',').skip(1);
    let true_heading_deg = number("XATT", "true_heading", fields.next())?;
    let pitch_deg = number("XATT", "pitch", fields.next())?;
    let roll_deg = number("XATT", "roll", fields.next())?;

    Ok(WireMessage::Attitude(AttitudeReport {
        true_heading_deg,
        pitch_deg,
        roll_deg,
    }))
}

fn parse_aircraft(rest: &str) -> Result<WireMessage, FeedError> {
    let mut fields = rest.split(',').skip(1);
    let _device = fields.next();
    let icao_address = nonempty(fields.next());
    let type_code = nonempty(fields.next());
    let _registration = fields.next();
    let callsign = nonempty(fields.next());

    Ok(WireMessage::Aircraft(AircraftInfo {
        icao_address,
        type_code,
        callsign,
    }))
}

fn nonempty(field: Option<&str>) -> Option<String> {
    field.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

fn number(
    message: &'static str,
    field: &'static str,
    value: Option<&str>,
) -> Result<f64, FeedError> {
    let raw = value.ok_or(FeedError::MissingField { message, field })?;
    raw.trim().parse().map_err(|_| FeedError::BadNumber {
        message,
        field,
        value: raw.to_string(),
    })
}
