//! Telemetry acquisition for groundtrack.
//!
//! Two sample sources feeding the classifier: a UDP listener for the
//! simulator's live broadcast and a CSV reader for recorded flights, plus
//! the zone debouncer that smooths classified output across samples.

pub mod debounce;
pub mod listener;
pub mod replay;
pub mod wire;

pub use debounce::ZoneDebouncer;
pub use listener::{DEFAULT_UDP_PORT, SampleAssembler, run_on_socket, run_udp_feed};
pub use replay::ReplayReader;
pub use wire::{AircraftInfo, AttitudeReport, GpsReport, WireMessage, parse_datagram};

use thiserror::Error;

/// A feed input that cannot be turned into a telemetry sample.
///
/// Always an isolated failure: the offending datagram or row is dropped
/// and the stream continues.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("unrecognized datagram (starts with `{prefix}`)")]
    UnknownMessage { prefix: String },
    #[error("{message} datagram missing field `{field}`")]
    MissingField {
        message: &'static str,
        field: &'static str,
    },
    #[error("{message} datagram field `{field}` is not a number (got `{value}`)")]
    BadNumber {
        message: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("failed to read recording")]
    Io(#[from] std::io::Error),
    #[error("malformed recording row")]
    Csv(#[from] csv::Error),
}
