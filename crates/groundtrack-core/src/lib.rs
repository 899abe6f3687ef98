//! Groundtrack core - airport surface position classification.
//!
//! Maps one telemetry sample (position, heading, ground speed, altitude)
//! onto a semantic zone of a fixed airport layout: a parking stand, a
//! taxiway, a holding point, a runway, or airborne. The layout is built
//! once at startup and shared read-only; classification is a pure function
//! of the layout and the sample.

pub mod classify;
pub mod geo;
pub mod layout;
pub mod loader;
pub mod models;
pub mod thresholds;

pub use classify::Classifier;
pub use geo::{
    GeoPoint, SegmentProjection, angular_difference_deg, haversine_distance_m,
    initial_bearing_deg, point_to_segment,
};
pub use layout::{
    AirportLayout, HoldingPoint, LayoutError, ParkingPosition, Runway, RunwayEnd, RunwayFix,
    Taxiway, TaxiwayFix,
};
pub use loader::LayoutFile;
pub use models::{
    Classification, FeatureKind, NearestFeature, SampleError, TelemetrySample, Zone,
};
pub use thresholds::Thresholds;
