//! The position classifier: one telemetry sample in, one zone out.
//!
//! Checks run in priority order, first match wins. Smaller and more
//! specific zones (parking stands, holding points) come before linear ones
//! (runways, taxiways) so a stopped aircraft on a holding point is never
//! misreported as "on taxiway". The classifier holds no state between
//! calls; smoothing across samples belongs in a caller-side wrapper.

use crate::geo::angular_difference_deg;
use crate::layout::AirportLayout;
use crate::models::{
    Classification, FeatureKind, NearestFeature, SampleError, TelemetrySample, Zone,
};
use crate::thresholds::Thresholds;

/// Stateless classifier. `Send + Sync`; one instance may serve any number
/// of threads classifying against the same shared layout.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    thresholds: Thresholds,
}

impl Classifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Classify one sample against a layout.
    ///
    /// Deterministic and side-effect-free: identical inputs produce
    /// identical results. A malformed sample fails with [`SampleError`];
    /// the caller drops that one sample and keeps classifying.
    pub fn classify(
        &self,
        layout: &AirportLayout,
        sample: &TelemetrySample,
    ) -> Result<Classification, SampleError> {
        sample.validate()?;

        let t = &self.thresholds;
        let point = sample.position;
        let speed = sample.ground_speed_mps;

        // Smallest distance seen across all checks, for the UNKNOWN fallback
        let mut nearest: Option<NearestFeature> = None;
        let mut track = |kind: FeatureKind, ident: &str, distance_m: f64| {
            if nearest.as_ref().map_or(true, |n| distance_m < n.distance_m) {
                nearest = Some(NearestFeature {
                    kind,
                    ident: ident.to_string(),
                    distance_m,
                });
            }
        };

        // 1. Parking: stationary within the stand's acceptance radius
        if let Some((parking, distance_m)) = layout.nearest_parking(point) {
            let radius = parking.radius_m.unwrap_or(t.default_parking_radius_m);
            if distance_m <= radius && speed <= t.stationary_speed_mps {
                return Ok(self.result(
                    Zone::AtParking {
                        stand: parking.ident.clone(),
                    },
                    Some(distance_m),
                    sample,
                ));
            }
            track(FeatureKind::Parking, &parking.ident, distance_m);
        }

        // 2. Holding point: stationary short of a runway
        if let Some((hp, distance_m)) = layout.nearest_holding_point(point) {
            if distance_m <= t.holding_point_radius_m && speed <= t.stationary_speed_mps {
                return Ok(self.result(
                    Zone::AtHoldingPoint {
                        holding_point: hp.ident.clone(),
                        runway: hp.runway_ident.clone(),
                    },
                    Some(distance_m),
                    sample,
                ));
            }
            track(FeatureKind::HoldingPoint, &hp.ident, distance_m);
        }

        // 3. Runway: between thresholds, inside the width, roughly aligned
        if let Some(fix) = layout.nearest_runway(point) {
            let between_thresholds = (0.0..=1.0).contains(&fix.along_frac);
            let inside_width = fix.cross_track_m <= fix.runway.width_m / 2.0;
            // Alignment is judged against the end the aircraft is
            // tracking, not the geometrically nearer one: past the
            // midpoint the nearer end is the reciprocal, ~180° off the
            // direction of travel.
            let tracked_end = fix
                .runway
                .ends
                .iter()
                .min_by(|a, b| {
                    angular_difference_deg(sample.heading_deg, a.heading_deg)
                        .total_cmp(&angular_difference_deg(sample.heading_deg, b.heading_deg))
                })
                .unwrap_or(fix.nearer_end);
            let aligned = angular_difference_deg(sample.heading_deg, tracked_end.heading_deg)
                <= t.runway_heading_tolerance_deg;
            if between_thresholds && inside_width && aligned {
                return Ok(self.result(
                    Zone::OnRunway {
                        runway: tracked_end.ident.clone(),
                    },
                    Some(fix.cross_track_m),
                    sample,
                ));
            }
            track(FeatureKind::Runway, &fix.runway.ident(), fix.cross_track_m);
        }

        // 4. Taxiway: inside the width, any heading (taxiways permit turns)
        if let Some(fix) = layout.nearest_taxiway(point) {
            if fix.cross_track_m <= fix.taxiway.width_m / 2.0 {
                return Ok(self.result(
                    Zone::OnTaxiway {
                        taxiway: fix.taxiway.ident.clone(),
                    },
                    Some(fix.cross_track_m),
                    sample,
                ));
            }
            track(FeatureKind::Taxiway, &fix.taxiway.ident, fix.cross_track_m);
        }

        // 5. Airborne: well above the field, or too fast for any ground zone
        let above_field =
            sample.altitude_m > layout.field_elevation_m + t.airborne_altitude_margin_m;
        if above_field || speed > t.airborne_speed_mps {
            return Ok(self.result(Zone::Airborne, None, sample));
        }

        // 6. No zone matched confidently; report the closest miss
        let distance_m = nearest.as_ref().map(|n| n.distance_m);
        Ok(self.result(Zone::Unknown { nearest }, distance_m, sample))
    }

    fn result(
        &self,
        zone: Zone,
        distance_m: Option<f64>,
        sample: &TelemetrySample,
    ) -> Classification {
        Classification {
            zone,
            distance_m,
            heading_deg: sample.heading_deg,
            ground_speed_mps: sample.ground_speed_mps,
            timestamp: sample.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GeoPoint, meters_per_deg_lat, meters_per_deg_lon};
    use crate::layout::{HoldingPoint, ParkingPosition, Runway, RunwayEnd, Taxiway};
    use chrono::{TimeZone, Utc};

    const FIELD_ELEVATION_M: f64 = 340.0;

    // Runway 16C/34C running roughly south, taxiway D feeding it, one
    // stand, one holding point. Geometry around 47°N / 15.4°E.
    fn layout() -> AirportLayout {
        let t1 = GeoPoint::new(47.010, 15.4000);
        let t2 = GeoPoint::new(47.000, 15.4015);
        let heading1 = crate::geo::initial_bearing_deg(t1, t2);
        let heading2 = crate::geo::initial_bearing_deg(t2, t1);
        let layout = AirportLayout {
            name: "Test Field".into(),
            icao: "TEST".into(),
            field_elevation_m: FIELD_ELEVATION_M,
            runways: vec![Runway {
                ends: [
                    RunwayEnd {
                        ident: "16C".into(),
                        threshold: t1,
                        heading_deg: heading1,
                    },
                    RunwayEnd {
                        ident: "34C".into(),
                        threshold: t2,
                        heading_deg: heading2,
                    },
                ],
                width_m: 45.0,
            }],
            taxiways: vec![Taxiway {
                ident: "D".into(),
                centerline: vec![GeoPoint::new(47.005, 15.390), GeoPoint::new(47.005, 15.400)],
                width_m: 20.0,
            }],
            parking_positions: vec![ParkingPosition {
                ident: "A1".into(),
                position: GeoPoint::new(47.0050, 15.3900),
                heading_deg: 90.0,
                radius_m: Some(5.0),
            }],
            holding_points: vec![HoldingPoint {
                ident: "D1".into(),
                position: GeoPoint::new(47.0050, 15.3998),
                runway_ident: "16C".into(),
                taxiway_ident: "D".into(),
            }],
        };
        layout.validate().expect("fixture layout must be valid");
        layout
    }

    fn sample(position: GeoPoint, heading_deg: f64, speed: f64, altitude_m: f64) -> TelemetrySample {
        TelemetrySample {
            position,
            heading_deg,
            ground_speed_mps: speed,
            altitude_m,
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    fn offset(base: GeoPoint, north_m: f64, east_m: f64) -> GeoPoint {
        GeoPoint::new(
            base.lat_deg + north_m / meters_per_deg_lat(base.lat_deg),
            base.lon_deg + east_m / meters_per_deg_lon(base.lat_deg),
        )
    }

    #[test]
    fn stationary_at_stand_center_is_parking() {
        let layout = layout();
        let classifier = Classifier::default();
        let s = sample(layout.parking_positions[0].position, 90.0, 0.0, FIELD_ELEVATION_M);
        let result = classifier.classify(&layout, &s).unwrap();
        assert_eq!(result.zone, Zone::AtParking { stand: "A1".into() });
        assert!(result.distance_m.unwrap() < 0.01);
    }

    #[test]
    fn moving_at_stand_is_not_parking() {
        let layout = layout();
        let classifier = Classifier::default();
        let s = sample(layout.parking_positions[0].position, 90.0, 3.0, FIELD_ELEVATION_M);
        let result = classifier.classify(&layout, &s).unwrap();
        assert!(!matches!(result.zone, Zone::AtParking { .. }));
    }

    #[test]
    fn stopped_at_holding_point_beats_taxiway() {
        let layout = layout();
        let classifier = Classifier::default();
        // The holding point sits on taxiway D; a stopped aircraft there
        // must report the holding point, not the taxiway.
        let s = sample(layout.holding_points[0].position, 160.0, 0.0, FIELD_ELEVATION_M);
        let result = classifier.classify(&layout, &s).unwrap();
        assert_eq!(
            result.zone,
            Zone::AtHoldingPoint {
                holding_point: "D1".into(),
                runway: "16C".into(),
            }
        );
    }

    #[test]
    fn aligned_roll_on_centerline_is_on_runway() {
        let layout = layout();
        let classifier = Classifier::default();
        let runway_heading = layout.runways[0].ends[0].heading_deg;
        let mid = offset(layout.runways[0].ends[0].threshold, -500.0, 60.0);

        for speed in [5.0, 20.0, 40.0] {
            let s = sample(mid, runway_heading + 3.0, speed, FIELD_ELEVATION_M);
            let result = classifier.classify(&layout, &s).unwrap();
            assert_eq!(
                result.zone,
                Zone::OnRunway { runway: "16C".into() },
                "speed {speed}"
            );
        }
    }

    #[test]
    fn roll_past_midpoint_still_reports_departure_end() {
        let layout = layout();
        let classifier = Classifier::default();
        let runway_heading = layout.runways[0].ends[0].heading_deg;
        // Past the midpoint the nearer end is 34C; the sample still
        // tracks 16C at liftoff speed and must stay ON_RUNWAY 16C.
        let late = offset(layout.runways[0].ends[0].threshold, -900.0, 92.3);
        let s = sample(late, runway_heading + 2.0, 38.0, FIELD_ELEVATION_M);
        let result = classifier.classify(&layout, &s).unwrap();
        assert_eq!(result.zone, Zone::OnRunway { runway: "16C".into() });
    }

    #[test]
    fn opposite_direction_reports_reciprocal_end() {
        let layout = layout();
        let classifier = Classifier::default();
        let reciprocal = layout.runways[0].ends[1].heading_deg;
        // Near the 34C threshold, tracking 34C
        let near_34c = offset(layout.runways[0].ends[1].threshold, 100.0, -15.0);
        let s = sample(near_34c, reciprocal, 25.0, FIELD_ELEVATION_M);
        let result = classifier.classify(&layout, &s).unwrap();
        assert_eq!(result.zone, Zone::OnRunway { runway: "34C".into() });
    }

    #[test]
    fn misaligned_heading_is_not_on_runway() {
        let layout = layout();
        let classifier = Classifier::default();
        let runway_heading = layout.runways[0].ends[0].heading_deg;
        let mid = offset(layout.runways[0].ends[0].threshold, -500.0, 60.0);
        let s = sample(mid, runway_heading + 90.0, 8.0, FIELD_ELEVATION_M);
        let result = classifier.classify(&layout, &s).unwrap();
        assert!(!matches!(result.zone, Zone::OnRunway { .. }));
    }

    #[test]
    fn beyond_threshold_is_not_on_runway() {
        let layout = layout();
        let classifier = Classifier::default();
        let runway_heading = layout.runways[0].ends[0].heading_deg;
        // 200 m short of the 16C threshold, on the extended centerline
        let short = offset(layout.runways[0].ends[0].threshold, 200.0, -30.0);
        let s = sample(short, runway_heading, 8.0, FIELD_ELEVATION_M);
        let result = classifier.classify(&layout, &s).unwrap();
        assert!(!matches!(result.zone, Zone::OnRunway { .. }));
    }

    #[test]
    fn wide_of_runway_never_matches_regardless_of_speed() {
        let layout = layout();
        let classifier = Classifier::default();
        let runway_heading = layout.runways[0].ends[0].heading_deg;
        // Well wide of the 45 m runway
        let wide = offset(layout.runways[0].ends[0].threshold, -500.0, 135.0);
        for speed in [0.0, 8.0, 40.0] {
            let s = sample(wide, runway_heading, speed, FIELD_ELEVATION_M);
            let result = classifier.classify(&layout, &s).unwrap();
            assert!(!matches!(result.zone, Zone::OnRunway { .. }), "speed {speed}");
        }
    }

    #[test]
    fn taxiing_on_centerline_is_on_taxiway() {
        let layout = layout();
        let classifier = Classifier::default();
        let mid = offset(GeoPoint::new(47.005, 15.395), 2.0, 0.0);
        let s = sample(mid, 90.0, 3.0, FIELD_ELEVATION_M);
        let result = classifier.classify(&layout, &s).unwrap();
        assert_eq!(result.zone, Zone::OnTaxiway { taxiway: "D".into() });
        assert!((result.distance_m.unwrap() - 2.0).abs() < 0.2);
    }

    #[test]
    fn high_above_field_is_airborne() {
        let layout = layout();
        let classifier = Classifier::default();
        let far = offset(GeoPoint::new(47.005, 15.395), 0.0, -2000.0);
        let s = sample(far, 270.0, 70.0, FIELD_ELEVATION_M + 300.0);
        let result = classifier.classify(&layout, &s).unwrap();
        assert_eq!(result.zone, Zone::Airborne);
        assert_eq!(result.distance_m, None);
    }

    #[test]
    fn fast_with_no_ground_match_is_airborne() {
        let layout = layout();
        let classifier = Classifier::default();
        let off_field = offset(GeoPoint::new(47.005, 15.395), 500.0, 0.0);
        let s = sample(off_field, 0.0, 30.0, FIELD_ELEVATION_M);
        let result = classifier.classify(&layout, &s).unwrap();
        assert_eq!(result.zone, Zone::Airborne);
    }

    #[test]
    fn between_zones_is_unknown_with_nearest_feature() {
        let layout = layout();
        let classifier = Classifier::default();
        // 50 m north of taxiway D, slow, on the ground
        let near_d = offset(GeoPoint::new(47.005, 15.395), 50.0, 0.0);
        let s = sample(near_d, 90.0, 3.0, FIELD_ELEVATION_M);
        let result = classifier.classify(&layout, &s).unwrap();
        match &result.zone {
            Zone::Unknown { nearest: Some(n) } => {
                assert_eq!(n.kind, FeatureKind::Taxiway);
                assert_eq!(n.ident, "D");
                assert!((n.distance_m - 50.0).abs() < 1.0);
            }
            other => panic!("expected UNKNOWN with nearest feature, got {other:?}"),
        }
        assert!((result.distance_m.unwrap() - 50.0).abs() < 1.0);
    }

    #[test]
    fn classify_is_idempotent() {
        let layout = layout();
        let classifier = Classifier::default();
        let s = sample(layout.holding_points[0].position, 160.0, 0.0, FIELD_ELEVATION_M);
        let first = classifier.classify(&layout, &s).unwrap();
        let second = classifier.classify(&layout, &s).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_latitude_is_rejected_without_poisoning_the_stream() {
        let layout = layout();
        let classifier = Classifier::default();
        let bad = sample(GeoPoint::new(95.0, 15.4), 90.0, 0.0, FIELD_ELEVATION_M);
        assert!(matches!(
            classifier.classify(&layout, &bad),
            Err(SampleError::LatitudeOutOfRange { .. })
        ));

        // The next (valid) sample still classifies normally
        let good = sample(layout.parking_positions[0].position, 90.0, 0.0, FIELD_ELEVATION_M);
        assert!(classifier.classify(&layout, &good).is_ok());
    }

    #[test]
    fn unpublished_parking_radius_uses_configured_default() {
        let mut layout = layout();
        layout.parking_positions[0].radius_m = None;
        let classifier = Classifier::new(Thresholds {
            default_parking_radius_m: 10.0,
            ..Thresholds::default()
        });
        let eight_m_off = offset(layout.parking_positions[0].position, 8.0, 0.0);
        let s = sample(eight_m_off, 90.0, 0.0, FIELD_ELEVATION_M);
        let result = classifier.classify(&layout, &s).unwrap();
        assert_eq!(result.zone, Zone::AtParking { stand: "A1".into() });
    }
}
