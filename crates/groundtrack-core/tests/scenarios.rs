//! End-to-end departure scenarios: stand A1, taxiway D, holding point,
//! runway 16C, lift-off. Mirrors a recorded reference flight.

use chrono::{TimeZone, Utc};
use groundtrack_core::geo::{meters_per_deg_lat, meters_per_deg_lon};
use groundtrack_core::{
    AirportLayout, Classifier, FeatureKind, GeoPoint, TelemetrySample, Zone,
};

const LAYOUT_JSON: &str = r#"{
    "name": "Graz Airport",
    "icao": "LOWG",
    "field_elevation_m": 340.0,
    "runways": [
        {
            "ident": "16C/34C",
            "thresholds": [[47.010, 15.4000], [47.000, 15.4015]],
            "width_m": 45.0
        }
    ],
    "taxiways": [
        {
            "ident": "D",
            "centerline": [[47.005, 15.390], [47.005, 15.400]],
            "width_m": 20.0
        }
    ],
    "parking_positions": [
        {"ident": "A1", "position": [47.0050, 15.3900], "heading_deg": 90.0, "radius_m": 5.0}
    ],
    "holding_points": [
        {"ident": "D1", "position": [47.0050, 15.3998], "runway": "16C", "taxiway": "D"}
    ]
}"#;

const FIELD_ELEVATION_M: f64 = 340.0;

fn layout() -> AirportLayout {
    AirportLayout::from_json_str(LAYOUT_JSON).expect("fixture layout must load")
}

fn offset(base: GeoPoint, north_m: f64, east_m: f64) -> GeoPoint {
    GeoPoint::new(
        base.lat_deg + north_m / meters_per_deg_lat(base.lat_deg),
        base.lon_deg + east_m / meters_per_deg_lon(base.lat_deg),
    )
}

fn sample(position: GeoPoint, heading_deg: f64, speed_mps: f64, altitude_m: f64) -> TelemetrySample {
    TelemetrySample {
        position,
        heading_deg,
        ground_speed_mps: speed_mps,
        altitude_m,
        timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap(),
    }
}

#[test]
fn scenario_1_creeping_at_stand_is_parking() {
    let layout = layout();
    let classifier = Classifier::default();
    let stand = layout.parking_positions[0].position;

    let s = sample(offset(stand, 2.0, 0.0), 90.0, 0.1, FIELD_ELEVATION_M);
    let result = classifier.classify(&layout, &s).unwrap();

    assert_eq!(result.zone, Zone::AtParking { stand: "A1".into() });
    assert!((result.distance_m.unwrap() - 2.0).abs() < 0.2);
}

#[test]
fn scenario_2_mid_taxiway_d() {
    let layout = layout();
    let classifier = Classifier::default();

    let s = sample(
        offset(GeoPoint::new(47.005, 15.395), 2.0, 0.0),
        90.0,
        3.0,
        FIELD_ELEVATION_M,
    );
    let result = classifier.classify(&layout, &s).unwrap();

    assert_eq!(result.zone, Zone::OnTaxiway { taxiway: "D".into() });
}

#[test]
fn scenario_3_stopped_at_holding_point_for_16c() {
    let layout = layout();
    let classifier = Classifier::default();
    let hp = layout.holding_points[0].position;

    let s = sample(offset(hp, 1.0, 0.0), 160.0, 0.0, FIELD_ELEVATION_M);
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
fn scenario_4_takeoff_roll_stays_on_runway_16c() {
    let layout = layout();
    let classifier = Classifier::default();
    let runway_heading = layout.runways[0].ends[0].heading_deg;
    let threshold_16c = layout.runways[0].ends[0].threshold;

    // Speed ramping through the roll, drifting down the centerline. The
    // centerline runs ~174°, about 10.3 m east per 100 m south.
    for (along_m, speed) in [(100.0, 5.0), (300.0, 15.0), (600.0, 28.0), (900.0, 40.0)] {
        let position = offset(threshold_16c, -along_m, along_m * 0.1026);
        let s = sample(position, runway_heading + 4.0, speed, FIELD_ELEVATION_M);
        let result = classifier.classify(&layout, &s).unwrap();
        assert_eq!(
            result.zone,
            Zone::OnRunway { runway: "16C".into() },
            "at {along_m} m down the roll"
        );
    }
}

#[test]
fn scenario_5_climbout_is_airborne() {
    let layout = layout();
    let classifier = Classifier::default();

    let s = sample(
        offset(GeoPoint::new(47.000, 15.4015), -1500.0, 500.0),
        165.0,
        75.0,
        FIELD_ELEVATION_M + 300.0,
    );
    let result = classifier.classify(&layout, &s).unwrap();

    assert_eq!(result.zone, Zone::Airborne);
    assert_eq!(result.distance_m, None);
}

#[test]
fn scenario_6_off_every_feature_is_unknown_with_diagnostics() {
    let layout = layout();
    let classifier = Classifier::default();

    // 50 m north of taxiway D: beyond every acceptance threshold but
    // neither fast nor high enough to be airborne.
    let s = sample(
        offset(GeoPoint::new(47.005, 15.395), 50.0, 0.0),
        90.0,
        4.0,
        FIELD_ELEVATION_M,
    );
    let result = classifier.classify(&layout, &s).unwrap();

    match &result.zone {
        Zone::Unknown { nearest: Some(n) } => {
            assert_eq!(n.kind, FeatureKind::Taxiway);
            assert_eq!(n.ident, "D");
            assert!((n.distance_m - 50.0).abs() < 1.0);
        }
        other => panic!("expected UNKNOWN with nearest feature, got {other:?}"),
    }
}

#[test]
fn results_are_deterministic_across_the_whole_flight() {
    let layout = layout();
    let classifier = Classifier::default();
    let points = [
        sample(layout.parking_positions[0].position, 90.0, 0.0, FIELD_ELEVATION_M),
        sample(offset(GeoPoint::new(47.005, 15.395), 1.0, 0.0), 90.0, 3.0, FIELD_ELEVATION_M),
        sample(layout.holding_points[0].position, 160.0, 0.0, FIELD_ELEVATION_M),
    ];

    for s in &points {
        let first = classifier.classify(&layout, s).unwrap();
        let second = classifier.classify(&layout, s).unwrap();
        assert_eq!(first, second);
    }
}
