use crate::geo::{destination_point, heading, normalize_heading, GeoPoint, FT_PER_NM};

use super::{
    AircraftPerformance, PlanningState, Route, Runway, RunwayEnd, RunwaySelection, Waypoint,
    WaypointKind,
};

// ---------------------------------------------------------------------------
// Preset plans
// ---------------------------------------------------------------------------

/// Sea-level 9,000 ft runway on 090, three waypoints over 500 nm, FL330 at 450 kt.
///
/// Every point sits on the great circle leaving the departure threshold due
/// east, so the arrival runway lines up with the inbound course.
pub fn demo_plan() -> PlanningState {
    let dep_thr = GeoPoint::new(40.0, -100.0);
    let along = |nm: f64| destination_point(dep_thr, 90.0, nm);

    let arr_thr = along(512.0);
    let arr_heading = normalize_heading(heading(arr_thr, dep_thr) + 180.0);

    PlanningState {
        departure_icao: Some("KDEP".into()),
        arrival_icao: Some("KARR".into()),
        departure_runway: Some(runway_pair(dep_thr, 90.0, 9000.0, "09", "27")),
        arrival_runway: Some(runway_pair(arr_thr, arr_heading, 9000.0, "10", "28")),
        aircraft: Some(AircraftPerformance {
            type_code: "A320".into(),
            cruise_speed_kts: 450.0,
            cruise_altitude_ft: 33_000.0,
            takeoff_distance_ft: Some(6500.0),
            ..Default::default()
        }),
        route: Some(Route {
            waypoints: vec![
                waypoint("DEPRT", along(0.0), 0.0, WaypointKind::Departure),
                waypoint("MIDPT", along(250.0), 33_000.0, WaypointKind::Enroute),
                waypoint("ARRVL", along(500.0), 3000.0, WaypointKind::Arrival),
            ],
        }),
    }
}

fn runway_pair(
    threshold: GeoPoint,
    heading_deg: f64,
    length_ft: f64,
    designator: &str,
    opposite: &str,
) -> RunwaySelection {
    let far = destination_point(threshold, heading_deg, length_ft / FT_PER_NM);
    RunwaySelection {
        runway: Runway {
            ends: vec![
                RunwayEnd {
                    designator: designator.into(),
                    threshold: Some(threshold),
                    elevation_ft: 0.0,
                },
                RunwayEnd {
                    designator: opposite.into(),
                    threshold: Some(far),
                    elevation_ft: 0.0,
                },
            ],
            length_ft: Some(length_ft),
        },
        designator: designator.into(),
    }
}

fn waypoint(id: &str, p: GeoPoint, altitude_ft: f64, kind: WaypointKind) -> Waypoint {
    Waypoint {
        id: id.into(),
        lat: p.lat,
        lon: p.lon,
        altitude_ft,
        kind,
    }
}
