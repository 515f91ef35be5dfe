//! Boundary types handed over by the external planning/dispatch layer.
//!
//! Everything here is optional because the planner fills it in piecemeal;
//! `snapshot::validate` decides whether a plan is complete enough to fly.

pub mod presets;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

// ---------------------------------------------------------------------------
// Runways
// ---------------------------------------------------------------------------

/// One physical end of a runway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunwayEnd {
    pub designator: String,
    pub threshold: Option<GeoPoint>,
    #[serde(default)]
    pub elevation_ft: f64,
}

/// A runway record as stored by the airport database (both ends).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Runway {
    pub ends: Vec<RunwayEnd>,
    /// Published length. Not trusted; geometry is rebuilt from the thresholds.
    #[serde(default)]
    pub length_ft: Option<f64>,
}

impl Runway {
    pub fn end(&self, designator: &str) -> Option<&RunwayEnd> {
        self.ends.iter().find(|e| e.designator == designator)
    }

    /// The end facing the one in use.
    pub fn opposite_end(&self, designator: &str) -> Option<&RunwayEnd> {
        self.ends.iter().find(|e| e.designator != designator)
    }
}

/// A runway plus the end the planner selected for takeoff or landing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunwaySelection {
    pub runway: Runway,
    pub designator: String,
}

impl RunwaySelection {
    pub fn selected_end(&self) -> Option<&RunwayEnd> {
        self.runway.end(&self.designator)
    }
}

// ---------------------------------------------------------------------------
// Aircraft
// ---------------------------------------------------------------------------

/// Performance record. Anything left `None` is derived by the snapshot builder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AircraftPerformance {
    pub type_code: String,
    pub cruise_speed_kts: f64,
    pub cruise_altitude_ft: f64,
    pub descent_rate_fpm: Option<f64>,
    pub initial_climb_rate_fpm: Option<f64>,
    pub cruise_climb_rate_fpm: Option<f64>,
    pub takeoff_distance_ft: Option<f64>,
    pub v1_kts: Option<f64>,
    pub vr_kts: Option<f64>,
    pub v2_kts: Option<f64>,
    pub vref_kts: Option<f64>,
    pub approach_speed_kts: Option<f64>,
}

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaypointKind {
    Departure,
    Enroute,
    Arrival,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub altitude_ft: f64,
    pub kind: WaypointKind,
}

impl Waypoint {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub waypoints: Vec<Waypoint>,
}

// ---------------------------------------------------------------------------
// Planning state
// ---------------------------------------------------------------------------

/// The planner's working state at the moment the user asks to fly it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanningState {
    pub departure_icao: Option<String>,
    pub arrival_icao: Option<String>,
    pub departure_runway: Option<RunwaySelection>,
    pub arrival_runway: Option<RunwaySelection>,
    pub aircraft: Option<AircraftPerformance>,
    pub route: Option<Route>,
}

impl PlanningState {
    /// Parse a plan exported by the planning screen as JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runway() -> Runway {
        Runway {
            ends: vec![
                RunwayEnd {
                    designator: "09".into(),
                    threshold: Some(GeoPoint::new(40.0, -100.0)),
                    elevation_ft: 0.0,
                },
                RunwayEnd {
                    designator: "27".into(),
                    threshold: Some(GeoPoint::new(40.0, -99.97)),
                    elevation_ft: 0.0,
                },
            ],
            length_ft: None,
        }
    }

    #[test]
    fn opposite_end_lookup() {
        let rwy = runway();
        assert_eq!(rwy.opposite_end("09").map(|e| e.designator.as_str()), Some("27"));
        assert_eq!(rwy.opposite_end("27").map(|e| e.designator.as_str()), Some("09"));
    }

    #[test]
    fn single_ended_runway_has_no_opposite() {
        let mut rwy = runway();
        rwy.ends.truncate(1);
        assert!(rwy.opposite_end("09").is_none());
    }

    #[test]
    fn plan_parses_from_camel_case_json() {
        let json = r#"{
            "departureIcao": "KDEN",
            "aircraft": { "typeCode": "B738", "cruiseSpeedKts": 450, "cruiseAltitudeFt": 35000 },
            "route": { "waypoints": [
                { "id": "A", "lat": 1.0, "lon": 2.0, "kind": "DEPARTURE" },
                { "id": "B", "lat": 3.0, "lon": 4.0, "altitudeFt": 35000, "kind": "ENROUTE" }
            ] }
        }"#;
        let plan = PlanningState::from_json(json).unwrap();
        assert_eq!(plan.departure_icao.as_deref(), Some("KDEN"));
        assert!(plan.arrival_icao.is_none());
        let aircraft = plan.aircraft.unwrap();
        assert_eq!(aircraft.cruise_speed_kts, 450.0);
        assert!(aircraft.v1_kts.is_none());
        let route = plan.route.unwrap();
        assert_eq!(route.waypoints[1].kind, WaypointKind::Enroute);
        assert_eq!(route.waypoints[0].altitude_ft, 0.0);
    }
}
