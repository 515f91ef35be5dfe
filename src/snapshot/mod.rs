//! Frozen per-flight input to the simulation.
//!
//! A `SimulationSnapshot` is produced once by the builder and then only ever
//! read. Its fields are private and exposed through `&` accessors; the
//! scheduler shares it behind an `Arc`.

pub mod builder;
pub mod performance;

pub use builder::{create_snapshot, validate, SnapshotBuilder};
pub use performance::AircraftProfile;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::geo::{self, GeoPoint, FT_PER_NM};
use crate::planning::WaypointKind;

// ---------------------------------------------------------------------------
// Tunable control constants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Proportional glideslope correction, fpm of vertical speed per ft of error.
    pub glideslope_gain: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self { glideslope_gain: 5.0 }
    }
}

// ---------------------------------------------------------------------------
// Runway geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RunwayGeometry {
    pub designator: String,
    pub threshold: GeoPoint,
    pub opposite_threshold: GeoPoint,
    pub heading_deg: f64,     // true
    pub length_ft: f64,
    pub length_nm: f64,
    pub unit: Vector2<f64>,   // [east, north] direction cosines
    pub elevation_ft: f64,
}

impl RunwayGeometry {
    pub fn from_thresholds(
        designator: impl Into<String>,
        threshold: GeoPoint,
        opposite_threshold: GeoPoint,
        elevation_ft: f64,
    ) -> Self {
        let length_ft = geo::great_circle_distance_ft(threshold, opposite_threshold);
        Self {
            designator: designator.into(),
            threshold,
            opposite_threshold,
            heading_deg: geo::heading(threshold, opposite_threshold),
            length_ft,
            length_nm: length_ft / FT_PER_NM,
            unit: geo::runway_unit_vector(threshold, opposite_threshold),
            elevation_ft,
        }
    }

    /// Point `distance_ft` down the centreline from the threshold.
    pub fn position_at(&self, distance_ft: f64) -> GeoPoint {
        geo::position_on_runway(self.threshold, &self.unit, distance_ft)
    }

    /// Inverse of [`RunwayGeometry::position_at`]; negative before the threshold.
    pub fn along_track_ft(&self, p: GeoPoint) -> f64 {
        geo::along_runway_ft(self.threshold, &self.unit, p)
    }
}

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RouteWaypoint {
    pub id: String,
    pub position: GeoPoint,
    pub altitude_ft: f64,
    pub kind: WaypointKind,
    pub to_threshold_nm: f64, // along-route distance from here to the arrival threshold
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrozenRoute {
    pub waypoints: Vec<RouteWaypoint>,
    pub total_distance_nm: f64,
    pub estimated_total_min: f64,
}

impl FrozenRoute {
    pub fn last_index(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    pub fn waypoint(&self, index: usize) -> &RouteWaypoint {
        &self.waypoints[index.min(self.last_index())]
    }

    /// First waypoint the aircraft actually flies to after liftoff.
    pub fn first_active_index(&self) -> usize {
        self.waypoints
            .iter()
            .position(|w| w.kind != WaypointKind::Departure)
            .unwrap_or(self.last_index())
    }

    /// Along-route distance to the arrival threshold via waypoint `index`.
    pub fn remaining_nm(&self, index: usize, position: GeoPoint) -> f64 {
        let wp = self.waypoint(index);
        geo::great_circle_distance_nm(position, wp.position) + wp.to_threshold_nm
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSnapshot {
    departure_icao: String,
    arrival_icao: String,
    departure: RunwayGeometry,
    arrival: RunwayGeometry,
    aircraft: AircraftProfile,
    route: FrozenRoute,
    tuning: Tuning,
}

impl SimulationSnapshot {
    pub fn departure_icao(&self) -> &str {
        &self.departure_icao
    }

    pub fn arrival_icao(&self) -> &str {
        &self.arrival_icao
    }

    pub fn departure(&self) -> &RunwayGeometry {
        &self.departure
    }

    pub fn arrival(&self) -> &RunwayGeometry {
        &self.arrival
    }

    pub fn aircraft(&self) -> &AircraftProfile {
        &self.aircraft
    }

    pub fn route(&self) -> &FrozenRoute {
        &self.route
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn runway_geometry_from_thresholds() {
        let thr = GeoPoint::new(40.0, -100.0);
        let far = geo::destination_point(thr, 90.0, 9000.0 / FT_PER_NM);
        let rwy = RunwayGeometry::from_thresholds("09", thr, far, 5431.0);

        assert_relative_eq!(rwy.length_ft, 9000.0, epsilon = 0.01);
        assert_relative_eq!(rwy.length_nm * FT_PER_NM, rwy.length_ft, epsilon = 1e-9);
        assert!((rwy.heading_deg - 90.0).abs() < 1e-6, "heading {}", rwy.heading_deg);
        assert_eq!(rwy.position_at(0.0), thr);
        assert_eq!(rwy.elevation_ft, 5431.0);
    }

    #[test]
    fn snapshot_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SimulationSnapshot>();
    }
}
