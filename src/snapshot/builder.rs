use tracing::{debug, info};

use crate::error::SnapshotError;
use crate::geo;
use crate::planning::{PlanningState, Route, RunwayEnd, RunwaySelection};

use super::{
    AircraftProfile, FrozenRoute, RouteWaypoint, RunwayGeometry, SimulationSnapshot, Tuning,
};

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Every reason the plan cannot be flown yet. Empty means ready.
pub fn validate(plan: &PlanningState) -> Vec<String> {
    let mut errors = Vec::new();

    if is_blank(&plan.departure_icao) {
        errors.push("Missing departure ICAO".to_string());
    }
    if is_blank(&plan.arrival_icao) {
        errors.push("Missing arrival ICAO".to_string());
    }

    check_runway(&mut errors, "Departure", plan.departure_runway.as_ref());
    check_runway(&mut errors, "Arrival", plan.arrival_runway.as_ref());

    match &plan.aircraft {
        None => errors.push("Missing aircraft".to_string()),
        Some(perf) => {
            if !(perf.cruise_speed_kts > 0.0) {
                errors.push("Aircraft cruise speed must be positive".to_string());
            }
            if !(perf.cruise_altitude_ft > 0.0) {
                errors.push("Aircraft cruise altitude must be positive".to_string());
            }
            check_positive(&mut errors, "initial climb rate", perf.initial_climb_rate_fpm);
            check_positive(&mut errors, "cruise climb rate", perf.cruise_climb_rate_fpm);
            // Either sign convention is accepted for descent
            check_positive(&mut errors, "descent rate", perf.descent_rate_fpm.map(f64::abs));
            check_positive(&mut errors, "V1", perf.v1_kts);
            check_positive(&mut errors, "VR", perf.vr_kts);
            check_positive(&mut errors, "V2", perf.v2_kts);
            check_positive(&mut errors, "VRef", perf.vref_kts);
            check_positive(&mut errors, "approach speed", perf.approach_speed_kts);
        }
    }

    match &plan.route {
        None => errors.push("Missing route".to_string()),
        Some(route) if route.waypoints.len() < 2 => errors.push(format!(
            "Route needs at least 2 waypoints (has {})",
            route.waypoints.len()
        )),
        Some(_) => {}
    }

    errors
}

/// Optional performance figures may be left out, but not supplied as zero.
fn check_positive(errors: &mut Vec<String>, what: &str, value: Option<f64>) {
    if let Some(v) = value {
        if !(v > 0.0) {
            errors.push(format!("Aircraft {} must be positive (got {})", what, v));
        }
    }
}

fn is_blank(icao: &Option<String>) -> bool {
    icao.as_deref().map_or(true, |s| s.trim().is_empty())
}

fn check_runway(errors: &mut Vec<String>, role: &str, selection: Option<&RunwaySelection>) {
    let Some(sel) = selection else {
        errors.push(format!("Missing {} runway selection", role.to_lowercase()));
        return;
    };
    match sel.selected_end() {
        None => errors.push(format!(
            "{} runway {} is not an end of the selected runway",
            role, sel.designator
        )),
        Some(end) if end.threshold.is_none() => errors.push(format!(
            "{} runway {} has no threshold coordinates",
            role, sel.designator
        )),
        Some(_) => {}
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Builds a snapshot from a plan, failing with every validation error at once.
pub fn create_snapshot(plan: &PlanningState) -> Result<SimulationSnapshot, SnapshotError> {
    SnapshotBuilder::new(plan).build()
}

pub struct SnapshotBuilder<'a> {
    plan: &'a PlanningState,
    tuning: Tuning,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(plan: &'a PlanningState) -> Self {
        Self { plan, tuning: Tuning::default() }
    }

    pub fn tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn glideslope_gain(mut self, gain: f64) -> Self {
        self.tuning.glideslope_gain = gain;
        self
    }

    pub fn build(self) -> Result<SimulationSnapshot, SnapshotError> {
        let errors = validate(self.plan);
        if !errors.is_empty() {
            return Err(SnapshotError::Validation(errors));
        }

        let plan = self.plan;
        let departure = runway_geometry(required(&plan.departure_runway, "departure runway")?)?;
        let arrival = runway_geometry(required(&plan.arrival_runway, "arrival runway")?)?;
        let aircraft = AircraftProfile::derive(required(&plan.aircraft, "aircraft")?);
        let route = freeze_route(
            required(&plan.route, "route")?,
            &arrival,
            aircraft.cruise_speed_kts,
        );

        let snapshot = SimulationSnapshot {
            departure_icao: required(&plan.departure_icao, "departure ICAO")?.trim().to_string(),
            arrival_icao: required(&plan.arrival_icao, "arrival ICAO")?.trim().to_string(),
            departure,
            arrival,
            aircraft,
            route,
            tuning: self.tuning,
        };

        info!(
            departure = snapshot.departure_icao(),
            arrival = snapshot.arrival_icao(),
            route_nm = snapshot.route().total_distance_nm,
            waypoints = snapshot.route().waypoints.len(),
            "Simulation snapshot built"
        );
        Ok(snapshot)
    }
}

fn required<'p, T>(field: &'p Option<T>, name: &str) -> Result<&'p T, SnapshotError> {
    field
        .as_ref()
        .ok_or_else(|| SnapshotError::Invariant(format!("{} vanished after validation", name)))
}

/// The other physical end of `selection`'s runway.
pub fn find_opposite_end(selection: &RunwaySelection) -> Result<&RunwayEnd, SnapshotError> {
    selection
        .runway
        .opposite_end(&selection.designator)
        .ok_or_else(|| {
            SnapshotError::Invariant(format!(
                "runway {} has no opposite end",
                selection.designator
            ))
        })
}

fn runway_geometry(selection: &RunwaySelection) -> Result<RunwayGeometry, SnapshotError> {
    let end = selection.selected_end().ok_or_else(|| {
        SnapshotError::Invariant(format!("runway end {} not found", selection.designator))
    })?;
    let threshold = end.threshold.ok_or_else(|| {
        SnapshotError::Invariant(format!("runway {} lost its threshold", end.designator))
    })?;

    let opposite = find_opposite_end(selection)?;
    let opposite_threshold = opposite.threshold.ok_or_else(|| {
        SnapshotError::Invariant(format!(
            "opposite end {} of runway {} has no threshold",
            opposite.designator, end.designator
        ))
    })?;

    let geometry = RunwayGeometry::from_thresholds(
        end.designator.clone(),
        threshold,
        opposite_threshold,
        end.elevation_ft,
    );
    debug!(
        runway = %geometry.designator,
        heading = geometry.heading_deg,
        length_ft = geometry.length_ft,
        "Runway geometry derived"
    );
    Ok(geometry)
}

fn freeze_route(route: &Route, arrival: &RunwayGeometry, cruise_speed_kts: f64) -> FrozenRoute {
    let mut waypoints: Vec<RouteWaypoint> = route
        .waypoints
        .iter()
        .map(|w| RouteWaypoint {
            id: w.id.clone(),
            position: w.position(),
            altitude_ft: w.altitude_ft,
            kind: w.kind,
            to_threshold_nm: 0.0,
        })
        .collect();

    let total_distance_nm: f64 = waypoints
        .windows(2)
        .map(|pair| geo::great_circle_distance_nm(pair[0].position, pair[1].position))
        .sum();

    // Accumulate backwards from the arrival threshold
    let mut downstream = arrival.threshold;
    let mut acc = 0.0;
    for wp in waypoints.iter_mut().rev() {
        acc += geo::great_circle_distance_nm(wp.position, downstream);
        wp.to_threshold_nm = acc;
        downstream = wp.position;
    }

    FrozenRoute {
        waypoints,
        total_distance_nm,
        estimated_total_min: total_distance_nm / cruise_speed_kts * 60.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::presets::demo_plan;
    use crate::planning::{Route, WaypointKind};

    #[test]
    fn demo_plan_is_valid() {
        assert!(validate(&demo_plan()).is_empty());
    }

    #[test]
    fn empty_plan_reports_every_missing_field() {
        let errors = validate(&PlanningState::default());
        assert_eq!(errors.len(), 6, "{:?}", errors);
        assert!(errors.iter().any(|e| e.contains("departure ICAO")));
        assert!(errors.iter().any(|e| e.contains("arrival ICAO")));
        assert!(errors.iter().any(|e| e.contains("departure runway selection")));
        assert!(errors.iter().any(|e| e.contains("arrival runway selection")));
        assert!(errors.iter().any(|e| e == "Missing aircraft"));
        assert!(errors.iter().any(|e| e == "Missing route"));
    }

    #[test]
    fn missing_threshold_is_a_validation_error() {
        let mut plan = demo_plan();
        if let Some(sel) = plan.arrival_runway.as_mut() {
            sel.runway.ends[0].threshold = None;
        }
        let errors = validate(&plan);
        assert_eq!(errors, vec!["Arrival runway 10 has no threshold coordinates".to_string()]);
    }

    #[test]
    fn short_route_rejected() {
        let mut plan = demo_plan();
        plan.route = Some(Route { waypoints: vec![] });
        plan.departure_icao = Some("  ".into());
        let err = create_snapshot(&plan).unwrap_err();
        match err {
            SnapshotError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors[1].contains("at least 2 waypoints"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn runway_without_opposite_end_is_invariant_violation() {
        let mut plan = demo_plan();
        if let Some(sel) = plan.departure_runway.as_mut() {
            sel.runway.ends.truncate(1);
        }
        assert!(validate(&plan).is_empty());
        let err = create_snapshot(&plan).unwrap_err();
        assert!(matches!(err, SnapshotError::Invariant(_)), "got {:?}", err);
    }

    #[test]
    fn geometry_comes_from_thresholds_not_published_length() {
        let mut plan = demo_plan();
        if let Some(sel) = plan.departure_runway.as_mut() {
            sel.runway.length_ft = Some(1.0);
        }
        let snap = create_snapshot(&plan).unwrap();
        let dep = snap.departure();
        assert!((dep.length_ft - 9000.0).abs() < 0.01, "length {}", dep.length_ft);
        assert!((dep.heading_deg - 90.0).abs() < 1e-6);
        assert_eq!(dep.designator, "09");
    }

    #[test]
    fn route_is_frozen_with_distances() {
        let snap = create_snapshot(&demo_plan()).unwrap();
        let route = snap.route();
        assert_eq!(route.waypoints.len(), 3);
        assert!((route.total_distance_nm - 500.0).abs() < 1e-6);
        assert!((route.estimated_total_min - 500.0 / 450.0 * 60.0).abs() < 1e-6);
        assert_eq!(route.first_active_index(), 1);
        assert_eq!(route.waypoints[1].kind, WaypointKind::Enroute);
        // 12 nm from the last waypoint to the arrival threshold
        assert!((route.waypoints[2].to_threshold_nm - 12.0).abs() < 1e-6);
        assert!((route.waypoints[0].to_threshold_nm - 512.0).abs() < 1e-6);
    }

    #[test]
    fn builder_carries_tuning() {
        let snap = SnapshotBuilder::new(&demo_plan())
            .glideslope_gain(3.0)
            .build()
            .unwrap();
        assert_eq!(snap.tuning().glideslope_gain, 3.0);
        assert_eq!(create_snapshot(&demo_plan()).unwrap().tuning().glideslope_gain, 5.0);

        let snap = SnapshotBuilder::new(&demo_plan())
            .tuning(Tuning { glideslope_gain: 2.0 })
            .build()
            .unwrap();
        assert_eq!(snap.tuning().glideslope_gain, 2.0);
    }

    #[test]
    fn zero_vertical_rates_are_rejected() {
        let mut plan = demo_plan();
        if let Some(perf) = plan.aircraft.as_mut() {
            perf.initial_climb_rate_fpm = Some(0.0);
            perf.cruise_climb_rate_fpm = Some(-500.0);
            perf.descent_rate_fpm = Some(0.0);
        }
        let errors = validate(&plan);
        assert_eq!(errors.len(), 3, "{:?}", errors);
        assert!(errors[0].contains("initial climb rate must be positive"));
        assert!(errors[1].contains("cruise climb rate must be positive"));
        assert!(errors[2].contains("descent rate must be positive"));
        assert!(matches!(create_snapshot(&plan), Err(SnapshotError::Validation(_))));
    }

    #[test]
    fn negative_descent_rate_is_accepted_as_magnitude() {
        let mut plan = demo_plan();
        if let Some(perf) = plan.aircraft.as_mut() {
            perf.descent_rate_fpm = Some(-1800.0);
        }
        assert!(validate(&plan).is_empty());
        assert_eq!(create_snapshot(&plan).unwrap().aircraft().descent_rate_fpm, 1800.0);
    }

    #[test]
    fn zero_speeds_are_rejected() {
        let mut plan = demo_plan();
        if let Some(perf) = plan.aircraft.as_mut() {
            perf.approach_speed_kts = Some(0.0);
            perf.vref_kts = Some(f64::NAN);
        }
        let errors = validate(&plan);
        assert_eq!(errors.len(), 2, "{:?}", errors);
        assert!(errors.iter().any(|e| e.contains("VRef")));
        assert!(errors.iter().any(|e| e.contains("approach speed")));
    }
}
