use tracing::{debug, warn};

use crate::dynamics::kinematics::{approach_speed, flight_path_pitch, move_toward, turn_bank};
use crate::dynamics::{FlightPhase, PhaseState};
use crate::geo::{self, GeoPoint, STANDARD_RATE_DEG_S};
use crate::snapshot::SimulationSnapshot;

// ---------------------------------------------------------------------------
// Enroute constants
// ---------------------------------------------------------------------------

pub const WAYPOINT_CAPTURE_NM: f64 = 1.0;
pub const SPEED_LIMIT_ALT_FT: f64 = 10_000.0;
pub const SPEED_LIMIT_KTS: f64 = 250.0;
pub const DIRECT_TO_THRESHOLD_NM: f64 = 30.0;
pub const APPROACH_HANDOFF_NM: f64 = 20.0;
pub const DESCENT_FLOOR_AGL_FT: f64 = 3000.0;

const ACCEL_KTS_S: f64 = 1.5;
const DECEL_KTS_S: f64 = 1.0;
const CLIMB_SPEED_CAP_KTS: f64 = 300.0;
const CLIMB_SPEED_CRUISE_FRACTION: f64 = 0.85;
const DESCENT_SPEED_CAP_KTS: f64 = 290.0;
const DESCENT_SPEED_CRUISE_FRACTION: f64 = 0.65;
const HEADING_CAPTURE_DEG: f64 = 5.0;
const SPEED_CAPTURE_FRACTION: f64 = 0.95;

// Top of descent: 3 nm per 1000 ft above 3000 ft, plus a fixed buffer
const TOD_REFERENCE_ALT_FT: f64 = 3000.0;
const TOD_NM_PER_1000_FT: f64 = 3.0;
const TOD_BUFFER_NM: f64 = 50.0;

/// Distance before the arrival threshold at which cruise gives way to descent.
pub fn top_of_descent_nm(cruise_altitude_ft: f64) -> f64 {
    ((cruise_altitude_ft - TOD_REFERENCE_ALT_FT) / 1000.0 * TOD_NM_PER_1000_FT).max(0.0)
        + TOD_BUFFER_NM
}

// ---------------------------------------------------------------------------
// Lateral steering
// ---------------------------------------------------------------------------

/// Where the aircraft is currently flying to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub target: GeoPoint,
    pub direct_to_threshold: bool,
}

/// Current waypoint, or the arrival threshold once it is the better target.
///
/// The threshold takes over in descent inside 30 nm, and at the last
/// waypoint once the aircraft is at least as close to the threshold as the
/// waypoint itself is. Inside the approach handoff radius but not yet ready
/// for the approach, the aircraft holds its heading and overflies instead.
pub fn steering_target(state: &PhaseState, snapshot: &SimulationSnapshot) -> Steering {
    let threshold = snapshot.arrival().threshold;
    let to_threshold = geo::great_circle_distance_nm(state.position, threshold);

    if state.phase == FlightPhase::Descent && to_threshold < DIRECT_TO_THRESHOLD_NM {
        return toward_threshold(state, snapshot, to_threshold);
    }

    let route = snapshot.route();
    let index = state.waypoint_index.min(route.last_index());
    let wp = route.waypoint(index);
    if index == route.last_index() && to_threshold <= wp.to_threshold_nm {
        return toward_threshold(state, snapshot, to_threshold);
    }
    Steering { target: wp.position, direct_to_threshold: false }
}

fn toward_threshold(
    state: &PhaseState,
    snapshot: &SimulationSnapshot,
    to_threshold: f64,
) -> Steering {
    let arrival = snapshot.arrival();
    let at_floor = state.phase == FlightPhase::Descent
        && state.altitude_ft <= arrival.elevation_ft + DESCENT_FLOOR_AGL_FT;
    let target = if to_threshold < APPROACH_HANDOFF_NM && !at_floor {
        geo::destination_point(state.position, state.heading_deg, DIRECT_TO_THRESHOLD_NM)
    } else {
        arrival.threshold
    };
    Steering { target, direct_to_threshold: true }
}

/// Along-route distance still to fly while following the route.
pub fn route_remaining_nm(state: &PhaseState, snapshot: &SimulationSnapshot) -> f64 {
    let steering = steering_target(state, snapshot);
    if steering.direct_to_threshold {
        geo::great_circle_distance_nm(state.position, snapshot.arrival().threshold)
    } else {
        snapshot.route().remaining_nm(state.waypoint_index, state.position)
    }
}

fn bearing_or_hold(from: GeoPoint, to: GeoPoint, current_heading: f64) -> f64 {
    if geo::great_circle_distance_nm(from, to) < 1e-6 {
        current_heading
    } else {
        geo::heading(from, to)
    }
}

// ---------------------------------------------------------------------------
// Enroute module: INITIAL_CLIMB, CLIMB, CRUISE, DESCENT
// ---------------------------------------------------------------------------

/// Advance an enroute-owned state by `dt` simulated seconds.
pub fn advance(state: &PhaseState, snapshot: &SimulationSnapshot, dt: f64) -> PhaseState {
    if !state.phase.is_enroute_phase() {
        warn!(phase = %state.phase, "Enroute module asked to advance a phase it does not own");
        return *state;
    }

    let ac = snapshot.aircraft();
    let arrival = snapshot.arrival();
    let mut next = *state;
    next.advance_clock(dt);

    // Speed
    let target_speed = target_speed_kts(state, snapshot);
    next.ias_kts = approach_speed(state.ias_kts, target_speed, ACCEL_KTS_S, DECEL_KTS_S, dt);
    next.ground_speed_kts = next.ias_kts;

    // Vertical
    let cruise_alt = ac.cruise_altitude_ft;
    let floor = arrival.elevation_ft + DESCENT_FLOOR_AGL_FT;
    match state.phase {
        FlightPhase::InitialClimb | FlightPhase::Climb => {
            let rate = if state.phase == FlightPhase::InitialClimb {
                ac.initial_climb_rate_fpm
            } else {
                ac.cruise_climb_rate_fpm
            };
            next.altitude_ft = (state.altitude_ft + rate / 60.0 * dt).min(cruise_alt);
            next.vertical_speed_fpm = if next.altitude_ft >= cruise_alt { 0.0 } else { rate };
        }
        FlightPhase::Cruise => {
            next.altitude_ft = cruise_alt;
            next.vertical_speed_fpm = 0.0;
        }
        _ => {
            // Descent, never below the floor
            next.altitude_ft = (state.altitude_ft - ac.descent_rate_fpm / 60.0 * dt)
                .max(floor)
                .min(state.altitude_ft);
            next.vertical_speed_fpm = if next.altitude_ft > floor { -ac.descent_rate_fpm } else { 0.0 };
        }
    }

    // Lateral
    let steering = steering_target(state, snapshot);
    let desired = bearing_or_hold(state.position, steering.target, state.heading_deg);
    next.heading_deg = geo::turn_toward(state.heading_deg, desired, STANDARD_RATE_DEG_S, dt);
    next.bank_deg = turn_bank(next.heading_deg, desired, next.ground_speed_kts);

    let step_nm = 0.5 * (state.ground_speed_kts + next.ground_speed_kts) * dt / 3600.0;
    let (position, moved_nm) = move_toward(state.position, steering.target, step_nm);
    next.position = position;
    next.route_distance_nm += moved_nm;

    if !steering.direct_to_threshold {
        sequence_waypoint(&mut next, snapshot);
    }

    next.pitch_deg = flight_path_pitch(next.vertical_speed_fpm, next.ground_speed_kts);

    // Transitions
    match state.phase {
        FlightPhase::InitialClimb => {
            let target = steering_target(&next, snapshot).target;
            let bearing = bearing_or_hold(next.position, target, next.heading_deg);
            let aligned =
                geo::heading_difference(next.heading_deg, bearing).abs() <= HEADING_CAPTURE_DEG;
            if aligned && next.ias_kts >= SPEED_CAPTURE_FRACTION * target_speed {
                next.enter(FlightPhase::Climb);
            }
        }
        FlightPhase::Climb => {
            if next.altitude_ft >= cruise_alt {
                next.altitude_ft = cruise_alt;
                next.vertical_speed_fpm = 0.0;
                next.enter(FlightPhase::Cruise);
            }
        }
        FlightPhase::Cruise => {
            let remaining = route_remaining_nm(&next, snapshot);
            if remaining <= top_of_descent_nm(cruise_alt) {
                next.enter(FlightPhase::Descent);
            }
        }
        _ => {
            let to_threshold = geo::great_circle_distance_nm(next.position, arrival.threshold);
            if next.altitude_ft <= floor && to_threshold < APPROACH_HANDOFF_NM {
                next.enter(FlightPhase::Approach);
            }
        }
    }
    next
}

fn target_speed_kts(state: &PhaseState, snapshot: &SimulationSnapshot) -> f64 {
    let cruise = snapshot.aircraft().cruise_speed_kts;
    let below_limit = state.altitude_ft < SPEED_LIMIT_ALT_FT;
    match state.phase {
        FlightPhase::InitialClimb => SPEED_LIMIT_KTS.min(cruise),
        FlightPhase::Climb if below_limit => SPEED_LIMIT_KTS.min(cruise),
        FlightPhase::Climb => CLIMB_SPEED_CAP_KTS.min(CLIMB_SPEED_CRUISE_FRACTION * cruise),
        FlightPhase::Cruise => cruise,
        _ => {
            let descent = DESCENT_SPEED_CAP_KTS.min(DESCENT_SPEED_CRUISE_FRACTION * cruise);
            if below_limit {
                descent.min(SPEED_LIMIT_KTS)
            } else {
                descent
            }
        }
    }
}

fn sequence_waypoint(next: &mut PhaseState, snapshot: &SimulationSnapshot) {
    let route = snapshot.route();
    let index = next.waypoint_index.min(route.last_index());
    let wp = route.waypoint(index);
    if index < route.last_index()
        && geo::great_circle_distance_nm(next.position, wp.position) < WAYPOINT_CAPTURE_NM
    {
        next.waypoint_index = index + 1;
        debug!(
            passed = %wp.id,
            next = %route.waypoint(index + 1).id,
            t = next.total_elapsed_s,
            "Waypoint sequenced"
        );
    }
}
