use tracing::warn;

use crate::dynamics::kinematics::{approach_value, trapezoid_distance_ft};
use crate::dynamics::{FlightPhase, PhaseState};
use crate::geo::FT_PER_NM;
use crate::snapshot::SimulationSnapshot;

// ---------------------------------------------------------------------------
// Takeoff constants
// ---------------------------------------------------------------------------

pub const LIFTOFF_PITCH_DEG: f64 = 8.0;
pub const ROTATE_ACCEL_FACTOR: f64 = 0.5;     // drag penalty once the nose is up
pub const INITIAL_CLIMB_AGL_FT: f64 = 400.0;
pub const VS_CAPTURE_FRACTION: f64 = 0.9;
const LIFTOFF_VS_RAMP_S: f64 = 6.0;          // time to reach the initial climb rate
const LIFTOFF_SPEED_MARGIN_KTS: f64 = 10.0;   // accelerate to V2 + margin after liftoff

// ---------------------------------------------------------------------------
// Takeoff module: LINEUP, TAKEOFF_ROLL, V1, ROTATE, LIFTOFF
// ---------------------------------------------------------------------------

/// Advance a takeoff-owned state by `dt` simulated seconds.
///
/// Motion is one-dimensional along the departure centreline and the heading
/// stays at the runway heading in every phase handled here.
pub fn advance(state: &PhaseState, snapshot: &SimulationSnapshot, dt: f64) -> PhaseState {
    match state.phase {
        FlightPhase::Lineup => lineup(state, dt),
        FlightPhase::TakeoffRoll | FlightPhase::V1 => ground_roll(state, snapshot, dt),
        FlightPhase::Rotate => rotate(state, snapshot, dt),
        FlightPhase::Liftoff => liftoff(state, snapshot, dt),
        other => {
            warn!(phase = %other, "Takeoff module asked to advance a phase it does not own");
            *state
        }
    }
}

fn lineup(state: &PhaseState, dt: f64) -> PhaseState {
    let mut next = *state;
    next.advance_clock(dt);
    next
}

fn ground_roll(state: &PhaseState, snapshot: &SimulationSnapshot, dt: f64) -> PhaseState {
    let ac = snapshot.aircraft();
    let mut next = *state;
    next.advance_clock(dt);

    let v1 = state.ias_kts + ac.ground_accel_kts_s * dt;
    roll_along_centreline(&mut next, snapshot, state.ias_kts, v1, dt);

    match state.phase {
        FlightPhase::TakeoffRoll if v1 >= ac.v1_kts => next.enter(FlightPhase::V1),
        FlightPhase::V1 if v1 >= ac.vr_kts => next.enter(FlightPhase::Rotate),
        _ => {}
    }
    next
}

fn rotate(state: &PhaseState, snapshot: &SimulationSnapshot, dt: f64) -> PhaseState {
    let ac = snapshot.aircraft();
    let mut next = *state;
    next.advance_clock(dt);

    let v1 = state.ias_kts + ac.ground_accel_kts_s * ROTATE_ACCEL_FACTOR * dt;
    roll_along_centreline(&mut next, snapshot, state.ias_kts, v1, dt);
    next.pitch_deg = approach_value(
        state.pitch_deg,
        ac.initial_climb_pitch_deg.max(LIFTOFF_PITCH_DEG),
        ac.rotation_rate_deg_s,
        dt,
    );

    // Either condition may lag the other
    if next.pitch_deg >= LIFTOFF_PITCH_DEG && v1 >= ac.v2_kts {
        next.enter(FlightPhase::Liftoff);
    }
    next
}

fn liftoff(state: &PhaseState, snapshot: &SimulationSnapshot, dt: f64) -> PhaseState {
    let ac = snapshot.aircraft();
    let dep = snapshot.departure();
    let mut next = *state;
    next.advance_clock(dt);

    let speed_target = ac.v2_kts + LIFTOFF_SPEED_MARGIN_KTS;
    let v1 = if state.ias_kts < speed_target {
        (state.ias_kts + ac.ground_accel_kts_s * ROTATE_ACCEL_FACTOR * dt).min(speed_target)
    } else {
        state.ias_kts
    };
    roll_along_centreline(&mut next, snapshot, state.ias_kts, v1, dt);

    next.pitch_deg = approach_value(
        state.pitch_deg,
        ac.initial_climb_pitch_deg,
        ac.rotation_rate_deg_s,
        dt,
    );

    let vs_target = ac.initial_climb_rate_fpm;
    let ramp = vs_target / LIFTOFF_VS_RAMP_S;
    next.vertical_speed_fpm = approach_value(state.vertical_speed_fpm, vs_target, ramp, dt);
    next.altitude_ft = state.altitude_ft
        + 0.5 * (state.vertical_speed_fpm + next.vertical_speed_fpm) / 60.0 * dt;

    if next.height_agl(dep.elevation_ft) >= INITIAL_CLIMB_AGL_FT
        && next.vertical_speed_fpm >= VS_CAPTURE_FRACTION * vs_target
    {
        next.enter(FlightPhase::InitialClimb);
    }
    next
}

/// Trapezoidal 1-D move along the departure centreline (extended past the far end).
fn roll_along_centreline(
    next: &mut PhaseState,
    snapshot: &SimulationSnapshot,
    v0_kts: f64,
    v1_kts: f64,
    dt: f64,
) {
    let dep = snapshot.departure();
    let step_ft = trapezoid_distance_ft(v0_kts, v1_kts, dt);

    next.ias_kts = v1_kts;
    next.ground_speed_kts = v1_kts;
    next.runway_distance_ft += step_ft;
    next.route_distance_nm += step_ft / FT_PER_NM;
    next.position = dep.position_at(next.runway_distance_ft);
    next.heading_deg = dep.heading_deg;
    next.bank_deg = 0.0;
}
