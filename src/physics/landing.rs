use tracing::{info, warn};

use crate::dynamics::kinematics::{
    approach_speed, approach_value, flight_path_pitch, glideslope_altitude_ft, glideslope_vs_fpm,
    move_toward, trapezoid_distance_ft, turn_bank,
};
use crate::dynamics::{FlightPhase, PhaseState};
use crate::geo::{self, GeoPoint, FT_PER_NM, STANDARD_RATE_DEG_S};
use crate::snapshot::SimulationSnapshot;

// ---------------------------------------------------------------------------
// Landing constants
// ---------------------------------------------------------------------------

pub const ALIGNMENT_TOLERANCE_DEG: f64 = 15.0;
pub const INTERCEPT_FIX_NM: f64 = 12.0;       // centreline fix used to join from off-axis
pub const FINAL_HANDOFF_NM: f64 = 10.0;
pub const TOUCHDOWN_AGL_FT: f64 = 50.0;
pub const TOUCHDOWN_DISTANCE_NM: f64 = 0.1;
pub const FLARE_PITCH_DEG: f64 = 3.0;
pub const TAXI_SPEED_KTS: f64 = 20.0;         // rollout ends here
pub const TAXI_IN_DURATION_S: f64 = 30.0;

const APPROACH_MIN_AGL_FT: f64 = 1500.0;
const APPROACH_ACCEL_KTS_S: f64 = 1.5;
const APPROACH_DECEL_KTS_S: f64 = 1.0;
const FINAL_VREF_MARGIN_KTS: f64 = 5.0;
const FINAL_MAX_SINK_FPM: f64 = 2500.0;
const BRAKING_KTS_S: f64 = 5.0;
const TAXI_IN_SPEED_KTS: f64 = 10.0;
const TAXI_IN_DECEL_KTS_S: f64 = 2.0;
const DEROTATION_RATE_DEG_S: f64 = 1.0;
const JOIN_MAX_HEADING_OFFSET_DEG: f64 = 90.0;
const JOIN_TURN_MARGIN_NM: f64 = 1.0;

// ---------------------------------------------------------------------------
// Landing module: APPROACH, FINAL, LANDING, TAXI_IN, COMPLETE
// ---------------------------------------------------------------------------

/// Advance a landing-owned state by `dt` simulated seconds.
pub fn advance(state: &PhaseState, snapshot: &SimulationSnapshot, dt: f64) -> PhaseState {
    match state.phase {
        FlightPhase::Approach => approach(state, snapshot, dt),
        FlightPhase::Final => final_approach(state, snapshot, dt),
        FlightPhase::Landing => rollout(state, snapshot, dt),
        FlightPhase::TaxiIn => taxi_in(state, snapshot, dt),
        FlightPhase::Complete => *state,
        other => {
            warn!(phase = %other, "Landing module asked to advance a phase it does not own");
            *state
        }
    }
}

/// Centreline fix that off-axis traffic flies to before turning inbound.
pub fn intercept_fix(snapshot: &SimulationSnapshot) -> GeoPoint {
    snapshot.arrival().position_at(-INTERCEPT_FIX_NM * FT_PER_NM)
}

/// Lateral target during approach, and whether the aircraft is established
/// inbound to the threshold.
///
/// The threshold becomes the target only from the approach side of the
/// runway, inside the alignment cone, pointing broadly inbound and with room
/// left to finish the turn before reaching it. Everything else flies to the
/// intercept fix first. Once established the threshold stays the target.
pub fn approach_target(state: &PhaseState, snapshot: &SimulationSnapshot) -> (GeoPoint, bool) {
    if state.established_inbound || can_join_inbound(state, snapshot) {
        (snapshot.arrival().threshold, true)
    } else {
        (intercept_fix(snapshot), false)
    }
}

fn can_join_inbound(state: &PhaseState, snapshot: &SimulationSnapshot) -> bool {
    let arrival = snapshot.arrival();
    if arrival.along_track_ft(state.position) >= 0.0 {
        return false;
    }
    let inbound = geo::heading(state.position, arrival.threshold);
    let off_axis = geo::heading_difference(arrival.heading_deg, inbound).abs();
    let off_heading = geo::heading_difference(state.heading_deg, arrival.heading_deg).abs();

    // Distance flown while turning the rest of the way onto the runway heading
    let turn_s = (off_heading - ALIGNMENT_TOLERANCE_DEG).max(0.0) / STANDARD_RATE_DEG_S;
    let turn_nm = state.ground_speed_kts * turn_s / 3600.0;
    let to_threshold = geo::great_circle_distance_nm(state.position, arrival.threshold);

    off_axis <= ALIGNMENT_TOLERANCE_DEG
        && off_heading <= JOIN_MAX_HEADING_OFFSET_DEG
        && to_threshold >= turn_nm + JOIN_TURN_MARGIN_NM
}

fn approach(state: &PhaseState, snapshot: &SimulationSnapshot, dt: f64) -> PhaseState {
    let ac = snapshot.aircraft();
    let arrival = snapshot.arrival();
    let mut next = *state;
    next.advance_clock(dt);

    next.ias_kts = approach_speed(
        state.ias_kts,
        ac.approach_speed_kts,
        APPROACH_ACCEL_KTS_S,
        APPROACH_DECEL_KTS_S,
        dt,
    );
    next.ground_speed_kts = next.ias_kts;

    // Down to the glide path or the approach minimum, whichever is higher. Never up.
    let distance_ft = geo::great_circle_distance_ft(state.position, arrival.threshold);
    let target_alt = glideslope_altitude_ft(distance_ft, arrival.elevation_ft)
        .max(arrival.elevation_ft + APPROACH_MIN_AGL_FT);
    if state.altitude_ft > target_alt {
        next.altitude_ft = (state.altitude_ft - ac.descent_rate_fpm / 60.0 * dt).max(target_alt);
        next.vertical_speed_fpm =
            if next.altitude_ft > target_alt { -ac.descent_rate_fpm } else { 0.0 };
    } else {
        next.vertical_speed_fpm = 0.0;
    }

    let (target, established) = approach_target(state, snapshot);
    let desired = if geo::great_circle_distance_nm(state.position, target) < 1e-6 {
        arrival.heading_deg
    } else {
        geo::heading(state.position, target)
    };
    next.heading_deg = geo::turn_toward(state.heading_deg, desired, STANDARD_RATE_DEG_S, dt);
    next.bank_deg = turn_bank(next.heading_deg, desired, next.ground_speed_kts);

    let step_nm = 0.5 * (state.ground_speed_kts + next.ground_speed_kts) * dt / 3600.0;
    let (mut position, mut moved_nm) = move_toward(state.position, target, step_nm);
    next.established_inbound = established;
    if !established && moved_nm < step_nm {
        // Fix reached: the rest of the step is flown inbound
        next.established_inbound = true;
        let (inbound, extra_nm) = move_toward(position, arrival.threshold, step_nm - moved_nm);
        position = inbound;
        moved_nm += extra_nm;
    }
    next.position = position;
    next.route_distance_nm += moved_nm;
    next.pitch_deg = flight_path_pitch(next.vertical_speed_fpm, next.ground_speed_kts);

    let to_threshold = geo::great_circle_distance_nm(next.position, arrival.threshold);
    let aligned = geo::heading_difference(next.heading_deg, arrival.heading_deg).abs()
        <= ALIGNMENT_TOLERANCE_DEG;
    if next.established_inbound && to_threshold < FINAL_HANDOFF_NM && aligned {
        next.enter(FlightPhase::Final);
    }
    next
}

fn final_approach(state: &PhaseState, snapshot: &SimulationSnapshot, dt: f64) -> PhaseState {
    let ac = snapshot.aircraft();
    let arrival = snapshot.arrival();
    let gain = snapshot.tuning().glideslope_gain;
    let mut next = *state;
    next.advance_clock(dt);

    next.heading_deg =
        geo::turn_toward(state.heading_deg, arrival.heading_deg, STANDARD_RATE_DEG_S, dt);
    next.bank_deg = turn_bank(next.heading_deg, arrival.heading_deg, state.ground_speed_kts);

    // Bleed toward VRef + margin; never speed up on final
    let vref_target = ac.vref_kts + FINAL_VREF_MARGIN_KTS;
    if state.ias_kts > vref_target {
        next.ias_kts = (state.ias_kts - APPROACH_DECEL_KTS_S * dt).max(vref_target);
    }
    next.ground_speed_kts = next.ias_kts;

    // Proportional glideslope tracking; descent only
    let distance_ft = geo::great_circle_distance_ft(state.position, arrival.threshold);
    let gs_alt = glideslope_altitude_ft(distance_ft, arrival.elevation_ft);
    let vs = glideslope_vs_fpm(next.ground_speed_kts) - gain * (state.altitude_ft - gs_alt);
    next.vertical_speed_fpm = vs.clamp(-FINAL_MAX_SINK_FPM, 0.0);
    next.altitude_ft =
        (state.altitude_ft + next.vertical_speed_fpm / 60.0 * dt).max(arrival.elevation_ft);

    let step_nm = 0.5 * (state.ground_speed_kts + next.ground_speed_kts) * dt / 3600.0;
    let (position, moved_nm) = move_toward(state.position, arrival.threshold, step_nm);
    next.position = position;
    next.route_distance_nm += moved_nm;
    next.pitch_deg = flight_path_pitch(next.vertical_speed_fpm, next.ground_speed_kts);

    let to_threshold = geo::great_circle_distance_nm(next.position, arrival.threshold);
    if next.height_agl(arrival.elevation_ft) <= TOUCHDOWN_AGL_FT
        || to_threshold < TOUCHDOWN_DISTANCE_NM
    {
        touch_down(&mut next, snapshot);
    }
    next
}

/// Snap onto the arrival threshold and hand over to the rollout.
fn touch_down(next: &mut PhaseState, snapshot: &SimulationSnapshot) {
    let arrival = snapshot.arrival();
    info!(
        runway = %arrival.designator,
        t = next.total_elapsed_s,
        ias_kts = next.ias_kts,
        sink_fpm = next.vertical_speed_fpm,
        "Touchdown"
    );
    next.position = arrival.threshold;
    next.altitude_ft = arrival.elevation_ft;
    next.vertical_speed_fpm = 0.0;
    next.pitch_deg = FLARE_PITCH_DEG;
    next.bank_deg = 0.0;
    next.heading_deg = arrival.heading_deg;
    next.runway_distance_ft = 0.0;
    next.enter(FlightPhase::Landing);
}

fn rollout(state: &PhaseState, snapshot: &SimulationSnapshot, dt: f64) -> PhaseState {
    let mut next = *state;
    next.advance_clock(dt);

    let v1 = (state.ias_kts - BRAKING_KTS_S * dt).max(TAXI_SPEED_KTS).min(state.ias_kts);
    roll_along_arrival(&mut next, snapshot, state.ias_kts, v1, dt);
    next.pitch_deg = approach_value(state.pitch_deg, 0.0, DEROTATION_RATE_DEG_S, dt);

    if v1 <= TAXI_SPEED_KTS {
        next.enter(FlightPhase::TaxiIn);
    }
    next
}

fn taxi_in(state: &PhaseState, snapshot: &SimulationSnapshot, dt: f64) -> PhaseState {
    let mut next = *state;
    next.advance_clock(dt);

    let v1 = approach_speed(
        state.ias_kts,
        TAXI_IN_SPEED_KTS,
        TAXI_IN_DECEL_KTS_S,
        TAXI_IN_DECEL_KTS_S,
        dt,
    );
    roll_along_arrival(&mut next, snapshot, state.ias_kts, v1, dt);
    next.pitch_deg = 0.0;

    if next.phase_elapsed_s >= TAXI_IN_DURATION_S {
        next.ias_kts = 0.0;
        next.ground_speed_kts = 0.0;
        next.is_playing = false;
        next.enter(FlightPhase::Complete);
        info!(
            t = next.total_elapsed_s,
            distance_nm = next.route_distance_nm,
            "Flight complete"
        );
    }
    next
}

fn roll_along_arrival(
    next: &mut PhaseState,
    snapshot: &SimulationSnapshot,
    v0_kts: f64,
    v1_kts: f64,
    dt: f64,
) {
    let arrival = snapshot.arrival();
    let step_ft = trapezoid_distance_ft(v0_kts, v1_kts, dt);

    next.ias_kts = v1_kts;
    next.ground_speed_kts = v1_kts;
    next.runway_distance_ft += step_ft;
    next.route_distance_nm += step_ft / FT_PER_NM;
    next.position = arrival.position_at(next.runway_distance_ft);
    next.heading_deg = arrival.heading_deg;
    next.altitude_ft = arrival.elevation_ft;
    next.vertical_speed_fpm = 0.0;
    next.bank_deg = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::presets::demo_plan;
    use crate::snapshot::create_snapshot;

    /// `nm` out on the extended centreline, pointing at the runway.
    fn on_final(phase: FlightPhase, nm: f64) -> (SimulationSnapshot, PhaseState) {
        let snap = create_snapshot(&demo_plan()).unwrap();
        let arr = snap.arrival().clone();
        let outbound = geo::normalize_heading(arr.heading_deg + 180.0);
        let mut s = PhaseState::lineup(&snap);
        s.phase = phase;
        s.is_playing = true;
        s.waypoint_index = snap.route().last_index();
        s.position = geo::destination_point(arr.threshold, outbound, nm);
        s.heading_deg = arr.heading_deg;
        s.altitude_ft = glideslope_altitude_ft(nm * FT_PER_NM, arr.elevation_ft);
        s.ias_kts = 150.0;
        s.ground_speed_kts = 150.0;
        (snap, s)
    }

    #[test]
    fn touchdown_snaps_to_threshold() {
        let (snap, mut s) = on_final(FlightPhase::Final, 0.05);
        s.heading_deg = snap.arrival().heading_deg + 2.0;
        let next = advance(&s, &snap, 1.0);
        let arr = snap.arrival();
        assert_eq!(next.phase, FlightPhase::Landing);
        assert_eq!(next.position, arr.threshold);
        assert_eq!(next.altitude_ft, arr.elevation_ft);
        assert_eq!(next.vertical_speed_fpm, 0.0);
        assert_eq!(next.pitch_deg, FLARE_PITCH_DEG);
        assert_eq!(next.runway_distance_ft, 0.0);
        assert_eq!(next.heading_deg, arr.heading_deg);
    }

    #[test]
    fn final_never_speeds_up_or_climbs() {
        let (snap, mut s) = on_final(FlightPhase::Final, 6.0);
        s.ias_kts = 140.0;
        s.ground_speed_kts = 140.0;
        s.altitude_ft -= 300.0; // well below the glide path
        let next = advance(&s, &snap, 1.0);
        assert_eq!(next.ias_kts, 140.0);
        assert_eq!(next.vertical_speed_fpm, 0.0);
        assert_eq!(next.altitude_ft, s.altitude_ft);
    }

    #[test]
    fn final_slows_toward_vref() {
        let (snap, mut s) = on_final(FlightPhase::Final, 6.0);
        s.ias_kts = 160.0;
        let next = advance(&s, &snap, 1.0);
        assert_eq!(next.ias_kts, 159.0);
        let floor = snap.aircraft().vref_kts + FINAL_VREF_MARGIN_KTS;
        let next = advance(&next, &snap, 60.0);
        assert_eq!(next.ias_kts, floor);
    }

    #[test]
    fn final_corrects_down_onto_glideslope() {
        let (snap, mut s) = on_final(FlightPhase::Final, 6.0);
        let on_path = advance(&s, &snap, 1.0);
        assert!(on_path.vertical_speed_fpm < 0.0);

        s.altitude_ft += 200.0;
        let high = advance(&s, &snap, 1.0);
        assert!(high.vertical_speed_fpm < on_path.vertical_speed_fpm);
        assert!(high.vertical_speed_fpm >= -FINAL_MAX_SINK_FPM);
    }

    #[test]
    fn approach_joins_centreline_through_intercept_fix() {
        let (snap, mut s) = on_final(FlightPhase::Approach, 15.0);
        let arr = snap.arrival().clone();
        assert_eq!(approach_target(&s, &snap), (arr.threshold, true));

        // Abeam the runway, 15 nm off to the side
        let side = geo::normalize_heading(arr.heading_deg + 90.0);
        s.position = geo::destination_point(arr.threshold, side, 15.0);
        assert_eq!(approach_target(&s, &snap), (intercept_fix(&snap), false));

        // Beyond the far end, already pointing down the runway
        s.position = arr.position_at(arr.length_ft + 3.0 * FT_PER_NM);
        assert_eq!(approach_target(&s, &snap), (intercept_fix(&snap), false));

        // Pointing down the runway past its far end is not a final
        s.altitude_ft = arr.elevation_ft + 1500.0;
        let next = advance(&s, &snap, 1.0);
        assert_eq!(next.phase, FlightPhase::Approach);

        // Latched once established, wherever it is
        s.established_inbound = true;
        assert_eq!(approach_target(&s, &snap), (arr.threshold, true));
    }

    #[test]
    fn outbound_on_the_centreline_keeps_flying_to_the_fix() {
        let (snap, mut s) = on_final(FlightPhase::Approach, 3.0);
        let arr = snap.arrival().clone();
        s.heading_deg = geo::normalize_heading(arr.heading_deg + 180.0);
        s.altitude_ft = arr.elevation_ft + 1500.0;
        assert_eq!(approach_target(&s, &snap), (intercept_fix(&snap), false));

        let mut final_entry_nm = None;
        for _ in 0..1200 {
            let next = advance(&s, &snap, 1.0);
            assert_ne!(next.position, s.position, "stationary at t={}", next.total_elapsed_s);
            s = next;
            if s.phase == FlightPhase::Final {
                final_entry_nm = Some(geo::great_circle_distance_nm(s.position, arr.threshold));
                break;
            }
        }
        let d = final_entry_nm.expect("never reached final");
        assert!(d > 5.0 && d < FINAL_HANDOFF_NM, "final entered at {:.2} nm", d);
    }

    #[test]
    fn reaching_the_fix_carries_the_step_inbound() {
        let (snap, mut s) = on_final(FlightPhase::Approach, INTERCEPT_FIX_NM - 0.01);
        let arr = snap.arrival().clone();
        s.heading_deg = geo::normalize_heading(arr.heading_deg + 180.0);
        s.altitude_ft = arr.elevation_ft + 1500.0;

        let next = advance(&s, &snap, 1.0);
        assert!(next.established_inbound);
        let step_nm = 0.5 * (s.ground_speed_kts + next.ground_speed_kts) / 3600.0;
        assert!((next.route_distance_nm - s.route_distance_nm - step_nm).abs() < 1e-9);
        let d = geo::great_circle_distance_nm(next.position, arr.threshold);
        assert!(d < INTERCEPT_FIX_NM - 0.02, "still at {:.4} nm", d);
    }

    #[test]
    fn approach_descends_to_path_but_never_climbs() {
        let (snap, mut s) = on_final(FlightPhase::Approach, 15.0);
        s.altitude_ft = 3000.0; // below the 15 nm glide path
        let next = advance(&s, &snap, 1.0);
        assert_eq!(next.altitude_ft, 3000.0);
        assert_eq!(next.vertical_speed_fpm, 0.0);

        s.altitude_ft = 9000.0;
        let next = advance(&s, &snap, 1.0);
        assert!(next.altitude_ft < 9000.0);
        assert!(next.vertical_speed_fpm < 0.0);
    }

    #[test]
    fn approach_hands_off_inside_ten_miles_when_aligned() {
        let (snap, s) = on_final(FlightPhase::Approach, 10.02);
        let next = advance(&s, &snap, 1.0);
        assert_eq!(next.phase, FlightPhase::Final);

        let (snap, mut s) = on_final(FlightPhase::Approach, 10.02);
        s.heading_deg = geo::normalize_heading(snap.arrival().heading_deg + 40.0);
        let next = advance(&s, &snap, 1.0);
        assert_eq!(next.phase, FlightPhase::Approach);
    }

    #[test]
    fn rollout_brakes_to_taxi_speed() {
        let (snap, mut s) = on_final(FlightPhase::Landing, 0.0);
        s.position = snap.arrival().threshold;
        s.runway_distance_ft = 0.0;
        s.ias_kts = 30.0;
        let next = advance(&s, &snap, 1.0);
        assert_eq!(next.ias_kts, 25.0);
        assert_eq!(next.phase, FlightPhase::Landing);
        assert!(next.runway_distance_ft > 0.0);
        assert_eq!(next.altitude_ft, snap.arrival().elevation_ft);

        let next = advance(&next, &snap, 2.0);
        assert_eq!(next.ias_kts, TAXI_SPEED_KTS);
        assert_eq!(next.phase, FlightPhase::TaxiIn);
    }

    #[test]
    fn taxi_in_completes_after_thirty_seconds() {
        let (snap, mut s) = on_final(FlightPhase::TaxiIn, 0.0);
        s.ias_kts = TAXI_SPEED_KTS;
        s.ground_speed_kts = TAXI_SPEED_KTS;
        s.phase_elapsed_s = 29.5;
        let next = advance(&s, &snap, 1.0);
        assert_eq!(next.phase, FlightPhase::Complete);
        assert_eq!(next.ias_kts, 0.0);
        assert_eq!(next.ground_speed_kts, 0.0);
        assert_eq!(next.vertical_speed_fpm, 0.0);
        assert!(!next.is_playing);

        assert_eq!(advance(&next, &snap, 10.0), next);
    }

    #[test]
    fn foreign_phase_is_a_no_op() {
        let (snap, mut s) = on_final(FlightPhase::Final, 5.0);
        s.phase = FlightPhase::Climb;
        assert_eq!(advance(&s, &snap, 1.0), s);
    }
}
