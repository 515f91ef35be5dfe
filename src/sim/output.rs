use serde::Serialize;

use crate::dynamics::{FlightPhase, PhaseState};
use crate::geo::GeoPoint;
use crate::physics;
use crate::snapshot::SimulationSnapshot;

// ---------------------------------------------------------------------------
// Flight output: the read-only view handed to hosts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOutput {
    pub phase: FlightPhase,
    pub progress: f64,               // 0..=1
    pub position: GeoPoint,
    pub altitude_ft: f64,
    pub heading_true: f64,
    pub ground_speed_kts: f64,
    pub indicated_airspeed_kts: f64,
    pub vertical_speed_fpm: f64,
    pub pitch_deg: f64,
    pub bank_deg: f64,
    pub distance_flown_nm: f64,
    pub distance_remaining_nm: f64,
    pub time_elapsed_min: f64,
    pub time_remaining_min: f64,
    pub is_playing: bool,
    pub is_paused: bool,
    pub playback_speed: f64,
}

impl FlightOutput {
    pub fn project(state: &PhaseState, snapshot: &SimulationSnapshot) -> Self {
        let flown = state.route_distance_nm;
        let remaining = physics::remaining_distance_nm(state, snapshot).max(0.0);
        let progress = if state.phase.is_terminal() {
            1.0
        } else if flown + remaining <= 0.0 {
            0.0
        } else {
            (flown / (flown + remaining)).clamp(0.0, 1.0)
        };

        Self {
            phase: state.phase,
            progress,
            position: state.position,
            altitude_ft: state.altitude_ft,
            heading_true: state.heading_deg,
            ground_speed_kts: state.ground_speed_kts,
            indicated_airspeed_kts: state.ias_kts,
            vertical_speed_fpm: state.vertical_speed_fpm,
            pitch_deg: state.pitch_deg,
            bank_deg: state.bank_deg,
            distance_flown_nm: flown,
            distance_remaining_nm: remaining,
            time_elapsed_min: state.total_elapsed_s / 60.0,
            time_remaining_min: remaining / snapshot.aircraft().cruise_speed_kts * 60.0,
            is_playing: state.is_playing,
            is_paused: state.is_paused,
            playback_speed: state.playback_speed,
        }
    }
}
