use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dynamics::phase::FlightPhase;
use crate::geo::GeoPoint;
use crate::snapshot::SimulationSnapshot;

// ---------------------------------------------------------------------------
// Phase state: the one mutable record of a simulated flight
// ---------------------------------------------------------------------------

/// Kinematic and playback state at a single point in simulated time.
///
/// Physics modules never mutate a `PhaseState` they are given; they copy it,
/// update the copy and return it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseState {
    pub phase: FlightPhase,
    pub runway_distance_ft: f64,   // along the active runway's centreline
    pub route_distance_nm: f64,    // horizontal distance flown so far
    pub waypoint_index: usize,
    pub established_inbound: bool, // latched once the approach is tracking to the threshold
    pub position: GeoPoint,
    pub heading_deg: f64,          // true
    pub pitch_deg: f64,
    pub bank_deg: f64,
    pub ias_kts: f64,
    pub ground_speed_kts: f64,
    pub altitude_ft: f64,          // MSL
    pub vertical_speed_fpm: f64,
    pub phase_elapsed_s: f64,
    pub total_elapsed_s: f64,
    pub is_playing: bool,
    pub is_paused: bool,
    pub playback_speed: f64,
}

impl PhaseState {
    /// Stationary at the departure threshold, aligned with the runway.
    pub fn lineup(snapshot: &SimulationSnapshot) -> Self {
        let dep = snapshot.departure();
        Self {
            phase: FlightPhase::Lineup,
            runway_distance_ft: 0.0,
            route_distance_nm: 0.0,
            waypoint_index: snapshot.route().first_active_index(),
            established_inbound: false,
            position: dep.threshold,
            heading_deg: dep.heading_deg,
            pitch_deg: 0.0,
            bank_deg: 0.0,
            ias_kts: 0.0,
            ground_speed_kts: 0.0,
            altitude_ft: dep.elevation_ft,
            vertical_speed_fpm: 0.0,
            phase_elapsed_s: 0.0,
            total_elapsed_s: 0.0,
            is_playing: false,
            is_paused: false,
            playback_speed: 1.0,
        }
    }

    pub fn advance_clock(&mut self, dt: f64) {
        self.phase_elapsed_s += dt;
        self.total_elapsed_s += dt;
    }

    /// Switch to `next` and restart the phase clock. Only forward moves are legal.
    pub fn enter(&mut self, next: FlightPhase) {
        debug_assert!(next > self.phase, "backward transition {} -> {}", self.phase, next);
        debug!(
            from = %self.phase,
            to = %next,
            t = self.total_elapsed_s,
            alt_ft = self.altitude_ft,
            ias_kts = self.ias_kts,
            "Phase transition"
        );
        self.phase = next;
        self.phase_elapsed_s = 0.0;
    }

    pub fn height_agl(&self, field_elevation_ft: f64) -> f64 {
        self.altitude_ft - field_elevation_ft
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub max_frame_dt: f64,  // s of wall clock accepted per tick
    pub time_ratio: f64,    // simulated s per wall-clock s at 1x playback
    pub fixed_dt: f64,      // s, step used by the batch runner and seek
    pub max_time: f64,      // s, batch runner hard stop
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_frame_dt: 0.1,   // a stalled frame never jumps more than 100 ms
            time_ratio: 10.0,
            fixed_dt: 1.0,
            max_time: 6.0 * 3600.0,
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::presets::demo_plan;
    use crate::snapshot::create_snapshot;

    #[test]
    fn lineup_sits_on_threshold() {
        let snap = create_snapshot(&demo_plan()).unwrap();
        let s = PhaseState::lineup(&snap);
        assert_eq!(s.phase, FlightPhase::Lineup);
        assert_eq!(s.position, snap.departure().threshold);
        assert_eq!(s.heading_deg, snap.departure().heading_deg);
        assert_eq!(s.waypoint_index, 1);
        assert!(!s.is_playing && !s.is_paused);
        assert_eq!(s.playback_speed, 1.0);
    }

    #[test]
    fn entering_a_phase_resets_its_clock() {
        let snap = create_snapshot(&demo_plan()).unwrap();
        let mut s = PhaseState::lineup(&snap);
        s.advance_clock(2.5);
        s.enter(FlightPhase::TakeoffRoll);
        assert_eq!(s.phase_elapsed_s, 0.0);
        assert_eq!(s.total_elapsed_s, 2.5);
    }

    #[test]
    fn partial_config_json_keeps_defaults() {
        let cfg = SimConfig::from_json(r#"{ "time_ratio": 30.0 }"#).unwrap();
        assert_eq!(cfg.time_ratio, 30.0);
        assert_eq!(cfg.max_frame_dt, 0.1);
        assert_eq!(cfg.fixed_dt, 1.0);
    }
}
