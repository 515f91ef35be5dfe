use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dynamics::{FlightPhase, PhaseState, SimConfig};
use crate::snapshot::SimulationSnapshot;

use super::event::{default_detectors, detect, EventDetector, SimEvent};
use super::output::FlightOutput;
use super::step::advance;

pub const MIN_PLAYBACK_SPEED: f64 = 0.25;
pub const MAX_PLAYBACK_SPEED: f64 = 4.0;

// ---------------------------------------------------------------------------
// Scheduler: owns the live phase state and drives it from host ticks
// ---------------------------------------------------------------------------

/// Playback controller for one simulated flight.
///
/// The host calls [`Scheduler::tick`] with wall-clock deltas; everything
/// else is a playback control. Nothing happens until a snapshot is loaded.
pub struct Scheduler {
    config: SimConfig,
    snapshot: Option<Arc<SimulationSnapshot>>,
    state: Option<PhaseState>,
    detectors: Vec<Box<dyn EventDetector + Send>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl Scheduler {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            snapshot: None,
            state: None,
            detectors: default_detectors(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Option<&SimulationSnapshot> {
        self.snapshot.as_deref()
    }

    /// Replace any current flight with a fresh one lined up on the departure runway.
    pub fn load_snapshot(&mut self, snapshot: impl Into<Arc<SimulationSnapshot>>) {
        let snapshot = snapshot.into();
        info!(
            departure = snapshot.departure_icao(),
            runway = %snapshot.departure().designator,
            arrival = snapshot.arrival_icao(),
            "Snapshot loaded"
        );
        self.state = Some(PhaseState::lineup(&snapshot));
        self.snapshot = Some(snapshot);
        self.detectors = default_detectors();
    }

    pub fn play(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.phase == FlightPhase::Lineup {
            state.is_playing = true;
            state.is_paused = false;
            state.enter(FlightPhase::TakeoffRoll);
            info!("Takeoff roll started");
        } else {
            state.is_paused = false;
            state.is_playing = !state.phase.is_terminal();
        }
    }

    pub fn pause(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.is_paused = true;
        }
    }

    pub fn resume(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.is_paused = false;
        }
    }

    /// Back to the lineup position at 1x playback.
    pub fn stop(&mut self) {
        if let Some(snapshot) = &self.snapshot {
            self.state = Some(PhaseState::lineup(snapshot));
            self.detectors = default_detectors();
            debug!("Playback stopped and reset");
        }
    }

    /// Set playback speed, clamped to [0.25, 4]. Non-finite values are ignored.
    pub fn set_speed(&mut self, multiplier: f64) {
        if !multiplier.is_finite() {
            return;
        }
        if let Some(state) = self.state.as_mut() {
            state.playback_speed = multiplier.clamp(MIN_PLAYBACK_SPEED, MAX_PLAYBACK_SPEED);
        }
    }

    /// Jump to `sim_seconds` of simulated time by replaying from the start
    /// in fixed steps.
    ///
    /// Playback flags and speed carry over from the current state, so a
    /// paused flight stays paused. A flight that has not been started with
    /// [`Scheduler::play`] is left at the lineup.
    pub fn seek(&mut self, sim_seconds: f64) -> Vec<SimEvent> {
        let Some(snapshot) = self.snapshot.clone() else {
            return Vec::new();
        };
        let Some(current) = self.state else {
            return Vec::new();
        };
        if current.phase == FlightPhase::Lineup {
            debug!("Seek ignored before takeoff roll");
            return Vec::new();
        }

        let mut state = PhaseState::lineup(&snapshot);
        state.playback_speed = current.playback_speed;
        state.enter(FlightPhase::TakeoffRoll);
        self.detectors = default_detectors();

        let target = sim_seconds.max(0.0);
        let dt = self.config.fixed_dt;
        let mut events = Vec::new();
        while state.total_elapsed_s < target && !state.phase.is_terminal() {
            let step = dt.min(target - state.total_elapsed_s);
            let next = advance(&state, &snapshot, step);
            if next == state {
                warn!(dt, phase = %state.phase, "Seek made no progress; stopping");
                break;
            }
            events.extend(detect(&mut self.detectors, &state, &next));
            state = next;
        }
        state.is_playing = current.is_playing && !state.phase.is_terminal();
        state.is_paused = current.is_paused;

        debug!(t = state.total_elapsed_s, phase = %state.phase, "Seek finished");
        self.state = Some(state);
        events
    }

    /// Advance by one host frame of `wall_dt` seconds and return what happened.
    pub fn tick(&mut self, wall_dt: f64) -> Vec<SimEvent> {
        let (Some(snapshot), Some(state)) = (self.snapshot.as_ref(), self.state) else {
            return Vec::new();
        };
        if !state.is_playing || state.is_paused || state.phase.is_terminal() {
            return Vec::new();
        }

        let wall_dt = if wall_dt.is_finite() {
            wall_dt.clamp(0.0, self.config.max_frame_dt)
        } else {
            0.0
        };
        let dt = wall_dt * state.playback_speed * self.config.time_ratio;
        let next = advance(&state, snapshot, dt);
        let events = detect(&mut self.detectors, &state, &next);
        self.state = Some(next);
        events
    }

    /// Projection of the current state, if a flight is loaded.
    pub fn output(&self) -> Option<FlightOutput> {
        match (&self.snapshot, &self.state) {
            (Some(snapshot), Some(state)) => Some(FlightOutput::project(state, snapshot)),
            _ => None,
        }
    }

    /// Copy of the raw phase state.
    pub fn state(&self) -> Option<PhaseState> {
        self.state
    }
}
