use tracing::{info, warn};

use crate::dynamics::{FlightPhase, PhaseState, SimConfig};
use crate::snapshot::SimulationSnapshot;

use super::event::{default_detectors, detect, EventDetector, SimEvent};
use super::step::advance;

// ---------------------------------------------------------------------------
// Full flight simulation
// ---------------------------------------------------------------------------

/// Fly a whole snapshot at `config.fixed_dt` with extra event detectors.
/// Returns every state from the start of the takeoff roll and the events seen.
pub fn simulate_with(
    snapshot: &SimulationSnapshot,
    config: &SimConfig,
    detectors: Vec<Box<dyn EventDetector + Send>>,
) -> (Vec<PhaseState>, Vec<SimEvent>) {
    let mut state = PhaseState::lineup(snapshot);
    state.is_playing = true;
    state.enter(FlightPhase::TakeoffRoll);

    let mut all_detectors = default_detectors();
    all_detectors.extend(detectors);

    let dt = config.fixed_dt;
    let capacity = (config.max_time / dt.max(1e-3)) as usize + 1;
    let mut trajectory = Vec::with_capacity(capacity.min(200_000));
    let mut events = Vec::new();

    trajectory.push(state);

    while !state.phase.is_terminal() && state.total_elapsed_s < config.max_time {
        let next = advance(&state, snapshot, dt);
        if next == state {
            warn!(phase = %state.phase, "Simulation made no progress; stopping");
            break;
        }
        events.extend(detect(&mut all_detectors, &state, &next));
        state = next;
        trajectory.push(state);
    }

    if !state.phase.is_terminal() {
        warn!(
            phase = %state.phase,
            t = state.total_elapsed_s,
            "Flight did not complete before the time limit"
        );
    }
    info!(
        steps = trajectory.len(),
        t = state.total_elapsed_s,
        phase = %state.phase,
        "Batch simulation finished"
    );
    (trajectory, events)
}

/// Simulate with the default detectors (convenience wrapper).
pub fn simulate(
    snapshot: &SimulationSnapshot,
    config: &SimConfig,
) -> (Vec<PhaseState>, Vec<SimEvent>) {
    simulate_with(snapshot, config, Vec::new())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
