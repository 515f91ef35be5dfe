//! Phase physics. Each module owns a contiguous block of flight phases and
//! advances a `PhaseState` by one step; none of them keeps state of its own.

pub mod enroute;
pub mod landing;
pub mod takeoff;

use crate::dynamics::{FlightPhase, PhaseOwner, PhaseState};
use crate::geo;
use crate::snapshot::SimulationSnapshot;

/// Distance still to fly to the arrival threshold, in nm.
///
/// Follows the route until the approach, then measures direct to the
/// threshold; zero once the wheels are down.
pub fn remaining_distance_nm(state: &PhaseState, snapshot: &SimulationSnapshot) -> f64 {
    match state.phase.owner() {
        PhaseOwner::Takeoff | PhaseOwner::Enroute => enroute::route_remaining_nm(state, snapshot),
        PhaseOwner::Landing => match state.phase {
            FlightPhase::Approach | FlightPhase::Final => {
                geo::great_circle_distance_nm(state.position, snapshot.arrival().threshold)
            }
            _ => 0.0,
        },
    }
}
