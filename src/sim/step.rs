use crate::dynamics::{PhaseOwner, PhaseState};
use crate::physics::{enroute, landing, takeoff};
use crate::snapshot::SimulationSnapshot;

// ---------------------------------------------------------------------------
// Single simulation step
// ---------------------------------------------------------------------------

/// Advance `state` by `dt` simulated seconds through the module that owns
/// its phase. At most one phase transition happens per call.
pub fn advance(state: &PhaseState, snapshot: &SimulationSnapshot, dt: f64) -> PhaseState {
    if !(dt > 0.0) || state.phase.is_terminal() {
        return *state;
    }
    match state.phase.owner() {
        PhaseOwner::Takeoff => takeoff::advance(state, snapshot, dt),
        PhaseOwner::Enroute => enroute::advance(state, snapshot, dt),
        PhaseOwner::Landing => landing::advance(state, snapshot, dt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::FlightPhase;
    use crate::planning::presets::demo_plan;
    use crate::snapshot::create_snapshot;

    #[test]
    fn zero_or_negative_dt_is_a_no_op() {
        let snap = create_snapshot(&demo_plan()).unwrap();
        let mut s = PhaseState::lineup(&snap);
        s.phase = FlightPhase::TakeoffRoll;
        assert_eq!(advance(&s, &snap, 0.0), s);
        assert_eq!(advance(&s, &snap, -1.0), s);
        assert_eq!(advance(&s, &snap, f64::NAN), s);
    }

    #[test]
    fn routes_to_owning_module() {
        let snap = create_snapshot(&demo_plan()).unwrap();
        let mut s = PhaseState::lineup(&snap);
        s.phase = FlightPhase::TakeoffRoll;
        let next = advance(&s, &snap, 1.0);
        assert_eq!(next, takeoff::advance(&s, &snap, 1.0));
        assert!(next.ias_kts > 0.0);
    }
}
