use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Flight phases (declaration order is flight order)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightPhase {
    Lineup,
    TakeoffRoll,
    V1,
    Rotate,
    Liftoff,
    InitialClimb,
    Climb,
    Cruise,
    Descent,
    Approach,
    Final,
    Landing,
    TaxiIn,
    Complete,
}

/// Which physics module advances a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOwner {
    Takeoff,
    Enroute,
    Landing,
}

impl FlightPhase {
    pub const ALL: [FlightPhase; 14] = [
        FlightPhase::Lineup,
        FlightPhase::TakeoffRoll,
        FlightPhase::V1,
        FlightPhase::Rotate,
        FlightPhase::Liftoff,
        FlightPhase::InitialClimb,
        FlightPhase::Climb,
        FlightPhase::Cruise,
        FlightPhase::Descent,
        FlightPhase::Approach,
        FlightPhase::Final,
        FlightPhase::Landing,
        FlightPhase::TaxiIn,
        FlightPhase::Complete,
    ];

    pub fn owner(self) -> PhaseOwner {
        use FlightPhase::*;
        match self {
            Lineup | TakeoffRoll | V1 | Rotate | Liftoff => PhaseOwner::Takeoff,
            InitialClimb | Climb | Cruise | Descent => PhaseOwner::Enroute,
            Approach | Final | Landing | TaxiIn | Complete => PhaseOwner::Landing,
        }
    }

    pub fn is_takeoff_phase(self) -> bool {
        self.owner() == PhaseOwner::Takeoff
    }

    pub fn is_enroute_phase(self) -> bool {
        self.owner() == PhaseOwner::Enroute
    }

    pub fn is_landing_phase(self) -> bool {
        self.owner() == PhaseOwner::Landing
    }

    pub fn is_terminal(self) -> bool {
        self == FlightPhase::Complete
    }

    pub fn as_str(self) -> &'static str {
        use FlightPhase::*;
        match self {
            Lineup => "LINEUP",
            TakeoffRoll => "TAKEOFF_ROLL",
            V1 => "V1",
            Rotate => "ROTATE",
            Liftoff => "LIFTOFF",
            InitialClimb => "INITIAL_CLIMB",
            Climb => "CLIMB",
            Cruise => "CRUISE",
            Descent => "DESCENT",
            Approach => "APPROACH",
            Final => "FINAL",
            Landing => "LANDING",
            TaxiIn => "TAXI_IN",
            Complete => "COMPLETE",
        }
    }
}

impl fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owners_partition_all_phases() {
        for phase in FlightPhase::ALL {
            let hits = [
                phase.is_takeoff_phase(),
                phase.is_enroute_phase(),
                phase.is_landing_phase(),
            ]
            .iter()
            .filter(|b| **b)
            .count();
            assert_eq!(hits, 1, "{} owned by {} modules", phase, hits);
        }
    }

    #[test]
    fn order_matches_flight_sequence() {
        assert!(FlightPhase::ALL.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(FlightPhase::ALL[0], FlightPhase::Lineup);
        assert!(FlightPhase::ALL.last().is_some_and(|p| p.is_terminal()));
    }

    #[test]
    fn serializes_as_screaming_snake() {
        let json = serde_json::to_string(&FlightPhase::InitialClimb).unwrap();
        assert_eq!(json, "\"INITIAL_CLIMB\"");
        assert_eq!(FlightPhase::TakeoffRoll.to_string(), "TAKEOFF_ROLL");
    }
}
