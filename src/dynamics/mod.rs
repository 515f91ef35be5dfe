pub mod kinematics;
pub mod phase;
pub mod state;

pub use phase::{FlightPhase, PhaseOwner};
pub use state::{PhaseState, SimConfig};
