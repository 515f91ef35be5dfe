pub mod dynamics;
pub mod error;
pub mod geo;
pub mod io;
pub mod logging;
pub mod physics;
pub mod planning;
pub mod sim;
pub mod snapshot;

pub use dynamics::{FlightPhase, PhaseState, SimConfig};
pub use error::SnapshotError;
pub use geo::GeoPoint;
pub use planning::PlanningState;
pub use sim::{FlightOutput, Scheduler, SimEvent};
pub use snapshot::{create_snapshot, SimulationSnapshot};
