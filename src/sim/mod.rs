pub mod event;
pub mod output;
pub mod runner;
pub mod scheduler;
pub mod step;

pub use event::{EventDetector, EventKind, SimEvent};
pub use output::FlightOutput;
pub use runner::{simulate, simulate_with};
pub use scheduler::Scheduler;
pub use step::advance;
