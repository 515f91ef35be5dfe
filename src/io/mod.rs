//! Trajectory and summary export.

pub mod csv;
pub mod json;

pub use json::{FlightSummary, PhaseMark};
