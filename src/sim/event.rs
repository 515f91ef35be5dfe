use serde::Serialize;

use crate::dynamics::{FlightPhase, PhaseState};

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EventKind {
    PhaseChange { from: FlightPhase, to: FlightPhase },
    Complete,
    Custom(String),
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64, // simulated seconds since takeoff roll
    pub kind: EventKind,
    pub state: PhaseState,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive states and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &PhaseState, current: &PhaseState) -> Option<EventKind>;
}

/// Reports every phase transition, and completion separately.
pub struct PhaseChangeDetector;

impl EventDetector for PhaseChangeDetector {
    fn check(&mut self, prev: &PhaseState, current: &PhaseState) -> Option<EventKind> {
        if prev.phase == current.phase {
            None
        } else {
            Some(EventKind::PhaseChange { from: prev.phase, to: current.phase })
        }
    }
}

/// Fires once when the flight reaches `COMPLETE`.
#[derive(Default)]
pub struct CompletionDetector {
    fired: bool,
}

impl EventDetector for CompletionDetector {
    fn check(&mut self, prev: &PhaseState, current: &PhaseState) -> Option<EventKind> {
        if self.fired || prev.phase.is_terminal() || !current.phase.is_terminal() {
            return None;
        }
        self.fired = true;
        Some(EventKind::Complete)
    }
}

/// Detects when altitude (ft MSL) crosses a threshold (ascending or descending).
pub struct AltitudeDetector {
    pub altitude_ft: f64,
    pub ascending: bool,
    fired: bool,
}

impl AltitudeDetector {
    pub fn new(altitude_ft: f64, ascending: bool) -> Self {
        Self { altitude_ft, ascending, fired: false }
    }
}

impl EventDetector for AltitudeDetector {
    fn check(&mut self, prev: &PhaseState, current: &PhaseState) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        let crossed = if self.ascending {
            prev.altitude_ft < self.altitude_ft && current.altitude_ft >= self.altitude_ft
        } else {
            prev.altitude_ft > self.altitude_ft && current.altitude_ft <= self.altitude_ft
        };
        if crossed {
            self.fired = true;
            Some(EventKind::Custom(format!(
                "Altitude {:.0} ft ({})",
                self.altitude_ft,
                if self.ascending { "climbing" } else { "descending" }
            )))
        } else {
            None
        }
    }
}

/// Detectors every scheduler and batch run starts with.
pub fn default_detectors() -> Vec<Box<dyn EventDetector + Send>> {
    vec![
        Box::new(PhaseChangeDetector),
        Box::new(CompletionDetector::default()),
    ]
}

/// Run every detector over one step and collect what fired.
pub fn detect(
    detectors: &mut [Box<dyn EventDetector + Send>],
    prev: &PhaseState,
    current: &PhaseState,
) -> Vec<SimEvent> {
    detectors
        .iter_mut()
        .filter_map(|d| d.check(prev, current))
        .map(|kind| SimEvent {
            time: current.total_elapsed_s,
            kind,
            state: *current,
        })
        .collect()
}
