use std::io::{self, Write};

use serde::Serialize;

use crate::dynamics::{FlightPhase, PhaseState};
use crate::snapshot::SimulationSnapshot;

/// When a phase was first entered during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseMark {
    pub phase: FlightPhase,
    pub time_s: f64,
    pub altitude_ft: f64,
    pub ias_kts: f64,
    pub distance_nm: f64,
}

/// Summary statistics computed from a flight trajectory.
#[derive(Debug, Clone, Serialize)]
pub struct FlightSummary {
    pub max_altitude_ft: f64,
    pub max_ias_kts: f64,
    pub max_climb_fpm: f64,
    pub max_sink_fpm: f64,
    pub touchdown_ias_kts: Option<f64>,
    pub touchdown_sink_fpm: Option<f64>, // last vertical speed on final
    pub distance_flown_nm: f64,
    pub flight_time_min: f64,
    pub final_phase: FlightPhase,
    pub phases: Vec<PhaseMark>,
}

impl FlightSummary {
    /// Compute summary from trajectory data. `None` for an empty trajectory.
    pub fn from_trajectory(trajectory: &[PhaseState]) -> Option<Self> {
        let first = trajectory.first()?;
        let last = trajectory.last()?;

        let max_altitude_ft = trajectory
            .iter()
            .map(|s| s.altitude_ft)
            .fold(f64::MIN, f64::max);
        let max_ias_kts = trajectory.iter().map(|s| s.ias_kts).fold(0.0_f64, f64::max);
        let max_climb_fpm = trajectory
            .iter()
            .map(|s| s.vertical_speed_fpm)
            .fold(0.0_f64, f64::max);
        let max_sink_fpm = trajectory
            .iter()
            .map(|s| -s.vertical_speed_fpm)
            .fold(0.0_f64, f64::max);

        let last_on_final = trajectory
            .iter()
            .rev()
            .find(|s| s.phase == FlightPhase::Final);
        let touchdown = trajectory.iter().find(|s| s.phase == FlightPhase::Landing);

        let mut phases: Vec<PhaseMark> = Vec::new();
        for s in trajectory {
            if phases.last().map_or(true, |m| m.phase != s.phase) {
                phases.push(PhaseMark {
                    phase: s.phase,
                    time_s: s.total_elapsed_s,
                    altitude_ft: s.altitude_ft,
                    ias_kts: s.ias_kts,
                    distance_nm: s.route_distance_nm,
                });
            }
        }

        Some(FlightSummary {
            max_altitude_ft,
            max_ias_kts,
            max_climb_fpm,
            max_sink_fpm,
            touchdown_ias_kts: touchdown.map(|s| s.ias_kts),
            touchdown_sink_fpm: touchdown.and(last_on_final).map(|s| -s.vertical_speed_fpm),
            distance_flown_nm: last.route_distance_nm - first.route_distance_nm,
            flight_time_min: (last.total_elapsed_s - first.total_elapsed_s) / 60.0,
            final_phase: last.phase,
            phases,
        })
    }
}

#[derive(Serialize)]
struct FlightReport<'a> {
    departure: &'a str,
    arrival: &'a str,
    aircraft: &'a str,
    route_nm: f64,
    summary: &'a FlightSummary,
}

/// Write flight summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(
    writer: &mut W,
    snapshot: &SimulationSnapshot,
    summary: &FlightSummary,
) -> io::Result<()> {
    let report = FlightReport {
        departure: snapshot.departure_icao(),
        arrival: snapshot.arrival_icao(),
        aircraft: &snapshot.aircraft().type_code,
        route_nm: snapshot.route().total_distance_nm,
        summary,
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)
}

/// Write flight summary JSON to a file.
pub fn write_summary_file(
    path: &str,
    snapshot: &SimulationSnapshot,
    summary: &FlightSummary,
) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, snapshot, summary)
}
