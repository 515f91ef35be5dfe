use std::io::{self, Write};

use crate::dynamics::PhaseState;

/// Write trajectory data to CSV format.
///
/// Columns: time_s, phase, lat, lon, altitude_ft, heading_deg, pitch_deg,
///          bank_deg, ias_kts, gs_kts, vs_fpm, distance_nm, waypoint
pub fn write_trajectory<W: Write>(writer: &mut W, trajectory: &[PhaseState]) -> io::Result<()> {
    writeln!(
        writer,
        "time_s,phase,lat,lon,altitude_ft,heading_deg,pitch_deg,\
         bank_deg,ias_kts,gs_kts,vs_fpm,distance_nm,waypoint"
    )?;

    for s in trajectory {
        writeln!(
            writer,
            "{:.2},{},{:.6},{:.6},{:.1},{:.2},{:.2},\
             {:.2},{:.1},{:.1},{:.0},{:.3},{}",
            s.total_elapsed_s,
            s.phase,
            s.position.lat, s.position.lon,
            s.altitude_ft,
            s.heading_deg, s.pitch_deg, s.bank_deg,
            s.ias_kts, s.ground_speed_kts,
            s.vertical_speed_fpm,
            s.route_distance_nm,
            s.waypoint_index,
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: &str, trajectory: &[PhaseState]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trajectory(&mut file, trajectory)
}
