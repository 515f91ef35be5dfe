use std::process::ExitCode;

use flightpath_sim::io::{csv, json, FlightSummary};
use flightpath_sim::logging::init_logging;
use flightpath_sim::planning::presets::demo_plan;
use flightpath_sim::sim::{simulate, EventKind, FlightOutput};
use flightpath_sim::{create_snapshot, PlanningState, SimConfig};

const USAGE: &str = "usage: flightpath-sim [PLAN.json] [--csv TRAJ.csv] [--json SUMMARY.json]";

struct Args {
    plan_path: Option<String>,
    csv_path: Option<String>,
    json_path: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args { plan_path: None, csv_path: None, json_path: None };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--csv" => args.csv_path = Some(it.next().ok_or("--csv needs a path")?),
            "--json" => args.json_path = Some(it.next().ok_or("--json needs a path")?),
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ if args.plan_path.is_none() => args.plan_path = Some(arg),
            _ => return Err(format!("unexpected argument {}\n{}", arg, USAGE)),
        }
    }
    Ok(args)
}

fn load_plan(path: Option<&str>) -> Result<PlanningState, String> {
    match path {
        None => Ok(demo_plan()),
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read plan {}: {}", path, e))?;
            PlanningState::from_json(&text).map_err(|e| format!("cannot parse plan {}: {}", path, e))
        }
    }
}

fn main() -> ExitCode {
    init_logging();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::FAILURE;
        }
    };

    let plan = match load_plan(args.plan_path.as_deref()) {
        Ok(plan) => plan,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::FAILURE;
        }
    };

    let snapshot = match create_snapshot(&plan) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            eprintln!("Plan cannot be simulated:");
            for msg in err.messages() {
                eprintln!("  - {}", msg);
            }
            return ExitCode::FAILURE;
        }
    };

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let config = SimConfig::default();
    let (trajectory, events) = simulate(&snapshot, &config);
    let Some(summary) = FlightSummary::from_trajectory(&trajectory) else {
        eprintln!("Simulation produced no states");
        return ExitCode::FAILURE;
    };

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    let ac = snapshot.aircraft();
    let dep = snapshot.departure();
    let arr = snapshot.arrival();

    println!();
    println!("====================================================================");
    println!(
        "  FLIGHT SIMULATION - {} {} -> {}",
        ac.type_code,
        snapshot.departure_icao(),
        snapshot.arrival_icao()
    );
    println!("====================================================================");
    println!();
    println!("  Plan");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Departure:     {:>5} {:>6.0} ft  hdg {:>5.1}   Arrival:  {:>5} {:>6.0} ft  hdg {:>5.1}",
        dep.designator, dep.length_ft, dep.heading_deg, arr.designator, arr.length_ft, arr.heading_deg
    );
    println!(
        "  Route:         {:>8.1} nm   {} waypoints   est. {:>6.1} min",
        snapshot.route().total_distance_nm,
        snapshot.route().waypoints.len(),
        snapshot.route().estimated_total_min
    );
    println!(
        "  Cruise:        {:>8.0} kt   FL{:03.0}",
        ac.cruise_speed_kts,
        ac.cruise_altitude_ft / 100.0
    );
    println!(
        "  V1/VR/V2:      {:>5.0}/{:.0}/{:.0} kt   VRef {:.0} kt   accel {:.1} kt/s",
        ac.v1_kts, ac.vr_kts, ac.v2_kts, ac.vref_kts, ac.ground_accel_kts_s
    );
    println!();

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>8}  {:<14}  {:>8}  {:>6}  {:>7}  {:>8}",
        "t (min)", "phase", "alt (ft)", "kias", "vs(fpm)", "dist(nm)"
    );
    println!("  {}", "─".repeat(60));
    for event in &events {
        let EventKind::PhaseChange { to, .. } = event.kind else {
            continue;
        };
        let s = &event.state;
        println!(
            "  {:>8.1}  {:<14}  {:>8.0}  {:>6.0}  {:>7.0}  {:>8.1}",
            event.time / 60.0,
            to.as_str(),
            s.altitude_ft,
            s.ias_kts,
            s.vertical_speed_fpm,
            s.route_distance_nm
        );
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Max altitude:  {:>8.0} ft", summary.max_altitude_ft);
    println!("  Max speed:     {:>8.0} kt", summary.max_ias_kts);
    println!(
        "  Climb / sink:  {:>8.0} / {:.0} fpm",
        summary.max_climb_fpm, summary.max_sink_fpm
    );
    if let (Some(ias), Some(sink)) = (summary.touchdown_ias_kts, summary.touchdown_sink_fpm) {
        println!("  Touchdown:     {:>8.0} kt   {:.0} fpm", ias, sink);
    }
    println!(
        "  Flown:         {:>8.1} nm in {:.1} min",
        summary.distance_flown_nm, summary.flight_time_min
    );
    if let Some(last) = trajectory.last() {
        let out = FlightOutput::project(last, &snapshot);
        println!(
            "  Final state:   {}   progress {:.0}%",
            out.phase,
            out.progress * 100.0
        );
    }
    println!();
    println!("  Simulation: {} steps, dt={} s", trajectory.len(), config.fixed_dt);
    println!("====================================================================");
    println!();

    // -----------------------------------------------------------------------
    // Optional exports
    // -----------------------------------------------------------------------
    if let Some(path) = &args.csv_path {
        if let Err(e) = csv::write_trajectory_file(path, &trajectory) {
            eprintln!("cannot write {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    }
    if let Some(path) = &args.json_path {
        if let Err(e) = json::write_summary_file(path, &snapshot, &summary) {
            eprintln!("cannot write {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
