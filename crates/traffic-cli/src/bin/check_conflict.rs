//! CLI tool to check two trajectories for a conflict.
//!
//! Loads two trajectory records from JSON files, or uses a built-in
//! scenario, and runs broad + narrow phase detection on them.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use traffic_cli::scenarios::{
    create_crossing_scenario, create_other_map_scenario, create_parallel_scenario,
};
use traffic_cli::{load_trajectory, Config};
use traffic_core::{ConflictReport, DetectConflict, Trajectory};

/// Built-in scenarios
#[derive(Debug, Clone, ValueEnum)]
enum ScenarioType {
    /// Paths crossing near t=5
    Crossing,
    /// Side by side, 5 apart
    Parallel,
    /// Crossing paths on different maps
    OtherMap,
}

/// Check two trajectories for a conflict
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// First trajectory file
    #[arg(long, requires = "b", conflicts_with = "scenario")]
    a: Option<PathBuf>,

    /// Second trajectory file
    #[arg(long, requires = "a")]
    b: Option<PathBuf>,

    /// Built-in scenario to check instead of files
    #[arg(long, value_enum)]
    scenario: Option<ScenarioType>,

    /// Footprint radius of each vehicle (env: TRAFFIC_FOOTPRINT_RADIUS)
    #[arg(long)]
    footprint_radius: Option<f64>,

    /// Extra clearance between footprints (env: TRAFFIC_CLEARANCE)
    #[arg(long)]
    clearance: Option<f64>,

    /// Precision of the reported conflict time (env: TRAFFIC_TIME_TOLERANCE)
    #[arg(long)]
    tolerance: Option<f64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    traffic_cli::init_tracing()?;
    let args = Args::parse();

    let config = Config::from_env().with_overrides(
        args.footprint_radius,
        args.clearance,
        args.tolerance,
    );
    let detector = DetectConflict::new(config.rules);

    let (a, b) = match (&args.a, &args.b, &args.scenario) {
        (Some(a), Some(b), _) => (load_trajectory(a)?, load_trajectory(b)?),
        (_, _, Some(scenario)) => {
            let scenario = match scenario {
                ScenarioType::Crossing => create_crossing_scenario(),
                ScenarioType::Parallel => create_parallel_scenario(),
                ScenarioType::OtherMap => create_other_map_scenario(),
            }
            .context("failed to build scenario")?;
            tracing::info!("Scenario: {}", scenario.name);
            scenario.trajectories
        }
        _ => anyhow::bail!("pass either --a and --b, or --scenario"),
    };

    tracing::info!(
        "Checking {} ({} waypoints) against {} ({} waypoints), safety distance {}",
        a.map_name(),
        a.len(),
        b.map_name(),
        b.len(),
        detector.rules().safety_distance()
    );

    let result = detector.between(&a, &b);
    let report = ConflictReport::from(&result);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_summary(&a, &b, &report);
    Ok(())
}

fn print_summary(a: &Trajectory, b: &Trajectory, report: &ConflictReport) {
    if !DetectConflict::broad_phase(a, b) {
        println!("No conflict (rejected in broad phase)");
        return;
    }
    match (report.exact_time, report.segments) {
        (Some(time), Some((seg_a, seg_b))) => {
            println!(
                "CONFLICT at t={:.6} (segment {} of A, segment {} of B)",
                time,
                seg_a.index(),
                seg_b.index()
            );
        }
        _ => println!("No conflict"),
    }
}
