//! CLI tool to print interpolated motion along a trajectory.

use clap::Parser;
use std::path::PathBuf;
use traffic_cli::{load_trajectory, sample_trajectory};

/// Print position and velocity along a trajectory
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Trajectory file
    #[arg(long)]
    file: PathBuf,

    /// Time between samples
    #[arg(long, default_value_t = 1)]
    step: i64,
}

fn main() -> anyhow::Result<()> {
    traffic_cli::init_tracing()?;
    let args = Args::parse();

    let trajectory = load_trajectory(&args.file)?;
    tracing::info!(
        "{} waypoints on {}, t=[{}, {}]",
        trajectory.len(),
        trajectory.map_name(),
        trajectory.start_time(),
        trajectory.finish_time()
    );

    println!("time\tx\ty\tyaw\tvx\tvy\tyaw_rate");
    for sample in sample_trajectory(&trajectory, args.step)? {
        let [x, y, yaw] = sample.position;
        let [vx, vy, yaw_rate] = sample.velocity;
        println!(
            "{}\t{:.4}\t{:.4}\t{:.4}\t{:.4}\t{:.4}\t{:.4}",
            sample.time, x, y, yaw, vx, vy, yaw_rate
        );
    }
    Ok(())
}
