//! Traffic CLI - command line tools around the conflict detection core.
//!
//! Binaries:
//! - check_conflict: check two trajectories (or a built-in scenario)
//! - sample_trajectory: print interpolated motion along a trajectory

pub mod config;
pub mod scenarios;
pub mod trajectory_file;

pub use config::Config;
pub use trajectory_file::{load_trajectory, parse_trajectory, sample_trajectory};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log to stderr so stdout stays clean for reports.
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("traffic_cli=info".parse()?)
            .add_directive("traffic_core=debug".parse()?))
        .init();
    Ok(())
}
