//! Loading trajectory exchange records from disk.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use traffic_core::{Sample, Time, Trajectory};

/// Read a JSON trajectory record (`{ "map_name", "waypoints" }`).
pub fn load_trajectory(path: &Path) -> Result<Trajectory> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_trajectory(&text).with_context(|| format!("invalid trajectory in {}", path.display()))
}

pub fn parse_trajectory(text: &str) -> Result<Trajectory> {
    Ok(serde_json::from_str(text)?)
}

/// Samples every `step` time units from start to finish. The finish time is
/// always included.
pub fn sample_trajectory(trajectory: &Trajectory, step: Time) -> Result<Vec<Sample>> {
    anyhow::ensure!(step > 0, "sample step must be positive, got {step}");

    let mut samples = Vec::new();
    let mut time = trajectory.start_time();
    while time < trajectory.finish_time() {
        samples.push(trajectory.evaluate(time)?);
        match time.checked_add(step) {
            Some(next) => time = next,
            None => break,
        }
    }
    samples.push(trajectory.evaluate(trajectory.finish_time())?);
    Ok(samples)
}
