//! Pre-defined trajectory pairs for trying out detection.

use traffic_core::{Trajectory, TrajectoryResult, Waypoint};

/// A named pair of trajectories.
pub struct Scenario {
    pub name: String,
    pub trajectories: (Trajectory, Trajectory),
}

fn wp(time: i64, x: f64, y: f64, vx: f64, vy: f64) -> Waypoint {
    Waypoint::new(time, [x, y, 0.0], [vx, vy, 0.0])
}

fn eastbound(map: &str) -> TrajectoryResult<Trajectory> {
    Trajectory::new(vec![wp(0, 0.0, 0.0, 1.0, 0.0), wp(10, 10.0, 0.0, 1.0, 0.0)], map)
}

/// Two vehicles whose paths cross near t=5.
///
/// - Vehicle 1: West to East along y=0
/// - Vehicle 2: drifting from y=1 to y=-1
pub fn create_crossing_scenario() -> TrajectoryResult<Scenario> {
    let second = Trajectory::new(
        vec![wp(0, 0.0, 1.0, 0.0, -0.2), wp(10, 10.0, -1.0, 0.0, -0.2)],
        "L1",
    )?;
    Ok(Scenario {
        name: "crossing".to_string(),
        trajectories: (eastbound("L1")?, second),
    })
}

/// Two vehicles moving side by side, 5 apart.
pub fn create_parallel_scenario() -> TrajectoryResult<Scenario> {
    let second = Trajectory::new(
        vec![wp(0, 0.0, 5.0, 0.0, 0.0), wp(10, 10.0, 5.0, 0.0, 0.0)],
        "L1",
    )?;
    Ok(Scenario {
        name: "parallel".to_string(),
        trajectories: (eastbound("L1")?, second),
    })
}

/// The crossing scenario with the second vehicle on another map.
pub fn create_other_map_scenario() -> TrajectoryResult<Scenario> {
    let second = Trajectory::new(
        vec![wp(0, 0.0, 1.0, 0.0, -0.2), wp(10, 10.0, -1.0, 0.0, -0.2)],
        "L2",
    )?;
    Ok(Scenario {
        name: "other-map".to_string(),
        trajectories: (eastbound("L1")?, second),
    })
}
