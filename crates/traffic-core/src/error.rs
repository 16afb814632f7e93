//! Error types for trajectory construction and conflict detection.

use thiserror::Error;

use crate::waypoint::Time;

/// Errors produced while building or querying a [`Trajectory`](crate::Trajectory).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrajectoryError {
    #[error("a trajectory needs at least 2 waypoints, got {0}")]
    TooFewWaypoints(usize),

    #[error(
        "waypoint {index} has time {time}, which does not come after the previous time {previous}"
    )]
    InvalidOrdering {
        index: usize,
        previous: Time,
        time: Time,
    },

    #[error("waypoint {index} has a position or velocity that is not finite")]
    NonFinite { index: usize },

    #[error("a waypoint already exists at time {0}")]
    DuplicateTime(Time),

    #[error("time {time} is outside the trajectory range [{start}, {finish}]")]
    OutOfRange { time: f64, start: Time, finish: Time },
}

/// Which broad-phase condition a pair of trajectories failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadPhaseRejection {
    /// The trajectories are on different maps.
    MapMismatch,
    /// The time spans of the trajectories do not overlap.
    NoTimeOverlap,
}

impl std::fmt::Display for BroadPhaseRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MapMismatch => write!(f, "trajectories are on different maps"),
            Self::NoTimeOverlap => write!(f, "trajectory time spans do not overlap"),
        }
    }
}

/// Errors produced by conflict detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DetectError {
    #[error("narrow phase requires a passing broad phase: {0}")]
    BroadPhaseRejected(BroadPhaseRejection),
}

/// Returned when conflict details are requested from a conflict-free result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Error)]
#[error("bad conflict access: the result does not hold a conflict")]
pub struct BadConflictAccess;

pub type TrajectoryResult<T> = Result<T, TrajectoryError>;
pub type DetectResult<T> = Result<T, DetectError>;
