//! Conflict detection core for fleet traffic management.
//!
//! Trajectories are cubic curves through timestamped waypoints on a named
//! map. [`DetectConflict`] decides whether two of them bring their vehicles
//! closer than a safety distance, and if so when and on which segments.

pub mod conflict;
pub mod error;
pub mod polynomial;
pub mod rules;
pub mod spline;
pub mod trajectory;
pub mod waypoint;

pub use conflict::{ConflictData, ConflictReport, ConflictResult, DetectConflict};
pub use error::{
    BadConflictAccess, BroadPhaseRejection, DetectError, DetectResult, TrajectoryError,
    TrajectoryResult,
};
pub use rules::SeparationRules;
pub use trajectory::{Sample, Segment, SegmentId, Segments, Trajectory};
pub use waypoint::{Position, Time, Velocity, Waypoint};
