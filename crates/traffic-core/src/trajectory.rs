//! Time-indexed trajectories and their segments.

use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

use crate::error::{TrajectoryError, TrajectoryResult};
use crate::spline::Spline;
use crate::waypoint::{Position, Time, Velocity, Waypoint};

/// Stable handle to the segment between waypoints `i` and `i + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(usize);

impl SegmentId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// Indices of the waypoints bounding this segment.
    pub fn waypoint_indices(self) -> (usize, usize) {
        (self.0, self.0 + 1)
    }
}

/// Interpolated motion at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub time: f64,
    pub position: Position,
    pub velocity: Velocity,
}

/// An ordered sequence of waypoints on a named map.
///
/// Waypoint times are strictly increasing and there are always at least two
/// waypoints, so every trajectory has at least one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrajectoryRecord", into = "TrajectoryRecord")]
pub struct Trajectory {
    map_name: String,
    waypoints: Vec<Waypoint>,
}

/// Wire form of a trajectory. Deserializing goes through [`Trajectory::new`]
/// so malformed records are rejected before they reach detection.
#[derive(Serialize, Deserialize)]
struct TrajectoryRecord {
    map_name: String,
    waypoints: Vec<Waypoint>,
}

impl TryFrom<TrajectoryRecord> for Trajectory {
    type Error = TrajectoryError;

    fn try_from(record: TrajectoryRecord) -> Result<Self, Self::Error> {
        Trajectory::new(record.waypoints, record.map_name)
    }
}

impl From<Trajectory> for TrajectoryRecord {
    fn from(trajectory: Trajectory) -> Self {
        Self {
            map_name: trajectory.map_name,
            waypoints: trajectory.waypoints,
        }
    }
}

impl Trajectory {
    pub fn new(waypoints: Vec<Waypoint>, map_name: impl Into<String>) -> TrajectoryResult<Self> {
        if waypoints.len() < 2 {
            return Err(TrajectoryError::TooFewWaypoints(waypoints.len()));
        }
        if let Some(index) = waypoints.iter().position(|wp| !wp.is_finite()) {
            return Err(TrajectoryError::NonFinite { index });
        }
        for (index, pair) in waypoints.windows(2).enumerate() {
            if pair[1].time() <= pair[0].time() {
                return Err(TrajectoryError::InvalidOrdering {
                    index: index + 1,
                    previous: pair[0].time(),
                    time: pair[1].time(),
                });
            }
        }

        Ok(Self {
            map_name: map_name.into(),
            waypoints,
        })
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Number of waypoints.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn start_time(&self) -> Time {
        self.waypoints[0].time()
    }

    pub fn finish_time(&self) -> Time {
        self.waypoints[self.waypoints.len() - 1].time()
    }

    /// Time from start to finish. Unsigned, so it holds the span between any
    /// two `Time` values.
    pub fn duration(&self) -> u64 {
        self.finish_time().abs_diff(self.start_time())
    }

    /// Iterate over the segments in time order.
    pub fn segments(&self) -> Segments<'_> {
        Segments {
            trajectory: self,
            next: 0,
            end: self.waypoints.len() - 1,
        }
    }

    pub fn segment(&self, id: SegmentId) -> Option<Segment<'_>> {
        (id.0 + 1 < self.waypoints.len()).then_some(Segment {
            trajectory: self,
            id,
        })
    }

    /// The segment active at `time`. A knot time belongs to the segment
    /// that ends there, except for the start time.
    pub fn find(&self, time: f64) -> Option<Segment<'_>> {
        if time < self.start_time() as f64 || time > self.finish_time() as f64 {
            return None;
        }
        let upper = self
            .waypoints
            .partition_point(|wp| (wp.time() as f64) < time)
            .max(1);
        self.segment(SegmentId(upper - 1))
    }

    /// Position and velocity at an integer time.
    pub fn evaluate(&self, time: Time) -> TrajectoryResult<Sample> {
        self.evaluate_at(time as f64)
    }

    /// Position and velocity at any time within the trajectory.
    pub fn evaluate_at(&self, time: f64) -> TrajectoryResult<Sample> {
        let spline = self.spline_at(time)?;
        Ok(Sample {
            time,
            position: spline.position_at(time),
            velocity: spline.velocity_at(time),
        })
    }

    pub fn acceleration_at(&self, time: f64) -> TrajectoryResult<[f64; 3]> {
        Ok(self.spline_at(time)?.acceleration_at(time))
    }

    /// Insert a waypoint at its place in time, returning its index.
    pub fn insert(&mut self, waypoint: Waypoint) -> TrajectoryResult<usize> {
        match self
            .waypoints
            .binary_search_by_key(&waypoint.time(), Waypoint::time)
        {
            Ok(_) => Err(TrajectoryError::DuplicateTime(waypoint.time())),
            Err(index) if !waypoint.is_finite() => Err(TrajectoryError::NonFinite { index }),
            Err(index) => {
                self.waypoints.insert(index, waypoint);
                Ok(index)
            }
        }
    }

    fn spline_at(&self, time: f64) -> TrajectoryResult<Spline> {
        self.find(time)
            .map(|segment| segment.spline())
            .ok_or(TrajectoryError::OutOfRange {
                time,
                start: self.start_time(),
                finish: self.finish_time(),
            })
    }
}

/// Borrowed view of one segment of a trajectory.
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    trajectory: &'a Trajectory,
    id: SegmentId,
}

impl<'a> Segment<'a> {
    pub fn id(&self) -> SegmentId {
        self.id
    }

    pub fn trajectory(&self) -> &'a Trajectory {
        self.trajectory
    }

    pub fn start(&self) -> &'a Waypoint {
        &self.trajectory.waypoints[self.id.0]
    }

    pub fn finish(&self) -> &'a Waypoint {
        &self.trajectory.waypoints[self.id.0 + 1]
    }

    pub fn start_time(&self) -> Time {
        self.start().time()
    }

    pub fn finish_time(&self) -> Time {
        self.finish().time()
    }

    pub fn spline(&self) -> Spline {
        Spline::new(self.start(), self.finish())
    }
}

/// Two segments are equal when they are the same segment of the same
/// trajectory instance.
impl PartialEq for Segment<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.trajectory, other.trajectory) && self.id == other.id
    }
}

impl Eq for Segment<'_> {}

/// Iterator over the segments of a trajectory. Clone it to restart.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    trajectory: &'a Trajectory,
    next: usize,
    end: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let id = SegmentId(self.next);
        self.next += 1;
        Some(Segment {
            trajectory: self.trajectory,
            id,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Segments<'_> {}

impl FusedIterator for Segments<'_> {}
