//! Conflict detection between two planned trajectories.
//!
//! Detection runs in two phases. The broad phase rejects pairs that are on
//! different maps or never active at the same time. The narrow phase walks
//! every pair of segments that overlap in time and finds the earliest
//! instant the distance between the two interpolated positions drops below
//! the safety distance. Each pair reduces to a polynomial of degree at most
//! six whose first negative point is located exactly, so fast vehicles
//! cannot pass through each other between samples.

use serde::{Deserialize, Serialize};

use crate::error::{BadConflictAccess, BroadPhaseRejection, DetectError, DetectResult};
use crate::polynomial::Polynomial;
use crate::rules::SeparationRules;
use crate::trajectory::{Segment, SegmentId, Trajectory};
use crate::waypoint::Time;

/// Where and when two trajectories conflict.
///
/// Only produced by narrow phase. The segments borrow the trajectories that
/// were checked, so those must outlive this value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConflictData<'a> {
    time: f64,
    segments: (Segment<'a>, Segment<'a>),
}

impl<'a> ConflictData<'a> {
    /// The last whole time unit at or before the onset of the conflict.
    pub fn get_time(&self) -> Time {
        self.time.floor() as Time
    }

    /// Onset of the conflict, located to within the configured tolerance.
    pub fn exact_time(&self) -> f64 {
        self.time
    }

    /// The conflicting segment of the first and second trajectory.
    pub fn get_segments(&self) -> (Segment<'a>, Segment<'a>) {
        self.segments
    }

    pub fn segment_ids(&self) -> (SegmentId, SegmentId) {
        (self.segments.0.id(), self.segments.1.id())
    }
}

/// Outcome of a detection call: either no conflict, or one [`ConflictData`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConflictResult<'a> {
    data: Option<ConflictData<'a>>,
}

impl<'a> ConflictResult<'a> {
    pub fn has_conflict(&self) -> bool {
        self.data.is_some()
    }

    /// Conflict details, or [`BadConflictAccess`] if there was no conflict.
    pub fn get(&self) -> Result<&ConflictData<'a>, BadConflictAccess> {
        self.data.as_ref().ok_or(BadConflictAccess)
    }

    pub fn into_option(self) -> Option<ConflictData<'a>> {
        self.data
    }

    fn conflict(data: ConflictData<'a>) -> Self {
        Self { data: Some(data) }
    }
}

impl From<&ConflictResult<'_>> for bool {
    fn from(result: &ConflictResult<'_>) -> Self {
        result.has_conflict()
    }
}

impl<'a> TryFrom<ConflictResult<'a>> for ConflictData<'a> {
    type Error = BadConflictAccess;

    fn try_from(result: ConflictResult<'a>) -> Result<Self, Self::Error> {
        result.data.ok_or(BadConflictAccess)
    }
}

/// Owned summary of a [`ConflictResult`], for printing or sending on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub conflict: bool,
    pub time: Option<Time>,
    pub exact_time: Option<f64>,
    /// Segment of the first and second trajectory
    pub segments: Option<(SegmentId, SegmentId)>,
}

impl From<&ConflictResult<'_>> for ConflictReport {
    fn from(result: &ConflictResult<'_>) -> Self {
        match result.get() {
            Ok(data) => Self {
                conflict: true,
                time: Some(data.get_time()),
                exact_time: Some(data.exact_time()),
                segments: Some(data.segment_ids()),
            },
            Err(BadConflictAccess) => Self {
                conflict: false,
                time: None,
                exact_time: None,
                segments: None,
            },
        }
    }
}

/// Two-phase conflict detector.
///
/// Holds no state besides its rules, so one detector can be shared across
/// threads and reused for any number of pairs.
#[derive(Debug, Clone, Default)]
pub struct DetectConflict {
    rules: SeparationRules,
}

impl DetectConflict {
    pub fn new(rules: SeparationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &SeparationRules {
        &self.rules
    }

    /// Check two trajectories for a conflict.
    ///
    /// Runs [`broad_phase`](Self::broad_phase) first and only pays for the
    /// narrow phase when it passes.
    pub fn between<'a>(&self, a: &'a Trajectory, b: &'a Trajectory) -> ConflictResult<'a> {
        match check_broad_phase(a, b) {
            Ok(()) => self.narrow_phase_unchecked(a, b),
            Err(reason) => {
                tracing::debug!(
                    "Broad phase rejected {} <-> {}: {}",
                    a.map_name(),
                    b.map_name(),
                    reason
                );
                ConflictResult::default()
            }
        }
    }

    /// True iff both trajectories are on the same map and their time spans
    /// overlap (touching spans count as overlapping).
    pub fn broad_phase(a: &Trajectory, b: &Trajectory) -> bool {
        check_broad_phase(a, b).is_ok()
    }

    /// Narrow phase, after confirming that the pair passes the broad phase.
    pub fn narrow_phase<'a>(
        &self,
        a: &'a Trajectory,
        b: &'a Trajectory,
    ) -> DetectResult<ConflictResult<'a>> {
        check_broad_phase(a, b).map_err(DetectError::BroadPhaseRejected)?;
        Ok(self.narrow_phase_unchecked(a, b))
    }

    /// Narrow phase without the broad-phase check.
    ///
    /// Only call this for pairs that already passed
    /// [`broad_phase`](Self::broad_phase). For other pairs the answer is
    /// meaningless (map names are ignored), though it never panics.
    pub fn narrow_phase_unchecked<'a>(
        &self,
        a: &'a Trajectory,
        b: &'a Trajectory,
    ) -> ConflictResult<'a> {
        let threshold_sq = self.rules.safety_distance().powi(2);
        let mut best: Option<ConflictData<'a>> = None;

        for seg_a in a.segments() {
            if let Some(found) = &best {
                if seg_a.start_time() as f64 > found.time {
                    break;
                }
            }

            for seg_b in b.segments() {
                if seg_b.finish_time() < seg_a.start_time() {
                    continue;
                }
                if seg_b.start_time() > seg_a.finish_time() {
                    break;
                }

                let lo = seg_a.start_time().max(seg_b.start_time());
                let hi = seg_a.finish_time().min(seg_b.finish_time());
                let Some(time) = self.first_violation(&seg_a, &seg_b, lo, hi, threshold_sq)
                else {
                    continue;
                };

                tracing::trace!(
                    "Segments {} x {} violate separation at t={}",
                    seg_a.id().index(),
                    seg_b.id().index(),
                    time
                );

                let replace = best
                    .as_ref()
                    .map(|found| time < found.time)
                    .unwrap_or(true);
                if replace {
                    best = Some(ConflictData {
                        time,
                        segments: (seg_a, seg_b),
                    });
                }
            }
        }

        match best {
            Some(data) => {
                tracing::debug!(
                    "Conflict on {} at t={} (segments {} x {})",
                    a.map_name(),
                    data.time,
                    data.segments.0.id().index(),
                    data.segments.1.id().index()
                );
                ConflictResult::conflict(data)
            }
            None => ConflictResult::default(),
        }
    }

    /// Earliest time in `[lo, hi]` at which the two segments are closer than
    /// the safety distance.
    fn first_violation(
        &self,
        seg_a: &Segment<'_>,
        seg_b: &Segment<'_>,
        lo: Time,
        hi: Time,
        threshold_sq: f64,
    ) -> Option<f64> {
        let spline_a = seg_a.spline();
        let spline_b = seg_b.spline();
        let start = lo as f64;

        if lo == hi {
            let pa = spline_a.position_at(start);
            let pb = spline_b.position_at(start);
            let dist_sq = (pa[0] - pb[0]).powi(2) + (pa[1] - pb[1]).powi(2);
            return (dist_sq < threshold_sq).then_some(start);
        }

        // Work in u in [0, 1] over the pair window to keep coefficients
        // well scaled whatever the time unit is.
        let span = hi.abs_diff(lo) as f64;
        let dx = &spline_a.polynomial_over(0, start, span)
            - &spline_b.polynomial_over(0, start, span);
        let dy = &spline_a.polynomial_over(1, start, span)
            - &spline_b.polynomial_over(1, start, span);
        let distance_sq = &(&dx * &dx) + &(&dy * &dy);
        let separation = &distance_sq - &Polynomial::constant(threshold_sq);

        let tolerance = (self.rules.time_tolerance / span).max(f64::EPSILON);
        separation
            .first_negative_in(0.0, 1.0, tolerance)
            .map(|u| start + u * span)
    }
}

fn check_broad_phase(a: &Trajectory, b: &Trajectory) -> Result<(), BroadPhaseRejection> {
    if a.map_name() != b.map_name() {
        return Err(BroadPhaseRejection::MapMismatch);
    }
    if a.finish_time() < b.start_time() || b.finish_time() < a.start_time() {
        return Err(BroadPhaseRejection::NoTimeOverlap);
    }
    Ok(())
}
