//! Conflict detection integration tests.
//!
//! Exercises the public detection surface on small hand-built trajectories.

use traffic_core::{
    BadConflictAccess, ConflictReport, DetectConflict, SegmentId, SeparationRules, Trajectory,
    Waypoint,
};

fn wp(time: i64, x: f64, y: f64, vx: f64, vy: f64) -> Waypoint {
    Waypoint::new(time, [x, y, 0.0], [vx, vy, 0.0])
}

/// A = [(t=0,(0,0,0),(1,0,0)), (t=10,(10,0,0),(1,0,0))]
fn trajectory_a(map: &str) -> Trajectory {
    Trajectory::new(vec![wp(0, 0.0, 0.0, 1.0, 0.0), wp(10, 10.0, 0.0, 1.0, 0.0)], map).unwrap()
}

/// Parallel to A at a distance of 5, starting and ending at rest.
fn parallel_b(map: &str) -> Trajectory {
    Trajectory::new(vec![wp(0, 0.0, 5.0, 0.0, 0.0), wp(10, 10.0, 5.0, 0.0, 0.0)], map).unwrap()
}

/// Drifts from y=1 to y=-1, crossing A's path near t=5.
fn crossing_b(map: &str) -> Trajectory {
    Trajectory::new(
        vec![wp(0, 0.0, 1.0, 0.0, -0.2), wp(10, 10.0, -1.0, 0.0, -0.2)],
        map,
    )
    .unwrap()
}

/// A with an extra knot at t=5.
fn three_knot_a() -> Trajectory {
    Trajectory::new(
        vec![
            wp(0, 0.0, 0.0, 1.0, 0.0),
            wp(5, 5.0, 0.0, 1.0, 0.0),
            wp(10, 10.0, 0.0, 1.0, 0.0),
        ],
        "L1",
    )
    .unwrap()
}

/// Parked at (8, 0.5), split into segments that end at t=8, 9 and 10.
fn late_parked() -> Trajectory {
    Trajectory::new(
        vec![
            wp(0, 8.0, 0.5, 0.0, 0.0),
            wp(8, 8.0, 0.5, 0.0, 0.0),
            wp(9, 8.0, 0.5, 0.0, 0.0),
            wp(10, 8.0, 0.5, 0.0, 0.0),
        ],
        "L1",
    )
    .unwrap()
}

fn unit_threshold() -> DetectConflict {
    DetectConflict::new(SeparationRules::with_safety_distance(1.0))
}

#[test]
fn test_parallel_paths_do_not_conflict() {
    let a = trajectory_a("L1");
    let b = parallel_b("L1");

    assert!(DetectConflict::broad_phase(&a, &b));
    let result = unit_threshold().between(&a, &b);
    assert!(!result.has_conflict());
    assert_eq!(result.get().unwrap_err(), BadConflictAccess);
}

#[test]
fn test_crossing_paths_conflict() {
    let a = trajectory_a("L1");
    let b = crossing_b("L1");

    let result = unit_threshold().between(&a, &b);
    assert!(result.has_conflict());

    let data = result.get().unwrap();
    assert!(data.exact_time() >= 0.0 && data.exact_time() <= 10.0);
    assert!(data.exact_time() < 5.0, "onset {} should precede the crossing", data.exact_time());

    // The separation really is below the threshold at the reported instant.
    let pa = a.evaluate_at(data.exact_time()).unwrap().position;
    let pb = b.evaluate_at(data.exact_time()).unwrap().position;
    let distance = ((pa[0] - pb[0]).powi(2) + (pa[1] - pb[1]).powi(2)).sqrt();
    assert!(distance < 1.0 + 1e-9);

    let (seg_a, seg_b) = data.get_segments();
    assert_eq!(seg_a.id(), SegmentId::new(0));
    assert_eq!(seg_b.id(), SegmentId::new(0));
    assert!(std::ptr::eq(seg_a.trajectory(), &a));
    assert!(std::ptr::eq(seg_b.trajectory(), &b));
}

#[test]
fn test_map_mismatch_is_rejected() {
    let a = trajectory_a("L1");
    let b = crossing_b("L2");

    assert!(!DetectConflict::broad_phase(&a, &b));
    assert!(!unit_threshold().between(&a, &b).has_conflict());
    assert!(unit_threshold().narrow_phase(&a, &b).is_err());
}

#[test]
fn test_disjoint_time_spans_are_rejected() {
    let a = trajectory_a("L1");
    let b = Trajectory::new(
        vec![wp(11, 0.0, 0.0, 1.0, 0.0), wp(20, 9.0, 0.0, 1.0, 0.0)],
        "L1",
    )
    .unwrap();

    assert!(!DetectConflict::broad_phase(&a, &b));
    assert!(!DetectConflict::broad_phase(&b, &a));
    assert!(!unit_threshold().between(&a, &b).has_conflict());
}

#[test]
fn test_between_is_symmetric() {
    let detector = unit_threshold();
    let a = trajectory_a("L1");
    let pairs = [
        (trajectory_a("L1"), parallel_b("L1")),
        (trajectory_a("L1"), crossing_b("L1")),
        (trajectory_a("L1"), crossing_b("L2")),
        (a.clone(), a),
        (three_knot_a(), late_parked()),
    ];

    for (a, b) in &pairs {
        assert_eq!(
            DetectConflict::broad_phase(a, b),
            DetectConflict::broad_phase(b, a)
        );

        let ab = detector.between(a, b);
        let ba = detector.between(b, a);
        assert_eq!(ab.has_conflict(), ba.has_conflict());

        if let (Ok(ab), Ok(ba)) = (ab.get(), ba.get()) {
            assert_eq!(ab.exact_time(), ba.exact_time());
            let (ab_a, ab_b) = ab.get_segments();
            let (ba_b, ba_a) = ba.get_segments();
            assert_eq!(ab_a, ba_a);
            assert_eq!(ab_b, ba_b);
        }

        // A conflict is only ever reported for pairs passing broad phase.
        if ab.has_conflict() {
            assert!(DetectConflict::broad_phase(a, b));
        }
    }
}

#[test]
fn test_repeated_calls_are_identical() {
    let detector = unit_threshold();
    let a = trajectory_a("L1");
    let b = crossing_b("L1");

    let first = ConflictReport::from(&detector.between(&a, &b));
    for _ in 0..5 {
        assert_eq!(ConflictReport::from(&detector.between(&a, &b)), first);
    }
}

#[test]
fn test_fast_pass_between_whole_time_units_is_detected() {
    // Head-on at a closing speed of 200. The vehicles are within 1 of each
    // other only for t in (5.01, 5.02), so checking whole time units would
    // see no conflict at all.
    let a = Trajectory::new(
        vec![wp(0, 0.0, 0.0, 100.0, 0.0), wp(10, 1000.0, 0.0, 100.0, 0.0)],
        "L1",
    )
    .unwrap();
    let b = Trajectory::new(
        vec![wp(0, 1003.0, 0.0, -100.0, 0.0), wp(10, 3.0, 0.0, -100.0, 0.0)],
        "L1",
    )
    .unwrap();

    for t in 0..=10 {
        let pa = a.evaluate(t).unwrap().position;
        let pb = b.evaluate(t).unwrap().position;
        assert!((pa[0] - pb[0]).abs() >= 1.0);
    }

    let result = unit_threshold().between(&a, &b);
    let data = result.get().unwrap();
    assert!((data.exact_time() - 5.01).abs() < 1e-5, "got {}", data.exact_time());
    assert_eq!(data.get_time(), 5);
}

#[test]
fn test_conflict_on_later_segment() {
    let a = Trajectory::new(
        vec![
            wp(0, 0.0, 0.0, 1.0, 0.0),
            wp(5, 5.0, 0.0, 1.0, 0.0),
            wp(10, 10.0, 0.0, 1.0, 0.0),
        ],
        "L1",
    )
    .unwrap();
    let parked = Trajectory::new(
        vec![wp(0, 8.0, 0.5, 0.0, 0.0), wp(10, 8.0, 0.5, 0.0, 0.0)],
        "L1",
    )
    .unwrap();

    let result = unit_threshold().between(&a, &parked);
    let data = result.get().unwrap();
    // x reaches 8 - sqrt(1 - 0.25)
    let expected = 8.0 - 0.75_f64.sqrt();
    assert!((data.exact_time() - expected).abs() < 1e-5);
    assert_eq!(data.segment_ids(), (SegmentId::new(1), SegmentId::new(0)));

    let (seg_a, _) = data.get_segments();
    assert_eq!(seg_a.start_time(), 5);
    assert_eq!(seg_a.finish_time(), 10);
}

#[test]
fn test_safety_distance_is_configurable() {
    let a = trajectory_a("L1");
    let b = parallel_b("L1");

    let wide = DetectConflict::new(SeparationRules {
        footprint_radius: 2.5,
        clearance: 0.5,
        ..SeparationRules::default()
    });
    assert_eq!(wide.rules().safety_distance(), 5.5);

    let result = wide.between(&a, &b);
    let data = result.get().unwrap();
    assert_eq!(data.exact_time(), 0.0);
    assert_eq!(data.get_time(), 0);

    let narrow = DetectConflict::new(SeparationRules::with_safety_distance(4.9));
    assert!(!narrow.between(&a, &b).has_conflict());
}

#[test]
fn test_time_tolerance_bounds_onset_error() {
    let a = trajectory_a("L1");
    let b = Trajectory::new(
        vec![wp(0, 10.0, 0.0, -1.0, 0.0), wp(10, 0.0, 0.0, -1.0, 0.0)],
        "L1",
    )
    .unwrap();

    for tolerance in [0.5, 1e-3, 1e-9] {
        let detector = DetectConflict::new(SeparationRules {
            time_tolerance: tolerance,
            ..SeparationRules::with_safety_distance(1.0)
        });
        let result = detector.between(&a, &b);
        let onset = result.get().unwrap().exact_time();
        assert!(onset >= 4.5 - 1e-9, "{tolerance}: {onset}");
        assert!(onset - 4.5 <= tolerance + 1e-9, "{tolerance}: {onset}");
    }
}

#[test]
fn test_detection_from_several_threads() {
    let detector = unit_threshold();
    let a = trajectory_a("L1");
    let b = crossing_b("L1");
    let expected = ConflictReport::from(&detector.between(&a, &b));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| ConflictReport::from(&detector.between(&a, &b))))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_swapped_multi_segment_pair_swaps_segments() {
    let detector = unit_threshold();
    let a = three_knot_a();
    let b = late_parked();

    let ab = detector.between(&a, &b);
    let ba = detector.between(&b, &a);
    let (ab, ba) = (ab.get().unwrap(), ba.get().unwrap());

    assert_eq!(ab.exact_time(), ba.exact_time());
    assert_eq!(ab.segment_ids(), (SegmentId::new(1), SegmentId::new(0)));
    assert_eq!(ba.segment_ids(), (SegmentId::new(0), SegmentId::new(1)));
}

#[test]
fn test_full_time_range_is_checked_without_overflow() {
    let parked = Trajectory::new(
        vec![wp(i64::MIN, 0.0, 0.0, 0.0, 0.0), wp(i64::MAX, 0.0, 0.0, 0.0, 0.0)],
        "L1",
    )
    .unwrap();
    let passing = Trajectory::new(
        vec![wp(i64::MIN, -10.0, 0.0, 0.0, 0.0), wp(i64::MAX, 10.0, 0.0, 0.0, 0.0)],
        "L1",
    )
    .unwrap();

    let result = unit_threshold().between(&parked, &passing);
    let data = result.get().unwrap();
    assert!(data.exact_time() < 0.0);
    assert_eq!(data.segment_ids(), (SegmentId::new(0), SegmentId::new(0)));
}

#[test]
fn test_non_finite_velocity_is_rejected_before_detection() {
    let err = Trajectory::new(
        vec![wp(0, 1.0, 1.0, f64::NAN, 0.0), wp(10, 1.0, 1.0, 0.0, 0.0)],
        "L1",
    )
    .unwrap_err();
    assert_eq!(err, traffic_core::TrajectoryError::NonFinite { index: 0 });
}
