//! Tests that run the decider over several planning cycles.

use path_reuse::{
    math::{LineSegment2d, Point2d},
    BlockingObstacleState, DiscretizedPath, FrameHistory, HistoryFrame, Obstacle, ObstacleSet,
    PathReuseDecider, PlanningCycle, ReferenceLine, ReuseConfig, ReuseOutcome, SlBoundary,
    VehicleParams, VehicleState,
};

fn reference_line() -> ReferenceLine {
    ReferenceLine::new(&LineSegment2d::from_ends(
        Point2d::new(0.0, 0.0),
        Point2d::new(300.0, 0.0),
    ))
    .unwrap()
}

/// A straight path of 50 points spanning `x` in `[start, start + 100]`, offset by `y`.
fn straight_path(start: f64, y: f64) -> DiscretizedPath {
    let xy = (0..50)
        .map(|i| Point2d::new(start + 100.0 * i as f64 / 49.0, y))
        .collect::<Vec<_>>();
    DiscretizedPath::from_xy(&xy)
}

fn history_of(path: DiscretizedPath, obstacles: &ObstacleSet) -> FrameHistory {
    let mut history = FrameHistory::new();
    history.push(HistoryFrame::new(0, path, obstacles.clone()));
    history
}

/// Runs a single cycle with the vehicle on the x-axis.
fn run(
    decider: &mut PathReuseDecider,
    line: &ReferenceLine,
    params: &VehicleParams,
    history: &FrameHistory,
    obstacles: &ObstacleSet,
    blocking: &BlockingObstacleState,
    x: f64,
) -> ReuseOutcome {
    decider.process(&PlanningCycle {
        reference_frame: Some(line),
        vehicle: VehicleState::new(Point2d::new(x, 0.0), 0.0, 5.0),
        footprint: params,
        obstacles,
        blocking,
        history,
    })
}

/// A clear path is reused and re-anchored at the vehicle.
#[test]
fn clear_path_is_reused_and_trimmed() {
    let line = reference_line();
    let params = VehicleParams::default();
    let obstacles: ObstacleSet =
        [Obstacle::new_static("box", SlBoundary::new(40.0, 42.0, -1.0, 1.0))]
            .into_iter()
            .collect();
    // The path runs 4 m to the left of the obstacle
    let path = straight_path(0.0, 4.0);
    let history = history_of(path.clone(), &obstacles);
    let blocking = BlockingObstacleState {
        front_static_obstacle_id: None,
        cycle_counter: -10,
    };

    let mut decider = PathReuseDecider::new(ReuseConfig::default());
    let first = run(&mut decider, &line, &params, &history, &obstacles, &blocking, 20.0);
    assert_eq!(first, ReuseOutcome::FullPlanning);

    let second = run(&mut decider, &line, &params, &history, &obstacles, &blocking, 20.0);
    let ReuseOutcome::Reuse(trimmed) = second else {
        panic!("expected the clear path to be reused");
    };
    let passed = path.iter().filter(|p| p.s < 20.0).count();
    assert_eq!(trimmed.len(), 50 - passed + 1);
    assert!(decider.state().reused_path);
}

/// An obstacle under a corner of the vehicle rejects the path and closes the gate.
#[test]
fn blocked_path_closes_the_gate() {
    let line = reference_line();
    let params = VehicleParams {
        length: 4.0,
        width: 2.0,
        back_edge_to_center: 1.0,
    };
    let clear = ObstacleSet::new();
    let blocked: ObstacleSet =
        [Obstacle::new_static("box", SlBoundary::new(40.0, 42.0, -1.0, 1.0))]
            .into_iter()
            .collect();
    let history = history_of(straight_path(0.0, 0.0), &clear);
    let blocking = BlockingObstacleState {
        front_static_obstacle_id: None,
        cycle_counter: -10,
    };

    let mut decider = PathReuseDecider::new(ReuseConfig::default());
    run(&mut decider, &line, &params, &history, &clear, &blocking, 20.0);
    assert!(decider.state().reused_path);

    let outcome = run(&mut decider, &line, &params, &history, &blocked, &blocking, 20.0);
    assert_eq!(outcome, ReuseOutcome::FullPlanning);
    assert!(!decider.state().reused_path);
}

/// Once an obstacle stops blocking the road, reuse only resumes after several clear cycles.
#[test]
fn reuse_resumes_after_clear_cycles() {
    let line = reference_line();
    let params = VehicleParams::default();
    let wall: ObstacleSet = [
        Obstacle::new_static("wall", SlBoundary::new(30.0, 31.0, -2.0, 2.0)).lane_blocking(true),
    ]
    .into_iter()
    .collect();
    let clear = ObstacleSet::new();
    let history = history_of(straight_path(0.0, 0.0), &clear);
    let mut blocking = BlockingObstacleState::default();
    let mut decider = PathReuseDecider::new(ReuseConfig::default());

    // The wall is 10 m ahead, too close to be ignored
    for _ in 0..5 {
        blocking.record_cycle(Some("wall".into()));
        let outcome = run(&mut decider, &line, &params, &history, &wall, &blocking, 20.0);
        assert_eq!(outcome, ReuseOutcome::FullPlanning);
        assert!(!decider.state().reused_path);
    }

    // The wall is removed
    let mut enabled_after = None;
    for cycle in 1..=5 {
        blocking.record_cycle(None);
        run(&mut decider, &line, &params, &history, &clear, &blocking, 20.0);
        if decider.state().reused_path {
            enabled_after = Some(cycle);
            break;
        }
    }
    assert_eq!(enabled_after, Some(3));

    let outcome = run(&mut decider, &line, &params, &history, &clear, &blocking, 20.0);
    assert!(outcome.is_reuse());
    assert_eq!(decider.reusable_path_count(), 1);
    assert_eq!(decider.total_path_count(), 9);
}

/// A distant blocking obstacle does not hold the gate shut.
#[test]
fn distant_blocking_obstacle_is_ignored() {
    let line = reference_line();
    let params = VehicleParams::default();
    let wall: ObstacleSet = [
        Obstacle::new_static("wall", SlBoundary::new(150.0, 151.0, -2.0, 2.0)).lane_blocking(true),
    ]
    .into_iter()
    .collect();
    let history = history_of(straight_path(0.0, 0.0), &wall);
    let mut blocking = BlockingObstacleState::default();
    blocking.record_cycle(Some("wall".into()));

    let mut decider = PathReuseDecider::new(ReuseConfig::default());
    run(&mut decider, &line, &params, &history, &wall, &blocking, 20.0);
    assert!(decider.state().reused_path);
}

/// Two sessions in the same process keep separate gate states and counters.
#[test]
fn sessions_are_independent() {
    let line = reference_line();
    let params = VehicleParams::default();
    let clear = ObstacleSet::new();
    let history = history_of(straight_path(0.0, 0.0), &clear);
    let open = BlockingObstacleState {
        front_static_obstacle_id: None,
        cycle_counter: -10,
    };
    let shut = BlockingObstacleState {
        front_static_obstacle_id: None,
        cycle_counter: 3,
    };

    let mut a = PathReuseDecider::new(ReuseConfig::default());
    let mut b = PathReuseDecider::new(ReuseConfig::default());
    for _ in 0..4 {
        run(&mut a, &line, &params, &history, &clear, &open, 20.0);
        run(&mut b, &line, &params, &history, &clear, &shut, 20.0);
    }
    assert!(a.state().reused_path);
    assert!(!b.state().reused_path);
    assert_eq!(a.reusable_path_count(), 3);
    assert_eq!(b.reusable_path_count(), 0);
    assert_eq!(a.total_path_count(), b.total_path_count());
}

/// A cycle without history is never reused, even with the gate open.
#[test]
fn missing_history_is_not_reused() {
    let line = reference_line();
    let params = VehicleParams::default();
    let obstacles: ObstacleSet =
        [Obstacle::new_static("box", SlBoundary::new(40.0, 42.0, 5.0, 6.0))]
            .into_iter()
            .collect();
    let history = FrameHistory::new();
    let blocking = BlockingObstacleState {
        front_static_obstacle_id: None,
        cycle_counter: -10,
    };

    let mut decider = PathReuseDecider::new(ReuseConfig::default());
    for _ in 0..3 {
        let outcome = run(&mut decider, &line, &params, &history, &obstacles, &blocking, 20.0);
        assert_eq!(outcome, ReuseOutcome::FullPlanning);
    }
    assert_eq!(decider.reusable_path_count(), 0);
}
