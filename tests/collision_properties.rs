//! Randomised properties of the collision checker and path trimmer.

use path_reuse::{
    math::{LineSegment2d, Point2d, QuadraticBezier2d},
    trim_history_path, CollisionChecker, DiscretizedPath, Footprint, Obstacle, ObstacleSet,
    ReferenceFrame, ReferenceLine, ReuseConfig, SlBoundary, SlPoint, VehicleParams,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn rng() -> StdRng {
    StdRng::from_seed(*b"Vegemite sandwhich is not fun...")
}

fn random_path(rng: &mut StdRng) -> DiscretizedPath {
    let y = rng.gen_range(-3.0..3.0);
    let slope = rng.gen_range(-0.02..0.02);
    let xy = (0..60)
        .map(|i| {
            let x = 2.0 * i as f64;
            Point2d::new(x, y + slope * x)
        })
        .collect::<Vec<_>>();
    DiscretizedPath::from_xy(&xy)
}

fn random_obstacles(rng: &mut StdRng) -> ObstacleSet {
    (0..rng.gen_range(0..6))
        .map(|i| {
            let s = rng.gen_range(0.0..130.0);
            let l = rng.gen_range(-6.0..6.0);
            let len = rng.gen_range(0.5..3.0);
            let wid = rng.gen_range(0.5..3.0);
            let mut obstacle =
                Obstacle::new_static(format!("obs{i}"), SlBoundary::new(s, s + len, l, l + wid));
            obstacle.is_static = rng.gen_bool(0.8);
            obstacle
        })
        .collect()
}

/// Tests every relevant point of the path without stopping at the first collision.
fn collides_anywhere(
    config: &ReuseConfig,
    frame: &dyn ReferenceFrame,
    params: &VehicleParams,
    path: &DiscretizedPath,
    obstacles: &ObstacleSet,
    adc: Point2d,
) -> bool {
    let checker = CollisionChecker::new(config, frame, params);
    let adc_s = frame.xy_to_sl(adc).unwrap().s;
    let polygons = checker.obstacle_polygons(obstacles, adc_s);
    if polygons.is_empty() {
        return false;
    }
    let end_s = frame.xy_to_sl(path.last().unwrap().pos).unwrap().s;
    let mut hits = 0;
    for point in path.iter() {
        let s = frame.xy_to_sl(point.pos).unwrap().s;
        if end_s - s < config.tail_reserve() || s < adc_s - config.s_buffer {
            continue;
        }
        for corner in params.corners(point) {
            let corner = frame.xy_to_sl(corner).unwrap().as_plane_point();
            hits += polygons.iter().filter(|p| p.contains_point(corner)).count();
        }
    }
    hits > 0
}

/// Stopping at the first collision gives the same answer as testing every point.
#[test]
fn early_exit_matches_exhaustive_scan() {
    let config = ReuseConfig::default();
    let line = ReferenceLine::new(&LineSegment2d::from_ends(
        Point2d::new(-20.0, 0.0),
        Point2d::new(250.0, 0.0),
    ))
    .unwrap();
    let params = VehicleParams::default();
    let checker = CollisionChecker::new(&config, &line, &params);
    let mut rng = rng();
    let mut collisions = 0;

    for _ in 0..200 {
        let path = random_path(&mut rng);
        let obstacles = random_obstacles(&mut rng);
        let adc = Point2d::new(rng.gen_range(0.0..60.0), 0.0);

        let expected = !collides_anywhere(&config, &line, &params, &path, &obstacles, adc);
        let actual = checker.is_collision_free(Some(&path), &obstacles, adc);
        assert_eq!(actual, expected);
        // Checking again changes nothing
        assert_eq!(checker.is_collision_free(Some(&path), &obstacles, adc), actual);
        if !actual {
            collisions += 1;
        }
    }
    assert!(collisions > 0);
}

/// Trimming keeps the untraversed points and measures them from the last traversed point.
#[test]
fn trimmed_paths_are_rebased() {
    let curve = QuadraticBezier2d::new(&[
        Point2d::new(0.0, 0.0),
        Point2d::new(100.0, 0.0),
        Point2d::new(150.0, 60.0),
    ]);
    let line = ReferenceLine::new(&curve).unwrap();
    let xy = (0..=40)
        .map(|i| line.sl_to_xy(SlPoint::new(3.0 * i as f64, 0.5)).unwrap())
        .collect::<Vec<_>>();
    let path = DiscretizedPath::from_xy(&xy);
    let mut rng = rng();

    for _ in 0..50 {
        let adc = line
            .sl_to_xy(SlPoint::new(rng.gen_range(1.0..115.0), 0.0))
            .unwrap();
        let adc_s = line.xy_to_sl(adc).unwrap().s;
        let trimmed = trim_history_path(&path, &line, adc).unwrap();

        let passed = path
            .iter()
            .filter(|p| line.xy_to_sl(p.pos).unwrap().s < adc_s)
            .count();
        assert!(passed > 0);
        assert_eq!(trimmed.len(), path.len() - passed + 1);

        let base = path.points()[passed - 1].s;
        assert_eq!(trimmed.points()[0], path.points()[passed]);
        for (t, p) in trimmed.points()[1..].iter().zip(&path.points()[passed..]) {
            assert!((t.s - (p.s - base)).abs() < 1e-9);
            assert!(t.s >= 0.0);
        }
    }
}
