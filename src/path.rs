//! Discretized driving paths.

use crate::math::{heading_vector, Point2d};
use cgmath::prelude::*;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A single pose along a [DiscretizedPath].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// The world space position, in m.
    pub pos: Point2d,
    /// The heading, in radians anti-clockwise from the x-axis.
    pub theta: f64,
    /// The signed curvature, in m<sup>-1</sup>.
    pub kappa: f64,
    /// The arc length from the start of the path, in m.
    pub s: f64,
}

impl PathPoint {
    pub fn new(pos: Point2d, theta: f64, kappa: f64, s: f64) -> Self {
        Self {
            pos,
            theta,
            kappa,
            s,
        }
    }
}

/// An ordered sequence of path points with non-decreasing arc length.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscretizedPath {
    points: Vec<PathPoint>,
}

impl DiscretizedPath {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_points(points: Vec<PathPoint>) -> Self {
        Self { points }
    }

    /// Builds a path through the given world space points, deriving the heading,
    /// curvature and arc length of each point from its neighbours.
    pub fn from_xy(xy: &[Point2d]) -> Self {
        let thetas = (0..xy.len())
            .map(|i| {
                let (a, b) = match i {
                    0 => (0, 1),
                    _ => (i - 1, i),
                };
                match (xy.get(a), xy.get(b)) {
                    (Some(a), Some(b)) => (b.y - a.y).atan2(b.x - a.x),
                    _ => 0.0,
                }
            })
            .collect::<Vec<_>>();

        let mut s = 0.0;
        let points = xy
            .iter()
            .enumerate()
            .map(|(i, pos)| {
                if i > 0 {
                    s += pos.distance(xy[i - 1]);
                }
                let kappa = match (thetas.get(i + 1), xy.get(i + 1)) {
                    (Some(next_theta), Some(next)) if next.distance(*pos) > 0.0 => {
                        let turn = heading_vector(thetas[i]).angle(heading_vector(*next_theta));
                        turn.0 / next.distance(*pos)
                    }
                    _ => 0.0,
                };
                PathPoint::new(*pos, thetas[i], kappa, s)
            })
            .collect();

        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathPoint> {
        self.points.iter()
    }

    pub fn first(&self) -> Option<&PathPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PathPoint> {
        self.points.last()
    }

    /// The arc length between the first and last points, in m.
    pub fn length(&self) -> f64 {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => last.s - first.s,
            _ => 0.0,
        }
    }

    /// Whether the arc length never decreases along the path.
    pub fn is_monotonic(&self) -> bool {
        self.points.iter().tuple_windows().all(|(a, b)| b.s >= a.s)
    }
}

impl FromIterator<PathPoint> for DiscretizedPath {
    fn from_iter<I: IntoIterator<Item = PathPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
