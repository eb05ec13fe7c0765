use super::curve::ParametricCurve2d;
use super::{Point2d, Vector2d};
use crate::util::Interval;
use cgmath::prelude::*;

/// A straight line segment, parameterised by arc length.
#[derive(Copy, Clone, Debug)]
pub struct LineSegment2d {
    start: Point2d,
    end: Point2d,
    length: f64,
}

impl LineSegment2d {
    pub fn from_ends(start: Point2d, end: Point2d) -> Self {
        Self {
            start,
            end,
            length: start.distance(end),
        }
    }

    /// The length of the segment in m.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The unit vector pointing from the start to the end of the segment.
    pub fn direction(&self) -> Vector2d {
        if self.length > 0.0 {
            (self.end - self.start) / self.length
        } else {
            Vector2d::new(1.0, 0.0)
        }
    }
}

impl ParametricCurve2d for LineSegment2d {
    fn sample(&self, t: f64) -> Point2d {
        self.start + self.direction() * t
    }

    fn bounds(&self) -> Interval<f64> {
        Interval::new(0.0, self.length)
    }

    fn sample_dt(&self, _t: f64) -> Vector2d {
        self.direction()
    }

    fn sample_dt2(&self, _t: f64) -> Vector2d {
        Vector2d::zero()
    }
}
