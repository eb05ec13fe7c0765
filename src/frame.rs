//! Conversion between world space and the curvilinear frame of a reference line.

use crate::math::{Point2d, Polygon2d};
use crate::util::Interval;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use reference_line::ReferenceLine;

mod reference_line;

/// A position relative to a reference line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SlPoint {
    /// The arc length along the reference line, in m.
    pub s: f64,
    /// The lateral offset from the reference line, positive to the left, in m.
    pub l: f64,
}

impl SlPoint {
    pub const fn new(s: f64, l: f64) -> Self {
        Self { s, l }
    }

    /// The point as `(s, l)` coordinates of a plane, for polygon tests.
    pub fn as_plane_point(&self) -> Point2d {
        Point2d::new(self.s, self.l)
    }
}

/// An axis-aligned box in the curvilinear frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SlBoundary {
    pub start_s: f64,
    pub end_s: f64,
    pub start_l: f64,
    pub end_l: f64,
}

impl SlBoundary {
    pub const fn new(start_s: f64, end_s: f64, start_l: f64, end_l: f64) -> Self {
        Self {
            start_s,
            end_s,
            start_l,
            end_l,
        }
    }

    /// The longitudinal extents of the box.
    pub fn s_range(&self) -> Interval<f64> {
        Interval::new(self.start_s, self.end_s)
    }

    /// The lateral extents of the box.
    pub fn l_range(&self) -> Interval<f64> {
        Interval::new(self.start_l, self.end_l)
    }

    /// The area of the box, in m<sup>2</sup>.
    pub fn area(&self) -> f64 {
        self.s_range().length() * self.l_range().length()
    }

    /// The box as a quadrilateral in the `(s, l)` plane.
    pub fn to_polygon(&self) -> Polygon2d {
        Polygon2d::new([
            Point2d::new(self.start_s, self.start_l),
            Point2d::new(self.start_s, self.end_l),
            Point2d::new(self.end_s, self.end_l),
            Point2d::new(self.end_s, self.start_l),
        ])
    }
}

/// The reason a point could not be converted between frames.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ProjectionError {
    /// The point projects beyond either end of the reference line.
    #[error("s = {s:.3} lies outside the reference line [{min:.3}, {max:.3}]")]
    OutOfDomain { s: f64, min: f64, max: f64 },
    /// The projection onto the reference line did not converge.
    #[error("projection of ({x:.3}, {y:.3}) did not converge")]
    NotConverged { x: f64, y: f64 },
    /// The reference line is too short to define a frame.
    #[error("reference line of length {length:.3} is degenerate")]
    DegenerateReferenceLine { length: f64 },
    /// The reference line cannot be sampled with the requested spacing.
    #[error("reference line step of {step} m must be finite and positive")]
    InvalidStep { step: f64 },
}

/// Converts points between world space and a curvilinear frame.
pub trait ReferenceFrame {
    /// Converts a world space point into the curvilinear frame.
    fn xy_to_sl(&self, point: Point2d) -> Result<SlPoint, ProjectionError>;

    /// Converts a curvilinear point into world space.
    fn sl_to_xy(&self, point: SlPoint) -> Result<Point2d, ProjectionError>;
}

impl<T: ReferenceFrame + ?Sized> ReferenceFrame for &T {
    fn xy_to_sl(&self, point: Point2d) -> Result<SlPoint, ProjectionError> {
        (**self).xy_to_sl(point)
    }

    fn sl_to_xy(&self, point: SlPoint) -> Result<Point2d, ProjectionError> {
        (**self).sl_to_xy(point)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn boundary_polygon_matches_box() {
        let boundary = SlBoundary::new(40.0, 42.0, -1.0, 1.0);
        let poly = boundary.to_polygon();
        assert_approx_eq!(boundary.area(), 4.0);
        assert_approx_eq!(poly.area(), boundary.area());
        assert!(poly.contains_point(SlPoint::new(41.0, 0.0).as_plane_point()));
        assert!(!poly.contains_point(SlPoint::new(43.0, 0.0).as_plane_point()));
    }

    #[test]
    fn inverted_boundary_has_negative_area() {
        let boundary = SlBoundary::new(42.0, 40.0, -1.0, 1.0);
        assert!(boundary.area() < 0.0);
    }
}
