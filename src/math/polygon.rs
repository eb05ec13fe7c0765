use super::{Point2d, Vector2d};
use cgmath::prelude::*;
use smallvec::SmallVec;

/// Tolerance used when deciding whether a point lies on a polygon edge.
const EDGE_EPSILON: f64 = 1e-10;

/// A simple polygon in 2D space.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon2d {
    points: SmallVec<[Point2d; 4]>,
}

impl Polygon2d {
    /// Creates a polygon from its vertices, in either winding order.
    pub fn new(points: impl IntoIterator<Item = Point2d>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// The vertices of the polygon.
    pub fn points(&self) -> &[Point2d] {
        &self.points
    }

    /// The unsigned area of the polygon.
    pub fn area(&self) -> f64 {
        let twice_area: f64 = self
            .edges()
            .map(|(a, b)| a.to_vec().perp_dot(b.to_vec()))
            .sum();
        0.5 * twice_area.abs()
    }

    /// Returns true if the point is inside the polygon or on its boundary.
    pub fn contains_point(&self, point: Point2d) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        if self.edges().any(|(a, b)| on_segment(point, a, b)) {
            return true;
        }

        // Ray casting towards +x
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Iterates over the edges of the polygon as pairs of vertices.
    fn edges(&self) -> impl Iterator<Item = (Point2d, Point2d)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

/// Returns true if `p` lies on the segment from `a` to `b`.
fn on_segment(p: Point2d, a: Point2d, b: Point2d) -> bool {
    let ab: Vector2d = b - a;
    let ap: Vector2d = p - a;
    if ab.perp_dot(ap).abs() > EDGE_EPSILON * ab.magnitude().max(1.0) {
        return false;
    }
    let t = ap.dot(ab);
    t >= -EDGE_EPSILON && t <= ab.magnitude2() + EDGE_EPSILON
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn square() -> Polygon2d {
        Polygon2d::new([
            Point2d::new(40.0, -1.0),
            Point2d::new(40.0, 1.0),
            Point2d::new(42.0, 1.0),
            Point2d::new(42.0, -1.0),
        ])
    }

    #[test]
    fn contains_interior_and_boundary() {
        let poly = square();
        assert!(poly.contains_point(Point2d::new(41.0, 0.0)));
        assert!(poly.contains_point(Point2d::new(40.0, 0.5)));
        assert!(poly.contains_point(Point2d::new(42.0, 1.0)));
        assert!(!poly.contains_point(Point2d::new(39.9, 0.0)));
        assert!(!poly.contains_point(Point2d::new(41.0, 1.1)));
    }

    #[test]
    fn area_is_independent_of_winding() {
        let poly = square();
        let reversed = Polygon2d::new(poly.points().iter().rev().copied());
        assert_approx_eq!(poly.area(), 4.0);
        assert_approx_eq!(reversed.area(), 4.0);
    }

    #[test]
    fn degenerate_polygon_contains_nothing() {
        let poly = Polygon2d::new([Point2d::new(0.0, 0.0), Point2d::new(1.0, 0.0)]);
        assert!(!poly.contains_point(Point2d::new(0.5, 0.0)));
    }
}
