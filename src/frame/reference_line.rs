use super::{ProjectionError, ReferenceFrame, SlPoint};
use crate::math::{
    equidistant_points_along_curve, normalize_with_derivative, project_local,
    project_point_onto_curve, rot90, ParametricCurve2d, Point2d, QuadraticBezier2d, Vector2d,
};
use crate::util::Interval;
use cgmath::prelude::*;
use serde::{Deserialize, Serialize};

/// The default spacing between the sample points of a reference line, in m.
const REFERENCE_SEGMENT_LEN: f64 = 0.5;

/// The accepted projection error, in m.
const PROJECTION_TOLERANCE: f64 = 0.001;

/// The number of golden section iterations used when Newton's method fails near a knot.
const SECTION_SEARCH_ITERS: usize = 60;

/// Slack allowed when checking whether an `s` value lies on the reference line, in m.
const DOMAIN_SLACK: f64 = 1e-6;

/// An arc length parameterised centre line which defines a curvilinear frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReferenceLine {
    scale: f64,
    length: f64,
    segments: Vec<QuadraticBezier2d>,
}

/// The result of sampling a [ReferenceLine].
#[derive(Clone, Copy, Debug)]
pub struct ReferenceSample {
    /// The point on the centre line.
    pub pos: Point2d,
    /// The tangent unit vector of the centre line.
    pub tan: Vector2d,
    /// The signed curvature of the centre line, positive when turning left.
    pub kappa: f64,
}

impl ReferenceLine {
    /// Creates a new [ReferenceLine] from the given parametric curve,
    /// with the default step size.
    pub fn new(curve: &impl ParametricCurve2d) -> Result<Self, ProjectionError> {
        Self::with_step(curve, REFERENCE_SEGMENT_LEN)
    }

    /// Creates a new [ReferenceLine] from the given parametric curve,
    /// with the given step size.
    pub fn with_step(curve: &impl ParametricCurve2d, step: f64) -> Result<Self, ProjectionError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(ProjectionError::InvalidStep { step });
        }
        let (mut points, length) = equidistant_points_along_curve(curve, step);
        if points.len() < 2 || length <= 0.0 {
            return Err(ProjectionError::DegenerateReferenceLine { length });
        }

        // Ensure number of points are odd so they can be evenly divided among segments
        if points.len() % 2 == 0 {
            let p1 = points[points.len() - 2];
            let p2 = points[points.len() - 1];
            let p3 = Point2d::from_vec(Vector2d::lerp(p1.to_vec(), p2.to_vec(), 2.0));
            points.push(p3);
        }

        let segments = points
            .windows(3)
            .step_by(2)
            .map(|points| {
                let (p1, p2, p3) = (points[0], points[1], points[2]);
                let mid = Vector2d::lerp(p1.to_vec(), p3.to_vec(), 0.5);
                let control = Point2d::from_vec(Vector2d::lerp(p2.to_vec(), mid, -1.0));
                QuadraticBezier2d::new(&[p1, control, p3])
            })
            .collect::<Vec<_>>();

        Ok(Self {
            scale: 0.5 / step,
            length,
            segments,
        })
    }

    /// The length of the reference line in m.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Samples the centre line at the given arc length.
    pub fn sample_centre(&self, s: f64) -> ReferenceSample {
        let (segment, t) = self.sample_internal(s);
        let c_dp = segment.sample_dt(t) * self.scale;
        let c_dp2 = segment.sample_dt2(t) * self.scale.powi(2);
        let (tan, tan_dp) = normalize_with_derivative(c_dp, c_dp2);
        let kappa = tan.perp_dot(tan_dp) / c_dp.magnitude();
        ReferenceSample {
            pos: segment.sample(t),
            tan,
            kappa,
        }
    }

    /// Checks that `s` lies on the reference line.
    fn check_domain(&self, s: f64) -> Result<(), ProjectionError> {
        let domain = Interval::new(-DOMAIN_SLACK, self.length + DOMAIN_SLACK);
        if domain.contains(s) {
            Ok(())
        } else {
            Err(ProjectionError::OutOfDomain {
                s,
                min: 0.0,
                max: self.length,
            })
        }
    }

    /// Finds the sample point of the centre line nearest to `point`, spaced half a segment apart.
    ///
    /// Returns its arc length and squared distance.
    fn nearest_knot(&self, point: Point2d) -> Option<(f64, f64)> {
        self.segments
            .iter()
            .enumerate()
            .flat_map(|(idx, segment)| {
                [0.0, 0.5].map(|t| ((idx as f64 + t) / self.scale, segment.sample(t)))
            })
            .chain(std::iter::once((self.length, self.sample(self.length))))
            .map(|(s, pos)| (s, (point - pos).magnitude2()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Minimises the distance to `point` within one segment length either side of `s0`.
    fn golden_section_search(&self, point: Point2d, s0: f64) -> f64 {
        const INV_PHI: f64 = 0.618_033_988_749_895;
        let span = 1.0 / self.scale;
        let dist = |s: f64| (point - self.sample(s)).magnitude2();
        let mut range = Interval::new((s0 - span).max(0.0), (s0 + span).min(self.length));
        let mut a = range.lerp(1.0 - INV_PHI);
        let mut b = range.lerp(INV_PHI);
        let (mut da, mut db) = (dist(a), dist(b));
        for _ in 0..SECTION_SEARCH_ITERS {
            if da < db {
                range.max = b;
                (b, db) = (a, da);
                a = range.lerp(1.0 - INV_PHI);
                da = dist(a);
            } else {
                range.min = a;
                (a, da) = (b, db);
                b = range.lerp(INV_PHI);
                db = dist(b);
            }
        }
        0.5 * (range.min + range.max)
    }

    /// Finds the arc length of the point on the centre line nearest to `point`.
    ///
    /// Newton's method is seeded from the nearest knot, and its answer is only accepted if it
    /// is no further away than that knot.
    fn project(&self, point: Point2d) -> Result<f64, ProjectionError> {
        let not_converged = ProjectionError::NotConverged {
            x: point.x,
            y: point.y,
        };
        let (s0, knot_dist2) = self.nearest_knot(point).ok_or(not_converged.clone())?;
        let accept = |s: &f64| {
            let dist = (point - self.sample(*s)).magnitude();
            dist <= knot_dist2.sqrt() + PROJECTION_TOLERANCE
        };
        let s = project_point_onto_curve(self, point, PROJECTION_TOLERANCE, Some(s0))
            .filter(|s| accept(s))
            .unwrap_or_else(|| self.golden_section_search(point, s0));
        if accept(&s) {
            Ok(s)
        } else {
            Err(not_converged)
        }
    }

    /// Finds the segment containing the arc length `s`, and the segment's local parameter.
    fn sample_internal(&self, s: f64) -> (&QuadraticBezier2d, f64) {
        let pos = s * self.scale;
        let idx = usize::min(pos.max(0.0) as usize, self.segments.len() - 1);
        (&self.segments[idx], pos - idx as f64)
    }
}

impl ReferenceFrame for ReferenceLine {
    fn xy_to_sl(&self, point: Point2d) -> Result<SlPoint, ProjectionError> {
        let s = self.project(point)?;
        self.check_domain(s)?;
        let sample = self.sample_centre(s);
        let local = project_local(point, sample.pos, sample.tan, rot90(sample.tan));
        Ok(SlPoint::new(s + local.x, local.y))
    }

    fn sl_to_xy(&self, point: SlPoint) -> Result<Point2d, ProjectionError> {
        self.check_domain(point.s)?;
        let sample = self.sample_centre(point.s);
        Ok(sample.pos + rot90(sample.tan) * point.l)
    }
}

impl ParametricCurve2d for ReferenceLine {
    fn sample(&self, t: f64) -> Point2d {
        let (segment, t) = self.sample_internal(t);
        segment.sample(t)
    }

    fn bounds(&self) -> Interval<f64> {
        Interval::new(0.0, self.length)
    }

    fn sample_dt(&self, t: f64) -> Vector2d {
        let (segment, t) = self.sample_internal(t);
        segment.sample_dt(t) * self.scale
    }

    fn sample_dt2(&self, t: f64) -> Vector2d {
        let (segment, t) = self.sample_internal(t);
        segment.sample_dt2(t) * self.scale.powi(2)
    }
}
