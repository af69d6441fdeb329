// segworld_core/src/geometry/segment.rs

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Below this the ray and segment are treated as parallel.
const PARALLEL_EPS: f64 = 1e-12;

/// A static obstacle edge in the world frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl LineSegment {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> (Point2<f64>, Point2<f64>) {
        (self.start.inf(&self.end), self.start.sup(&self.end))
    }

    /// Intersects the segment `origin -> ray_end` with this segment.
    ///
    /// Returns the fraction `t` in `[0, 1]` along the ray together with the hit
    /// point. Parallel and collinear configurations report no hit.
    pub fn intersect_ray(
        &self,
        origin: &Point2<f64>,
        ray_end: &Point2<f64>,
    ) -> Option<(f64, Point2<f64>)> {
        let r = ray_end - origin;
        let s = self.end - self.start;
        let denom = cross(&r, &s);
        if denom.abs() < PARALLEL_EPS {
            return None;
        }

        let qp = self.start - origin;
        let t = cross(&qp, &s) / denom;
        let u = cross(&qp, &r) / denom;

        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some((t, origin + r * t))
        } else {
            None
        }
    }
}

/// z-component of the 3-D cross product of two planar vectors.
fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn perpendicular_crossing_reports_fraction_and_point() {
        let wall = LineSegment::new(Point2::new(5.0, -1.0), Point2::new(5.0, 1.0));
        let (t, p) = wall
            .intersect_ray(&Point2::origin(), &Point2::new(10.0, 0.0))
            .expect("ray crosses the wall");
        assert_abs_diff_eq!(t, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(p.x, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn ray_stopping_short_misses() {
        let wall = LineSegment::new(Point2::new(5.0, -1.0), Point2::new(5.0, 1.0));
        assert!(wall
            .intersect_ray(&Point2::origin(), &Point2::new(4.0, 0.0))
            .is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let wall = LineSegment::new(Point2::new(0.0, 1.0), Point2::new(10.0, 1.0));
        assert!(wall
            .intersect_ray(&Point2::origin(), &Point2::new(10.0, 0.0))
            .is_none());
    }

    #[test]
    fn ray_passing_beside_the_segment_end_misses() {
        let wall = LineSegment::new(Point2::new(5.0, 1.0), Point2::new(5.0, 3.0));
        assert!(wall
            .intersect_ray(&Point2::origin(), &Point2::new(10.0, 0.0))
            .is_none());
    }
}
