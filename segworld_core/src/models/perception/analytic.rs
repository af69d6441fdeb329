// segworld_core/src/models/perception/analytic.rs

use nalgebra::Point2;

use super::{RangeSensor, RayFan};
use crate::geometry::LineSegment;

/// Range sensor that intersects each ray directly against a known list of
/// segments, with no spatial index.
///
/// Kept as an independent second path for cross-checking the locator-based
/// sensor; both must produce the same readings.
#[derive(Debug, Clone)]
pub struct AnalyticSensor {
    segments: Vec<LineSegment>,
    rays: RayFan,
    ray_length: f64,
}

impl AnalyticSensor {
    pub fn new(segments: Vec<LineSegment>, rays: RayFan, ray_length: f64) -> Self {
        Self {
            segments,
            rays,
            ray_length,
        }
    }

    /// Replaces the segment set, e.g. with the chain through one scan's hit points.
    pub fn set_line_segment_world(&mut self, segments: Vec<LineSegment>) {
        self.segments = segments;
    }
}

impl RangeSensor for AnalyticSensor {
    fn ray_fan(&self) -> &RayFan {
        &self.rays
    }

    fn ray_length(&self) -> f64 {
        self.ray_length
    }

    fn cast_ray(&self, origin: &Point2<f64>, ray_end: &Point2<f64>) -> Option<Point2<f64>> {
        let mut nearest: Option<(f64, Point2<f64>)> = None;
        for seg in &self.segments {
            if let Some((t, p)) = seg.intersect_ray(origin, ray_end) {
                if nearest.map_or(true, |(best, _)| t < best) {
                    nearest = Some((t, p));
                }
            }
        }
        nearest.map(|(_, p)| p)
    }
}
