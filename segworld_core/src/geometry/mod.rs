// segworld_core/src/geometry/mod.rs

//! Static obstacle geometry and the nearest-intersection query the sensors use.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

mod segment;
mod world;

pub use segment::LineSegment;
pub use world::SegmentWorld;

/// Axis-aligned rectangle in the world frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Bounds {
    pub fn new(min: Point2<f64>, max: Point2<f64>) -> Self {
        Self { min, max }
    }

    /// Grows the rectangle to cover `other`.
    pub fn merge(&self, other: &Bounds) -> Bounds {
        Bounds::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Moves every edge inward by `margin`. Returns `None` if nothing is left.
    pub fn shrink(&self, margin: f64) -> Option<Bounds> {
        let min = Point2::new(self.min.x + margin, self.min.y + margin);
        let max = Point2::new(self.max.x - margin, self.max.y - margin);
        (min.x < max.x && min.y < max.y).then(|| Bounds::new(min, max))
    }
}

// =========================================================================
// == The Geometry Query Contract ==
// =========================================================================

/// The contract for any obstacle set the sensors can cast rays against.
///
/// Implementations must be deterministic: the same query against the same
/// obstacle set always yields the same answer.
pub trait GeometryQuery: Debug + Send + Sync {
    /// Nearest point where the segment `origin -> ray_end` touches an obstacle,
    /// or `None` if it touches nothing.
    fn nearest_intersection(&self, origin: &Point2<f64>, ray_end: &Point2<f64>)
        -> Option<Point2<f64>>;

    /// Extent of the obstacle set, if it has any.
    fn bounds(&self) -> Option<Bounds>;
}
