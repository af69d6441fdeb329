// segworld_core/src/geometry/world.rs

use nalgebra::Point2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Uniform};
use std::collections::HashMap;
use std::f64::consts::PI;
use tracing::{debug, info};

use super::{Bounds, GeometryQuery, LineSegment};
use crate::config::WorldOptions;

/// Edge length of one grid cell, in world units.
const DEFAULT_CELL_SIZE: f64 = 5.0;

/// Rejection-sampling budget per obstacle when it lands inside the start clearing.
const MAX_PLACEMENT_ATTEMPTS: usize = 100;

// =========================================================================
// == Uniform Grid Index ==
// =========================================================================

type Cell = (i64, i64);

/// Buckets segment ids by every grid cell their bounding box overlaps.
#[derive(Debug, Clone)]
struct GridIndex {
    cell_size: f64,
    cells: HashMap<Cell, Vec<usize>>,
}

impl GridIndex {
    fn build(segments: &[LineSegment], cell_size: f64) -> Self {
        let mut cells: HashMap<Cell, Vec<usize>> = HashMap::new();
        for (id, seg) in segments.iter().enumerate() {
            let (min, max) = seg.bounds();
            for cell in Self::cells_covering(cell_size, &min, &max) {
                cells.entry(cell).or_default().push(id);
            }
        }
        Self { cell_size, cells }
    }

    fn cells_covering(
        cell_size: f64,
        min: &Point2<f64>,
        max: &Point2<f64>,
    ) -> impl Iterator<Item = Cell> {
        let to_cell = move |v: f64| (v / cell_size).floor() as i64;
        let (x0, x1) = (to_cell(min.x), to_cell(max.x));
        let (y0, y1) = (to_cell(min.y), to_cell(max.y));
        (x0..=x1).flat_map(move |x| (y0..=y1).map(move |y| (x, y)))
    }

    /// Sorted, de-duplicated ids of every segment that may touch the box.
    fn candidates(&self, min: &Point2<f64>, max: &Point2<f64>) -> Vec<usize> {
        let mut ids: Vec<usize> = Self::cells_covering(self.cell_size, min, max)
            .filter_map(|cell| self.cells.get(&cell))
            .flatten()
            .copied()
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

// =========================================================================
// == Segment World ==
// =========================================================================

/// A static set of obstacle segments with a grid index for ray queries.
#[derive(Debug, Clone)]
pub struct SegmentWorld {
    segments: Vec<LineSegment>,
    bounds: Option<Bounds>,
    index: GridIndex,
}

impl SegmentWorld {
    pub fn new(segments: Vec<LineSegment>) -> Self {
        Self::with_cell_size(segments, DEFAULT_CELL_SIZE)
    }

    pub fn with_cell_size(segments: Vec<LineSegment>, cell_size: f64) -> Self {
        let bounds = segments
            .iter()
            .map(|s| {
                let (min, max) = s.bounds();
                Bounds::new(min, max)
            })
            .reduce(|a, b| a.merge(&b));
        let index = GridIndex::build(&segments, cell_size);
        Self {
            segments,
            bounds,
            index,
        }
    }

    /// A world with nothing in it; every ray reads clear.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    /// Joins consecutive points into an open chain of segments, e.g. to rebuild
    /// a world from the hit locations of one scan.
    pub fn from_polyline(points: &[Point2<f64>]) -> Self {
        let segments = points
            .windows(2)
            .map(|w| LineSegment::new(w[0], w[1]))
            .filter(|s| s.length() > 0.0)
            .collect();
        Self::new(segments)
    }

    /// Builds the square test arena: a boundary wall plus randomly placed,
    /// randomly oriented obstacle segments, with a clearing around the origin.
    pub fn build_test_world(options: &WorldOptions) -> Self {
        let half = 50.0 * options.scale;
        let corners = [
            Point2::new(-half, -half),
            Point2::new(half, -half),
            Point2::new(half, half),
            Point2::new(-half, half),
        ];
        let mut segments: Vec<LineSegment> = (0..4)
            .map(|i| LineSegment::new(corners[i], corners[(i + 1) % 4]))
            .collect();

        let mut rng = if options.non_random_world {
            ChaCha8Rng::seed_from_u64(options.random_seed)
        } else {
            ChaCha8Rng::from_entropy()
        };

        let area = (2.0 * half) * (2.0 * half);
        let num_obstacles = (options.percent_obs_density / 100.0 * area / 100.0).round() as usize;
        let inner = options.obstacles_inner_fraction * half;
        let clearing = 3.0 * options.circle_radius;

        if inner > 0.0 {
            let position = Uniform::new_inclusive(-inner, inner);
            let orientation = Uniform::new(0.0, PI);

            for _ in 0..num_obstacles {
                let center = (0..MAX_PLACEMENT_ATTEMPTS)
                    .map(|_| Point2::new(position.sample(&mut rng), position.sample(&mut rng)))
                    .find(|c| c.coords.norm() >= clearing);
                let Some(center) = center else {
                    debug!("No room left outside the start clearing; skipping obstacle.");
                    continue;
                };
                let theta = orientation.sample(&mut rng);
                let offset =
                    nalgebra::Vector2::new(theta.cos(), theta.sin()) * options.circle_radius;
                segments.push(LineSegment::new(center - offset, center + offset));
            }
        }

        info!(
            "Built test world: half-extent {:.1}, {} obstacle segments",
            half,
            segments.len() - 4
        );
        Self::new(segments)
    }
}

impl GeometryQuery for SegmentWorld {
    fn nearest_intersection(
        &self,
        origin: &Point2<f64>,
        ray_end: &Point2<f64>,
    ) -> Option<Point2<f64>> {
        let min = origin.inf(ray_end);
        let max = origin.sup(ray_end);

        self.index
            .candidates(&min, &max)
            .into_iter()
            .filter_map(|id| self.segments[id].intersect_ray(origin, ray_end))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, point)| point)
    }

    fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn two_walls() -> SegmentWorld {
        SegmentWorld::new(vec![
            LineSegment::new(Point2::new(8.0, -2.0), Point2::new(8.0, 2.0)),
            LineSegment::new(Point2::new(3.0, -2.0), Point2::new(3.0, 2.0)),
        ])
    }

    #[test]
    fn nearest_of_several_hits_wins() {
        let hit = two_walls()
            .nearest_intersection(&Point2::origin(), &Point2::new(20.0, 0.0))
            .expect("both walls are in range");
        assert_abs_diff_eq!(hit.x, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_world_never_hits() {
        let world = SegmentWorld::empty();
        assert!(world
            .nearest_intersection(&Point2::origin(), &Point2::new(20.0, 0.0))
            .is_none());
        assert!(world.bounds().is_none());
    }

    #[test]
    fn grid_index_finds_segments_in_far_cells() {
        // Tiny cells force the ray across many buckets.
        let world = SegmentWorld::with_cell_size(
            vec![LineSegment::new(Point2::new(-9.5, 7.0), Point2::new(-9.5, 9.0))],
            0.5,
        );
        let hit = world
            .nearest_intersection(&Point2::origin(), &Point2::new(-19.0, 16.0))
            .expect("ray passes through the segment");
        assert_abs_diff_eq!(hit.x, -9.5, epsilon = 1e-9);
        assert_abs_diff_eq!(hit.y, 8.0, epsilon = 1e-9);
    }

    #[test]
    fn polyline_links_consecutive_points() {
        let world = SegmentWorld::from_polyline(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
        ]);
        // The zero-length link is dropped.
        assert_eq!(world.segments().len(), 2);
    }

    #[test]
    fn seeded_test_world_is_reproducible_and_keeps_origin_clear() {
        let options = WorldOptions {
            percent_obs_density: 20.0,
            non_random_world: true,
            ..WorldOptions::default()
        };
        let a = SegmentWorld::build_test_world(&options);
        let b = SegmentWorld::build_test_world(&options);
        assert_eq!(a.segments(), b.segments());
        assert_eq!(a.segments().len(), 4 + 20);

        let bounds = a.bounds().expect("boundary walls exist");
        assert_abs_diff_eq!(bounds.max.x, 50.0 * options.scale, epsilon = 1e-12);

        for seg in &a.segments()[4..] {
            let mid = nalgebra::center(&seg.start, &seg.end);
            assert!(mid.coords.norm() >= 3.0 * options.circle_radius - 1e-9);
        }
    }
}
