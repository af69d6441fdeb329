// segworld_core/src/models/perception/mod.rs

pub mod analytic;
pub mod locator;
pub mod ray_fan;

use dyn_clone::DynClone;
use nalgebra::Point2;
use std::fmt::Debug;

use crate::types::{DistanceVector, VehicleState};
pub use analytic::AnalyticSensor;
pub use locator::LocatorSensor;
pub use ray_fan::RayFan;

/// The contract for any sensor that measures range along a fixed fan of rays.
///
/// Implementations only differ in how a single world-frame ray is resolved
/// against the obstacles (`cast_ray`); turning the fan into world rays and
/// readings back into points is shared.
pub trait RangeSensor: Send + Sync + DynClone + Debug {
    /// The body-frame scan pattern, fixed at construction.
    fn ray_fan(&self) -> &RayFan;

    /// Maximum range; also the reading for a ray that hits nothing.
    fn ray_length(&self) -> f64;

    /// Nearest obstacle point on the segment `origin -> ray_end`, if any.
    fn cast_ray(&self, origin: &Point2<f64>, ray_end: &Point2<f64>) -> Option<Point2<f64>>;

    fn num_rays(&self) -> usize {
        self.ray_fan().len()
    }

    /// One reading per ray: distance to the nearest hit, or `ray_length`.
    fn raycast_all(&self, pose: &VehicleState) -> DistanceVector {
        let origin = pose.position();
        let length = self.ray_length();
        DistanceVector::from_iterator(
            self.num_rays(),
            self.ray_fan().world_directions(pose).map(|dir| {
                self.cast_ray(&origin, &(origin + dir * length))
                    .map_or(length, |hit| (hit - origin).norm())
            }),
        )
    }

    /// One point per ray: the hit location, or the ray's far end when clear.
    fn raycast_all_locations(&self, pose: &VehicleState) -> Vec<Point2<f64>> {
        let origin = pose.position();
        let length = self.ray_length();
        self.ray_fan()
            .world_directions(pose)
            .map(|dir| {
                let end = origin + dir * length;
                self.cast_ray(&origin, &end).unwrap_or(end)
            })
            .collect()
    }

    /// Maps readings back to world points: `origin + direction_i * distances[i]`.
    fn invert_raycasts_to_locations(
        &self,
        pose: &VehicleState,
        distances: &DistanceVector,
    ) -> Vec<Point2<f64>> {
        debug_assert_eq!(distances.len(), self.num_rays());
        let origin = pose.position();
        self.ray_fan()
            .world_directions(pose)
            .zip(distances.iter())
            .map(|(dir, &d)| origin + dir * d)
            .collect()
    }
}

// Make the trait object cloneable.
dyn_clone::clone_trait_object!(RangeSensor);
