// segworld_core/src/models/perception/locator.rs

use nalgebra::Point2;
use std::sync::Arc;

use super::{RangeSensor, RayFan};
use crate::geometry::GeometryQuery;

/// Range sensor that resolves every ray through the world's geometry query service.
#[derive(Debug, Clone)]
pub struct LocatorSensor {
    world: Arc<dyn GeometryQuery>,
    rays: RayFan,
    ray_length: f64,
}

impl LocatorSensor {
    pub fn new(world: Arc<dyn GeometryQuery>, rays: RayFan, ray_length: f64) -> Self {
        Self {
            world,
            rays,
            ray_length,
        }
    }

    /// Points the sensor at a different obstacle set.
    pub fn set_locator(&mut self, world: Arc<dyn GeometryQuery>) {
        self.world = world;
    }
}

impl RangeSensor for LocatorSensor {
    fn ray_fan(&self) -> &RayFan {
        &self.rays
    }

    fn ray_length(&self) -> f64 {
        self.ray_length
    }

    fn cast_ray(&self, origin: &Point2<f64>, ray_end: &Point2<f64>) -> Option<Point2<f64>> {
        self.world.nearest_intersection(origin, ray_end)
    }
}
