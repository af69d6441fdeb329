// segworld_core/src/models/perception/ray_fan.rs

use nalgebra::{Unit, Vector2};

use crate::types::VehicleState;

/// The body-frame unit directions a range sensor casts along.
///
/// Rays are evenly spaced from `-fov/2` (index 0, clockwise-most) to `+fov/2`,
/// with +X as the heading. An odd count puts one ray exactly on the heading.
#[derive(Debug, Clone, PartialEq)]
pub struct RayFan {
    directions: Vec<Unit<Vector2<f64>>>,
}

impl RayFan {
    pub fn new(num_rays: usize, field_of_view_rad: f64) -> Self {
        let angles: Vec<f64> = match num_rays {
            0 => Vec::new(),
            1 => vec![0.0],
            n => {
                let start = -field_of_view_rad / 2.0;
                let increment = field_of_view_rad / (n - 1) as f64;
                (0..n).map(|i| start + i as f64 * increment).collect()
            }
        };
        let directions = angles
            .into_iter()
            .map(|a| Unit::new_unchecked(Vector2::new(a.cos(), a.sin())))
            .collect();
        Self { directions }
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    pub fn directions(&self) -> &[Unit<Vector2<f64>>] {
        &self.directions
    }

    /// The fan rotated into the world frame by the pose's heading.
    pub fn world_directions<'a>(
        &'a self,
        pose: &VehicleState,
    ) -> impl Iterator<Item = Vector2<f64>> + 'a {
        let body_to_world = pose.isometry();
        self.directions.iter().map(move |d| body_to_world * d.into_inner())
    }
}
