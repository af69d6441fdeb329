// segworld_core/src/types.rs

use nalgebra::{DVector, Isometry2, Point2, Vector2};
use serde::{Deserialize, Serialize};

// --- Core Type Aliases ---
pub type State = DVector<f64>;
pub type Control = DVector<f64>;

/// One range reading per ray, in ray order. A reading equal to the sensor's
/// max range means the ray hit nothing.
pub type DistanceVector = DVector<f64>;

// =========================================================================
// == Vehicle Pose ==
// =========================================================================

/// Planar pose of the vehicle. `heading` is in radians, counter-clockwise from +X,
/// and is never wrapped; rotations treat it modulo 2π.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleState {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl VehicleState {
    pub const STATE_DIM: usize = 3;

    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }

    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    /// Body-to-world transform for this pose.
    pub fn isometry(&self) -> Isometry2<f64> {
        Isometry2::new(Vector2::new(self.x, self.y), self.heading)
    }

    pub fn to_state_vector(&self) -> State {
        State::from_vec(vec![self.x, self.y, self.heading])
    }

    /// Reads `[x, y, heading]` back out of a state vector.
    /// Panics if `x` is shorter than [`Self::STATE_DIM`].
    pub fn from_state_vector(x: &State) -> Self {
        Self::new(x[0], x[1], x[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn isometry_rotates_body_x_onto_heading() {
        let pose = VehicleState::new(1.0, 2.0, FRAC_PI_2);
        let forward = pose.isometry() * Point2::new(1.0, 0.0);
        assert_abs_diff_eq!(forward.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(forward.y, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn state_vector_layout_is_x_y_heading() {
        let pose = VehicleState::new(-4.0, 0.5, 7.0);
        let v = pose.to_state_vector();
        assert_eq!(v.len(), VehicleState::STATE_DIM);
        assert_eq!(VehicleState::from_state_vector(&v), pose);
    }
}
