// segworld_core/src/plant.rs

use crate::models::dynamics::{unicycle::UnicycleModel, Dynamics};
use crate::types::{Control, VehicleState};
use crate::utils::integrators::{Integrator, IntegratorKind};

/// The simulated vehicle: owns its pose and advances it one timestep at a time.
#[derive(Debug)]
pub struct CarPlant {
    model: UnicycleModel,
    integrator: Box<dyn Integrator<f64>>,
    state: VehicleState,
    /// Simulated seconds since the plant was built.
    t: f64,
}

impl CarPlant {
    pub fn new(velocity: f64, integrator: IntegratorKind) -> Self {
        Self {
            model: UnicycleModel::new(velocity),
            integrator: integrator.build(),
            state: VehicleState::default(),
            t: 0.0,
        }
    }

    pub fn state(&self) -> VehicleState {
        self.state
    }

    /// Overwrites the pose. No validation.
    pub fn set_state(&mut self, x: f64, y: f64, heading: f64) {
        self.state = VehicleState::new(x, y, heading);
    }

    /// Integrates one step of length `dt` with the turn rate `control_input`
    /// held constant, and returns the new pose.
    pub fn step(&mut self, control_input: f64, dt: f64) -> VehicleState {
        let u = Control::from_vec(vec![control_input]);
        let x = self.model.propagate(
            &self.state.to_state_vector(),
            &u,
            self.t,
            dt,
            self.integrator.as_ref(),
        );
        self.t += dt;
        self.state = VehicleState::from_state_vector(&x);
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn zero_input_drives_straight_at_constant_speed() {
        let mut car = CarPlant::new(4.0, IntegratorKind::Rk4);
        car.set_state(1.0, -1.0, std::f64::consts::FRAC_PI_4);
        let mut last = car.state();
        for _ in 0..20 {
            let next = car.step(0.0, 0.05);
            let travelled = (next.position() - last.position()).norm();
            assert_abs_diff_eq!(travelled, 4.0 * 0.05, epsilon = 1e-12);
            assert_abs_diff_eq!(next.heading, std::f64::consts::FRAC_PI_4, epsilon = 1e-15);
            last = next;
        }
        // Still on the line y = x - 2.
        assert_abs_diff_eq!(last.y, last.x - 2.0, epsilon = 1e-9);
    }

    #[test]
    fn heading_moves_with_the_sign_of_the_command() {
        for integrator in [IntegratorKind::Rk1, IntegratorKind::Rk4] {
            let mut car = CarPlant::new(4.0, integrator);
            let mut heading = car.state().heading;
            for _ in 0..10 {
                let h = car.step(2.0, 0.05).heading;
                assert!(h > heading);
                heading = h;
            }
            for _ in 0..10 {
                let h = car.step(-2.0, 0.05).heading;
                assert!(h < heading);
                heading = h;
            }
        }
    }

    #[test]
    fn set_state_overwrites_unconditionally() {
        let mut car = CarPlant::new(1.0, IntegratorKind::default());
        car.step(2.0, 0.5);
        car.set_state(10.0, 20.0, -30.0);
        assert_eq!(car.state(), VehicleState::new(10.0, 20.0, -30.0));
    }
}
