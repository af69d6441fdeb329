// segworld_core/src/models/dynamics/mod.rs

use std::fmt::Debug;

use crate::types::{Control, State};
use crate::utils::integrators::Integrator;

pub mod unicycle;

// --- DYNAMICS MODEL TRAIT ---
/// Represents the kinematic model of a vehicle: `x_dot = f(x, u, t)`.
pub trait Dynamics: Debug + Send + Sync {
    /// Length of the state vector `x`.
    fn get_state_dim(&self) -> usize;

    /// Length of the control vector `u`.
    fn get_control_dim(&self) -> usize;

    /// Computes the time derivative of the state vector: `x_dot = f(x, u, t)`.
    ///
    /// # Arguments
    /// * `x`: Current state vector.
    /// * `u`: Current control input vector.
    /// * `t`: Current simulation time.
    fn get_derivatives(&self, x: &State, u: &Control, t: f64) -> State;

    /// Propagates the state forward by `dt` with `u` held constant, using the
    /// supplied integrator.
    ///
    /// # Arguments
    /// * `x`: Current state vector.
    /// * `u`: Control input, assumed constant over `dt`.
    /// * `t`: Current simulation time.
    /// * `dt`: Time step duration. Must be non-negative.
    /// * `integrator`: The scheme to integrate with (e.g. `RK4`).
    ///
    /// # Returns
    /// The estimated state vector at time `t + dt`.
    fn propagate(
        &self,
        x: &State,
        u: &Control,
        t: f64,
        dt: f64,
        integrator: &dyn Integrator<f64>,
    ) -> State {
        debug_assert!(dt >= 0.0, "Dynamics::propagate: dt cannot be negative");
        debug_assert_eq!(x.nrows(), self.get_state_dim());
        debug_assert_eq!(u.nrows(), self.get_control_dim());

        let func =
            |func_x: &State, func_t: f64| -> State { self.get_derivatives(func_x, u, func_t) };

        integrator.step(&func, x, t, t + dt)
    }
}
