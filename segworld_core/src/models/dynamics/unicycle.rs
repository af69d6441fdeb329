// segworld_core/src/models/dynamics/unicycle.rs

use super::Dynamics;
use crate::types::{Control, State};

/// Constant-speed unicycle.
/// State vector: `[x, y, heading]`
/// Control input: `[heading_rate]`
/// `x_dot = [v*cos(heading), v*sin(heading), heading_rate]`
#[derive(Debug, Clone)]
pub struct UnicycleModel {
    /// Forward speed, fixed for the life of the model.
    pub velocity: f64,
}

impl UnicycleModel {
    const STATE_DIM: usize = 3;
    const CONTROL_DIM: usize = 1;

    pub fn new(velocity: f64) -> Self {
        Self { velocity }
    }
}

impl Dynamics for UnicycleModel {
    fn get_state_dim(&self) -> usize {
        Self::STATE_DIM
    }

    fn get_control_dim(&self) -> usize {
        Self::CONTROL_DIM
    }

    fn get_derivatives(&self, x: &State, u: &Control, _t: f64) -> State {
        let heading = x[2];
        State::from_vec(vec![
            self.velocity * heading.cos(),
            self.velocity * heading.sin(),
            u[0],
        ])
    }
}
