// segworld_core/src/control/mod.rs

//! Reactive controllers: pure maps from the latest scan to a turn command.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::str::FromStr;

use crate::error::SimError;
use crate::types::{DistanceVector, VehicleState};

mod counting;

pub use counting::CountingController;

/// Magnitude of every non-zero turn command, in rad/s.
pub const TURN_RATE: f64 = 2.0;

// =========================================================================
// == Commands & Kinds ==
// =========================================================================

/// The discrete turn-rate commands a controller may issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlCommand {
    /// Clockwise, `-TURN_RATE`.
    Right,
    Straight,
    /// Counter-clockwise, `+TURN_RATE`.
    Left,
}

impl ControlCommand {
    /// The scalar fed to the plant as `heading_dot`.
    pub fn turn_rate(self) -> f64 {
        match self {
            ControlCommand::Right => -TURN_RATE,
            ControlCommand::Straight => 0.0,
            ControlCommand::Left => TURN_RATE,
        }
    }
}

/// Every controller the simulator knows how to drive with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerKind {
    /// Obstacle-count heuristic, see [`CountingController`].
    Default,
    /// Never turns.
    Straight,
}

impl ControllerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerKind::Default => "default",
            ControllerKind::Straight => "straight",
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControllerKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(ControllerKind::Default),
            "straight" => Ok(ControllerKind::Straight),
            other => Err(SimError::UnsupportedController(other.to_string())),
        }
    }
}

// =========================================================================
// == The Controller Contract ==
// =========================================================================

pub trait Controller: Debug + Send + Sync {
    fn compute_control_input(
        &self,
        state: &VehicleState,
        distances: &DistanceVector,
    ) -> ControlCommand;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StraightController;

impl Controller for StraightController {
    fn compute_control_input(
        &self,
        _state: &VehicleState,
        _distances: &DistanceVector,
    ) -> ControlCommand {
        ControlCommand::Straight
    }
}

/// One instance of every [`ControllerKind`], built once per simulator.
#[derive(Debug, Clone)]
pub struct ControllerBank {
    counting: CountingController,
    straight: StraightController,
}

impl ControllerBank {
    pub fn new(ray_length: f64, hit_tolerance: f64) -> Self {
        Self {
            counting: CountingController::new(ray_length, hit_tolerance),
            straight: StraightController,
        }
    }

    pub fn get(&self, kind: ControllerKind) -> &dyn Controller {
        match kind {
            ControllerKind::Default => &self.counting,
            ControllerKind::Straight => &self.straight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_from_their_names() {
        for kind in [ControllerKind::Default, ControllerKind::Straight] {
            assert_eq!(kind.as_str().parse::<ControllerKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_kind_name_is_a_configuration_error() {
        assert_eq!(
            "defaultRandom".parse::<ControllerKind>(),
            Err(SimError::UnsupportedController("defaultRandom".into()))
        );
    }

    #[test]
    fn commands_map_to_signed_turn_rates() {
        assert_eq!(ControlCommand::Right.turn_rate(), -2.0);
        assert_eq!(ControlCommand::Straight.turn_rate(), 0.0);
        assert_eq!(ControlCommand::Left.turn_rate(), 2.0);
    }

    #[test]
    fn bank_dispatches_by_kind() {
        let bank = ControllerBank::new(10.0, 1e-3);
        let blocked_first_half = DistanceVector::from_vec(vec![1.0, 1.0, 10.0, 10.0]);
        let state = VehicleState::default();
        assert_eq!(
            bank.get(ControllerKind::Default)
                .compute_control_input(&state, &blocked_first_half),
            ControlCommand::Left
        );
        assert_eq!(
            bank.get(ControllerKind::Straight)
                .compute_control_input(&state, &blocked_first_half),
            ControlCommand::Straight
        );
    }
}
