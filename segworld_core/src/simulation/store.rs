// segworld_core/src/simulation/store.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::records::{ControllerSchedule, RunRecord};
use crate::config::SimulationOptions;
use crate::control::ControllerKind;
use crate::types::{DistanceVector, VehicleState};

/// Everything a finished batch produced, in a shape that serializes cleanly
/// and can be replayed without re-running the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStore {
    pub options: SimulationOptions,
    /// Nominal batch length in seconds, rescaled to the part actually simulated.
    pub end_time: f64,
    pub simulation_data: Vec<RunRecord>,
    pub state_over_time: Vec<VehicleState>,
    /// One row of readings per timestep.
    pub raycast_data: Vec<Vec<f64>>,
    pub control_input_data: Vec<f64>,
    pub num_timesteps: usize,
    pub controller_type_order: Vec<ControllerKind>,
    pub idx_dict: BTreeMap<ControllerKind, usize>,
    pub counter: usize,
}

impl RunStore {
    fn schedule(&self) -> ControllerSchedule {
        let mut schedule = ControllerSchedule::default();
        for kind in &self.controller_type_order {
            if let Some(&idx) = self.idx_dict.get(kind) {
                schedule.register(*kind, idx);
            }
        }
        schedule
    }

    pub fn controller_type_at(&self, index: usize) -> Option<ControllerKind> {
        self.schedule().controller_type_at(index)
    }

    pub fn pose_at(&self, index: usize) -> Option<VehicleState> {
        self.state_over_time.get(index).copied()
    }

    pub fn distances_at(&self, index: usize) -> Option<DistanceVector> {
        self.raycast_data
            .get(index)
            .map(|row| DistanceVector::from_column_slice(row))
    }

    /// The run whose `[start_index, end_index]` contains `index`. A shared
    /// boundary belongs to the later run.
    pub fn run_at(&self, index: usize) -> Option<&RunRecord> {
        self.simulation_data
            .iter()
            .rev()
            .find(|r| r.start_index <= index && index <= r.end_index)
    }

    /// Maps a scrubber position in `[0, 1]` onto a timestep index.
    pub fn playback_index(&self, fraction: f64) -> usize {
        let last = self.state_over_time.len().saturating_sub(1);
        let idx = (fraction.clamp(0.0, 1.0) * self.state_over_time.len() as f64).floor() as usize;
        idx.min(last)
    }
}
