// segworld_core/src/simulation/mod.rs

//! The run orchestrator: sense, decide, act, record, repeated until a run ends,
//! and runs repeated until the controller's run time is spent.

mod history;
mod progress;
mod records;
mod store;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{SimulationOptions, StartPose};
use crate::control::{ControllerBank, ControllerKind};
use crate::error::SimError;
use crate::geometry::GeometryQuery;
use crate::models::perception::{LocatorSensor, RangeSensor, RayFan};
use crate::plant::CarPlant;
use crate::types::{DistanceVector, VehicleState};

pub use history::History;
pub use progress::ProgressReporter;
pub use records::{BatchSummary, ControllerSchedule, RunRecord, Termination};
pub use store::RunStore;

/// Shortest distance to a wall the start-pose sampler keeps from the arena edge.
const START_MARGIN: f64 = 5.0;

/// Largest disagreement between the primary and cross-check sensors that is
/// not worth a warning.
const CROSS_CHECK_TOLERANCE: f64 = 1e-6;

/// Number of whole timesteps of length `dt` needed to cover `duration`.
///
/// Quotients within rounding noise of an integer count as that integer. Any
/// positive duration covers at least one step.
pub fn steps_for(duration: f64, dt: f64) -> usize {
    let steps = duration / dt;
    let nearest = steps.round();
    let steps = if (steps - nearest).abs() < 1e-9 {
        nearest as usize
    } else {
        steps.ceil() as usize
    };
    steps.max(1)
}

// =========================================================================
// == Simulator ==
// =========================================================================

/// Owns the vehicle, its sensors and controllers, and the history arena a batch
/// is written into.
///
/// Every global timestep index is shared by all runs of a batch: a run starts at
/// the index where the previous one ended, so the runs tile `[0, counter]`.
#[derive(Debug)]
pub struct Simulator {
    options: SimulationOptions,
    world: Arc<dyn GeometryQuery>,
    sensor: Box<dyn RangeSensor>,
    cross_check: Option<Box<dyn RangeSensor>>,
    controllers: ControllerBank,
    car: CarPlant,
    rng: ChaCha8Rng,

    history: History,
    counter: usize,
    num_timesteps: usize,
    end_time: f64,
    schedule: ControllerSchedule,
    runs: Vec<RunRecord>,
}

impl Simulator {
    /// Validates `options` and builds a simulator whose range sensor reads
    /// `world` through its nearest-intersection query.
    pub fn new(
        options: SimulationOptions,
        world: Arc<dyn GeometryQuery>,
    ) -> Result<Self, SimError> {
        options.validate()?;

        let fan = RayFan::new(
            options.sensor.num_rays,
            options.sensor.field_of_view_deg.to_radians(),
        );
        let sensor = Box::new(LocatorSensor::new(
            Arc::clone(&world),
            fan,
            options.sensor.ray_length,
        ));
        let controllers =
            ControllerBank::new(options.sensor.ray_length, options.controller.hit_tolerance);
        let car = CarPlant::new(options.car.velocity, options.simulation.integrator);
        let rng = ChaCha8Rng::seed_from_u64(options.simulation.random_seed);

        let mut sim = Self {
            options,
            world,
            sensor,
            cross_check: None,
            controllers,
            car,
            rng,
            history: History::with_capacity(0, 0, false),
            counter: 0,
            num_timesteps: 0,
            end_time: 0.0,
            schedule: ControllerSchedule::default(),
            runs: Vec::new(),
        };
        sim.allocate();
        Ok(sim)
    }

    /// Attaches a second sensor that re-measures every recorded frame. Its
    /// readings are stored alongside the primary ones and disagreements are
    /// logged.
    pub fn with_cross_check(mut self, sensor: Box<dyn RangeSensor>) -> Result<Self, SimError> {
        if sensor.num_rays() != self.sensor.num_rays() {
            return Err(SimError::invalid(
                "cross_check",
                format!(
                    "sensor has {} rays, primary sensor has {}",
                    sensor.num_rays(),
                    self.sensor.num_rays()
                ),
            ));
        }
        self.cross_check = Some(sensor);
        self.allocate();
        Ok(self)
    }

    /// Clears every buffer and sizes the arena for the configured end time.
    fn allocate(&mut self) {
        self.end_time = self.options.end_time();
        self.num_timesteps = steps_for(self.end_time, self.options.dt);
        self.history = History::with_capacity(
            self.num_timesteps + 1,
            self.sensor.num_rays(),
            self.cross_check.is_some(),
        );
        self.counter = 0;
        self.schedule = ControllerSchedule::default();
        self.runs.clear();
    }

    // --- Accessors ---

    pub fn options(&self) -> &SimulationOptions {
        &self.options
    }

    pub fn sensor(&self) -> &dyn RangeSensor {
        self.sensor.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn runs(&self) -> &[RunRecord] {
        &self.runs
    }

    pub fn schedule(&self) -> &ControllerSchedule {
        &self.schedule
    }

    /// Next global timestep index to be written.
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Length of the batch in timesteps.
    pub fn num_timesteps(&self) -> usize {
        self.num_timesteps
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn controller_type_at(&self, index: usize) -> Option<ControllerKind> {
        self.schedule.controller_type_at(index)
    }

    /// A scan collides when any reading is strictly below the threshold.
    pub fn check_in_collision(&self, distances: &DistanceVector) -> bool {
        distances.iter().any(|&d| d < self.options.simulation.collision_threshold)
    }

    // =====================================================================
    // == Single run ==
    // =====================================================================

    /// Drives one run with controller `kind`, starting at the current counter.
    ///
    /// The run ends on collision, when it outlives the per-run step cap, or when
    /// the counter reaches `simulation_cutoff` or the end of the horizon. The
    /// run's closing pose and scan are left at the final counter with a zero
    /// control; a following run starts on that same index and overwrites it.
    /// A run that makes no progress advances the counter by one anyway.
    pub fn run_single_simulation(
        &mut self,
        kind: ControllerKind,
        simulation_cutoff: usize,
    ) -> Result<RunRecord, SimError> {
        if self.counter + 1 >= self.history.len() {
            return Err(SimError::HorizonExhausted {
                counter: self.counter,
                horizon: self.num_timesteps,
            });
        }

        let start_index = self.counter;
        let mut current_state = self.initial_state()?;
        let mut current_raycast = self.sensor.raycast_all(&current_state);
        let max_steps = self.options.simulation.max_steps_per_run;
        let dt = self.options.dt;

        let mut steps_taken = 0;
        let mut termination = Termination::Cutoff;

        while self.counter + 1 < self.num_timesteps {
            steps_taken += 1;
            let idx = self.counter;
            self.history.record_frame(idx, &current_state, &current_raycast);
            self.cross_check_frame(idx, &current_state, &current_raycast);

            let command = self
                .controllers
                .get(kind)
                .compute_control_input(&current_state, &current_raycast);
            let control_input = command.turn_rate();
            current_state = self.car.step(control_input, dt);
            self.history.record_control(idx, control_input);

            current_raycast = self.sensor.raycast_all(&current_state);
            self.counter += 1;

            if self.check_in_collision(&current_raycast) {
                termination = Termination::Collided;
                break;
            }
            if steps_taken > max_steps {
                termination = Termination::StepLimit;
                break;
            }
            if self.counter >= simulation_cutoff {
                termination = Termination::Cutoff;
                break;
            }
        }

        if self.counter == start_index {
            self.history.record_frame(start_index, &current_state, &current_raycast);
            self.cross_check_frame(start_index, &current_state, &current_raycast);
            self.counter += 1;
        }
        self.history
            .record_closing_frame(self.counter, &current_state, &current_raycast);
        self.cross_check_frame(self.counter, &current_state, &current_raycast);

        let record = RunRecord {
            start_index,
            end_index: self.counter,
            duration: self.counter - start_index,
            controller_type: kind,
            run_number: self.runs.len(),
            termination,
        };
        debug!(
            "Run {} ({}) ended {:?} after {} steps [{}, {}]",
            record.run_number, kind, termination, steps_taken, start_index, self.counter
        );
        self.runs.push(record.clone());
        Ok(record)
    }

    /// Places the car at its start pose for a new run.
    fn initial_state(&mut self) -> Result<VehicleState, SimError> {
        match self.options.simulation.start_pose {
            StartPose::Zero => {
                self.car.set_state(0.0, 0.0, 0.0);
                Ok(self.car.state())
            }
            StartPose::RandomCollisionFree => self.sample_collision_free_start(),
        }
    }

    fn sample_collision_free_start(&mut self) -> Result<VehicleState, SimError> {
        let area = self
            .world
            .bounds()
            .and_then(|b| b.shrink(START_MARGIN))
            .ok_or_else(|| {
                SimError::invalid(
                    "simulation.start_pose",
                    "world has no bounded area to sample a start pose from",
                )
            })?;

        let attempts = self.options.simulation.max_start_attempts;
        for _ in 0..attempts {
            let x = self.rng.gen_range(area.min.x..area.max.x);
            let y = self.rng.gen_range(area.min.y..area.max.y);
            let heading = self.rng.gen_range(0.0..TAU);
            self.car.set_state(x, y, heading);
            let pose = self.car.state();
            if !self.check_in_collision(&self.sensor.raycast_all(&pose)) {
                return Ok(pose);
            }
        }
        Err(SimError::NoCollisionFreeStart { attempts })
    }

    fn cross_check_frame(&mut self, idx: usize, pose: &VehicleState, primary: &DistanceVector) {
        let Some(sensor) = self.cross_check.as_ref() else {
            return;
        };
        let secondary = sensor.raycast_all(pose);
        let gap = (&secondary - primary).amax();
        if gap > CROSS_CHECK_TOLERANCE {
            warn!(
                "Sensors disagree by {:.3e} at step {} (pose {:.3}, {:.3}, {:.3})",
                gap, idx, pose.x, pose.y, pose.heading
            );
        }
        self.history.record_cross_check(idx, &secondary);
    }

    // =====================================================================
    // == Batch ==
    // =====================================================================

    /// Resets the arena and repeats single runs with the configured controller
    /// until its run time is spent or the horizon is reached, then trims every
    /// buffer to the indices actually written.
    pub fn run_batch_simulation(&mut self) -> Result<BatchSummary, SimError> {
        self.allocate();
        let kind = self.options.controller.kind;
        let dt = self.options.dt;

        self.schedule.register(kind, self.counter);
        let loop_start = self.counter;
        let run_steps = steps_for(self.options.run_time.duration_for(kind), dt);
        let cutoff = (loop_start + run_steps).min(self.num_timesteps);

        info!(
            "Starting batch: controller '{}', {} timesteps of {} s, {} steps for this controller",
            kind, self.num_timesteps, dt, run_steps
        );

        // Every batch holds at least one run, so slot 0 is always written.
        let mut progress = ProgressReporter::new(10);
        loop {
            self.run_single_simulation(kind, cutoff)?;
            progress.update(self.counter as f64 / self.num_timesteps as f64);
            let spent = self.counter - loop_start >= run_steps;
            if spent || self.counter + 1 >= self.num_timesteps {
                break;
            }
        }

        let allocated = self.num_timesteps;
        self.history.truncate(self.counter + 1);
        self.end_time *= self.counter as f64 / allocated as f64;
        self.num_timesteps = self.counter + 1;

        let summary = BatchSummary::from_records(&self.runs, self.counter);
        info!(
            "Batch finished: {} runs ({} collisions, {} step limits, {} cutoffs), final index {}",
            summary.runs,
            summary.collisions,
            summary.step_limits,
            summary.cutoffs,
            summary.final_counter
        );
        Ok(summary)
    }

    /// Snapshot of the batch for persistence and playback.
    pub fn to_run_store(&self) -> RunStore {
        let distances = self.history.distance_matrix();
        RunStore {
            options: self.options.clone(),
            end_time: self.end_time,
            simulation_data: self.runs.clone(),
            state_over_time: self.history.poses().to_vec(),
            raycast_data: distances
                .row_iter()
                .map(|row| row.iter().copied().collect())
                .collect(),
            control_input_data: self.history.controls().to_vec(),
            num_timesteps: self.num_timesteps,
            controller_type_order: self.schedule.order().to_vec(),
            idx_dict: self.schedule.index_map().clone(),
            counter: self.counter,
        }
    }
}
