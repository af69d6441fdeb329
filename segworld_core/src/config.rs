// segworld_core/src/config.rs

use serde::{Deserialize, Serialize};

use crate::control::ControllerKind;
use crate::error::SimError;
use crate::utils::integrators::IntegratorKind;

// =========================================================================
// == Top-Level Options ==
// =========================================================================

/// # SimulationOptions
/// Everything a [`Simulator`](crate::simulation::Simulator) needs besides the world.
/// Every section falls back to its documented defaults when missing, so a
/// scenario file only has to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationOptions {
    pub world: WorldOptions,
    pub sensor: SensorOptions,
    pub car: CarOptions,
    /// Fixed integration timestep in seconds.
    pub dt: f64,
    pub run_time: RunTimeOptions,
    pub controller: ControllerOptions,
    pub simulation: RunOptions,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            world: WorldOptions::default(),
            sensor: SensorOptions::default(),
            car: CarOptions::default(),
            dt: 0.05,
            run_time: RunTimeOptions::default(),
            controller: ControllerOptions::default(),
            simulation: RunOptions::default(),
        }
    }
}

impl SimulationOptions {
    /// Positivity and range checks. Run once when a simulator is built.
    pub fn validate(&self) -> Result<(), SimError> {
        positive("dt", self.dt)?;
        self.world.validate()?;
        self.sensor.validate()?;
        positive("car.velocity", self.car.velocity)?;
        positive(
            "run_time.default_controller_time",
            self.run_time.default_controller_time,
        )?;
        positive(
            "run_time.straight_controller_time",
            self.run_time.straight_controller_time,
        )?;
        if !(0.0..self.sensor.ray_length).contains(&self.controller.hit_tolerance) {
            return Err(SimError::invalid(
                "controller.hit_tolerance",
                format!(
                    "must lie in [0, ray_length), got {}",
                    self.controller.hit_tolerance
                ),
            ));
        }
        positive(
            "simulation.collision_threshold",
            self.simulation.collision_threshold,
        )?;
        if self.simulation.max_steps_per_run == 0 {
            return Err(SimError::invalid(
                "simulation.max_steps_per_run",
                "must be at least 1",
            ));
        }
        if self.simulation.max_start_attempts == 0 {
            return Err(SimError::invalid(
                "simulation.max_start_attempts",
                "must be at least 1",
            ));
        }
        if let Some(end_time) = self.simulation.end_time {
            positive("simulation.end_time", end_time)?;
        }
        Ok(())
    }

    /// Nominal length of a batch in seconds: the explicit end time if one is
    /// set, otherwise the run time allotted to the configured controller.
    pub fn end_time(&self) -> f64 {
        self.simulation
            .end_time
            .unwrap_or_else(|| self.run_time.duration_for(self.controller.kind))
    }
}

// =========================================================================
// == Sections ==
// =========================================================================

/// Parameters handed to the world provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldOptions {
    /// Obstacle centres stay within this fraction of the arena half-extent.
    pub obstacles_inner_fraction: f64,
    pub random_seed: u64,
    /// Obstacle count as a percentage of arena area / 100.
    pub percent_obs_density: f64,
    /// Seed the obstacle field from `random_seed` instead of entropy.
    pub non_random_world: bool,
    /// Half-length of each obstacle segment.
    pub circle_radius: f64,
    pub scale: f64,
}

impl Default for WorldOptions {
    fn default() -> Self {
        Self {
            obstacles_inner_fraction: 0.98,
            random_seed: 40,
            percent_obs_density: 0.0,
            non_random_world: true,
            circle_radius: 1.0,
            scale: 1.0,
        }
    }
}

impl WorldOptions {
    fn validate(&self) -> Result<(), SimError> {
        if !(0.0..=1.0).contains(&self.obstacles_inner_fraction) {
            return Err(SimError::invalid(
                "world.obstacles_inner_fraction",
                format!("must lie in [0, 1], got {}", self.obstacles_inner_fraction),
            ));
        }
        if self.percent_obs_density < 0.0 {
            return Err(SimError::invalid(
                "world.percent_obs_density",
                "must not be negative",
            ));
        }
        positive("world.circle_radius", self.circle_radius)?;
        positive("world.scale", self.scale)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SensorOptions {
    /// Max range; also the reading reported when a ray hits nothing.
    pub ray_length: f64,
    pub num_rays: usize,
    /// Total angular width of the ray fan, centred on the heading.
    pub field_of_view_deg: f64,
}

impl Default for SensorOptions {
    fn default() -> Self {
        Self {
            ray_length: 20.0,
            num_rays: 21,
            field_of_view_deg: 90.0,
        }
    }
}

impl SensorOptions {
    fn validate(&self) -> Result<(), SimError> {
        positive("sensor.ray_length", self.ray_length)?;
        if self.num_rays == 0 {
            return Err(SimError::invalid("sensor.num_rays", "must be at least 1"));
        }
        if !(self.field_of_view_deg > 0.0 && self.field_of_view_deg <= 360.0) {
            return Err(SimError::invalid(
                "sensor.field_of_view_deg",
                format!("must lie in (0, 360], got {}", self.field_of_view_deg),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarOptions {
    /// Constant forward speed.
    pub velocity: f64,
}

impl Default for CarOptions {
    fn default() -> Self {
        Self { velocity: 4.0 }
    }
}

/// Seconds of simulated time allotted to each controller kind in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunTimeOptions {
    pub default_controller_time: f64,
    pub straight_controller_time: f64,
}

impl Default for RunTimeOptions {
    fn default() -> Self {
        Self {
            default_controller_time: 100.0,
            straight_controller_time: 100.0,
        }
    }
}

impl RunTimeOptions {
    pub fn duration_for(&self, kind: ControllerKind) -> f64 {
        match kind {
            ControllerKind::Default => self.default_controller_time,
            ControllerKind::Straight => self.straight_controller_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerOptions {
    /// The controller a batch drives with.
    pub kind: ControllerKind,
    /// A reading below `ray_length - hit_tolerance` counts as a hit.
    pub hit_tolerance: f64,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            kind: ControllerKind::Default,
            hit_tolerance: 1e-3,
        }
    }
}

/// Where each single run places the vehicle before stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartPose {
    /// `(0, 0, 0)`.
    #[default]
    Zero,
    /// Uniform inside the world bounds (shrunk by a margin), uniform heading,
    /// resampled until the first scan is outside the collision threshold.
    RandomCollisionFree,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunOptions {
    /// A scan whose smallest reading is below this is a collision.
    pub collision_threshold: f64,
    /// A single run stops once it has taken more than this many steps.
    pub max_steps_per_run: usize,
    pub start_pose: StartPose,
    pub max_start_attempts: usize,
    pub integrator: IntegratorKind,
    /// Seed for start-pose sampling.
    pub random_seed: u64,
    /// Overrides the nominal batch length derived from `run_time`.
    pub end_time: Option<f64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            collision_threshold: 0.4,
            max_steps_per_run: 100,
            start_pose: StartPose::Zero,
            max_start_attempts: 1000,
            integrator: IntegratorKind::Rk4,
            random_seed: 5,
            end_time: None,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), SimError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SimError::invalid(
            field,
            format!("must be a positive number, got {value}"),
        ))
    }
}
