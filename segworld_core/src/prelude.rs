// segworld_core/src/prelude.rs

// --- Core Abstractions ---
pub use crate::control::Controller;
pub use crate::geometry::GeometryQuery;
pub use crate::models::dynamics::Dynamics;
pub use crate::models::perception::RangeSensor;
pub use crate::utils::integrators::Integrator;

// --- Data Structures ---
pub use crate::config::{SimulationOptions, StartPose};
pub use crate::control::{ControlCommand, ControllerKind};
pub use crate::error::SimError;
pub use crate::geometry::{Bounds, LineSegment, SegmentWorld};
pub use crate::types::{DistanceVector, VehicleState};

// --- Simulation ---
pub use crate::models::perception::{AnalyticSensor, LocatorSensor, RayFan};
pub use crate::plant::CarPlant;
pub use crate::simulation::{BatchSummary, RunRecord, RunStore, Simulator, Termination};
