// segworld_core/src/lib.rs

pub mod config;
pub mod control;
pub mod error;
pub mod geometry;
pub mod models;
pub mod plant;
pub mod prelude;
pub mod simulation;
pub mod types;
pub mod utils;
