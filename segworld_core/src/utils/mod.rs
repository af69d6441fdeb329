// segworld_core/src/utils/mod.rs

pub mod integrators;
