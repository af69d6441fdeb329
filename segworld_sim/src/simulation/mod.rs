// segworld_sim/src/simulation/mod.rs

pub mod config;
pub mod persistence;

use anyhow::{Context, Result};
use segworld_core::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::cli::Cli;

/// What a finished invocation produced.
#[derive(Debug)]
pub struct Outcome {
    pub summary: BatchSummary,
    pub saved_to: PathBuf,
}

/// Resolves the options, builds the world, runs one batch and saves it.
pub fn run_batch(cli: &Cli) -> Result<Outcome> {
    let options = config::load_options(cli)?;
    let world = Arc::new(SegmentWorld::build_test_world(&options.world));

    let mut simulator =
        Simulator::new(options, world).context("could not set up the simulator")?;
    let summary = simulator
        .run_batch_simulation()
        .context("batch simulation failed")?;

    let store = simulator.to_run_store();
    let saved_to = persistence::save_run_store(&store, &cli.data_dir, &cli.output)?;
    Ok(Outcome { summary, saved_to })
}

/// Loads a saved run and logs what it contains.
pub fn summarize_saved_run(path: &Path) -> Result<RunStore> {
    let store = persistence::load_run_store(path)?;
    let summary = BatchSummary::from_records(&store.simulation_data, store.counter);
    info!(
        "{}: {} timesteps, {:.2} s simulated, controllers {:?}",
        path.display(),
        store.num_timesteps,
        store.end_time,
        store.controller_type_order
    );
    info!(
        "{} runs: {} collisions, {} step limits, {} cutoffs",
        summary.runs, summary.collisions, summary.step_limits, summary.cutoffs
    );
    Ok(store)
}
