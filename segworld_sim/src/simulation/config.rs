// segworld_sim/src/simulation/config.rs

//! Resolves the final `SimulationOptions` from built-in defaults, an optional
//! scenario file and command-line overrides, in that order.

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use segworld_core::config::SimulationOptions;
use std::path::Path;
use tracing::info;

use crate::cli::Cli;

pub fn load_options(cli: &Cli) -> Result<SimulationOptions> {
    let mut figment = Figment::from(Serialized::defaults(SimulationOptions::default()));

    if let Some(path) = &cli.config {
        if !path.is_file() {
            bail!("scenario file '{}' does not exist", path.display());
        }
        info!("Loading scenario from: {}", path.display());
        figment = figment.merge(Toml::file(path));
    }

    let options: SimulationOptions = cli
        .merge_overrides(figment)
        .extract()
        .context("failed to resolve simulation options")?;
    options.validate()?;
    Ok(options)
}

/// Parses a scenario file on its own, with no command-line layer.
pub fn load_scenario_file(path: &Path) -> Result<SimulationOptions> {
    Figment::new()
        .merge(Toml::file(path))
        .extract()
        .with_context(|| format!("failed to parse scenario file '{}'", path.display()))
}
