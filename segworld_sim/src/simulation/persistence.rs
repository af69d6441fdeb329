// segworld_sim/src/simulation/persistence.rs

use anyhow::{Context, Result};
use segworld_core::simulation::RunStore;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn store_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

/// Writes `store` to `<dir>/<name>.json` and the options it was produced with
/// to `<dir>/<name>.toml`, creating `dir` if needed.
pub fn save_run_store(store: &RunStore, dir: &Path, name: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("could not create data directory '{}'", dir.display()))?;

    let path = store_path(dir, name);
    let file = File::create(&path)
        .with_context(|| format!("could not create run file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, store)
        .with_context(|| format!("could not serialize run to '{}'", path.display()))?;
    writer.flush()?;

    let options_path = path.with_extension("toml");
    let options =
        toml::to_string_pretty(&store.options).context("could not render options as TOML")?;
    fs::write(&options_path, options)
        .with_context(|| format!("could not write '{}'", options_path.display()))?;

    info!("Saved {} timesteps to {}", store.num_timesteps, path.display());
    Ok(path)
}

pub fn load_run_store(path: &Path) -> Result<RunStore> {
    let file = File::open(path)
        .with_context(|| format!("could not open run file '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("'{}' is not a valid run file", path.display()))
}
