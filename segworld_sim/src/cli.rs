// segworld_sim/src/cli.rs

use clap::{ArgAction, Parser};
use figment::{providers::Serialized, Figment};
use segworld_core::control::ControllerKind;
use std::path::PathBuf;

/// Segworld: a point vehicle with a ray-fan range sensor and a reactive
/// controller, driven through a field of line-segment obstacles.
///
/// Runs one batch with the configured controller and saves the result as JSON.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Scenario TOML file layered over the built-in defaults.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Obstacle density in percent of the arena area.
    #[arg(long)]
    pub percent_obs_density: Option<f64>,

    /// Nominal batch length in seconds.
    #[arg(long)]
    pub end_time: Option<f64>,

    /// Seed the obstacle field from `world.random_seed` (true) or from entropy (false).
    /// A bare `--non-random-world` means true.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub non_random_world: Option<bool>,

    /// Half-length of each obstacle segment.
    #[arg(long)]
    pub circle_radius: Option<f64>,

    /// Arena scale; the half-extent is 50 times this.
    #[arg(long)]
    pub world_scale: Option<f64>,

    /// Controller to run the batch with (`default` or `straight`).
    #[arg(long)]
    pub controller: Option<ControllerKind>,

    /// Name of the saved run; written to `<data-dir>/<output>.json`.
    #[arg(short, long, default_value = "run")]
    pub output: String,

    /// Directory run files are saved to.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Summarize a saved run file instead of simulating.
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Merges every override given on the command line on top of `figment`.
    pub fn merge_overrides(&self, mut figment: Figment) -> Figment {
        fn set<T: serde::Serialize>(figment: Figment, key: &str, value: Option<T>) -> Figment {
            match value {
                Some(v) => figment.merge(Serialized::default(key, v)),
                None => figment,
            }
        }

        figment = set(figment, "world.percent_obs_density", self.percent_obs_density);
        figment = set(figment, "simulation.end_time", self.end_time);
        figment = set(figment, "world.non_random_world", self.non_random_world);
        figment = set(figment, "world.circle_radius", self.circle_radius);
        figment = set(figment, "world.scale", self.world_scale);
        set(figment, "controller.kind", self.controller)
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
