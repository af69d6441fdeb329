// segworld_sim/src/lib.rs

pub mod cli;
pub mod simulation;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::cli::Cli;

/// Installs the global log subscriber at the level the command line asks for.
pub fn init_logging(cli: &Cli) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level())
        .with_target(cli.verbose > 0)
        .with_file(false)
        .with_line_number(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Entry point shared by the binary: either replay a saved run or simulate a new one.
pub fn run(cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.load {
        simulation::summarize_saved_run(path)?;
        return Ok(());
    }

    let outcome = simulation::run_batch(cli)?;
    info!(
        "Done: {} runs, {} collisions, final index {}. Saved to {}",
        outcome.summary.runs,
        outcome.summary.collisions,
        outcome.summary.final_counter,
        outcome.saved_to.display()
    );
    Ok(())
}
