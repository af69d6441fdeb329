// segworld_sim/src/main.rs

use clap::Parser;
use segworld_sim::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    segworld_sim::init_logging(&cli)?;
    tracing::info!("segworld v{}", env!("CARGO_PKG_VERSION"));
    segworld_sim::run(&cli)
}
