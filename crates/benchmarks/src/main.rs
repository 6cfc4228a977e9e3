//! Command-line entry point for kernelduel.

use anyhow::Result;
use clap::Parser;
use kernelduel_harness::cli::{run_cli, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    run_cli(cli)
}
