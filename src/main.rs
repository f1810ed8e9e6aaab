//! tca CLI: build a trigram atlas for a directory.

use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use tca::engine::arg_parser::Cli;
use tca::engine::handle_run;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
