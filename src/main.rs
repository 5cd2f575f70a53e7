//! # seebeck-reduce
//!
//! Command-line front end for reducing Seebeck rig records.
//!
//! ## Usage
//!
//! ```bash
//! # Reduce a batch of room temperature runs into ./out
//! seebeck-reduce reduce --variant room-temperature -o out runs/*.txt
//!
//! # Show segments and fits without writing anything
//! seebeck-reduce -v inspect runs/run_01.txt
//!
//! # Print the column layout of a variant as TOML
//! seebeck-reduce layout --variant continuous
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
