//! # repoconf CLI
//!
//! Binary entry point for the `repoconf` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Initializing logging from the `--log-level` flag.
//! - Executing the appropriate command based on the parsed arguments.
//!
//! The core application logic lives in the library crate; the binary is a
//! thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
