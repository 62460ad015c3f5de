//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// repoconf - Add, remove and track YUM repository definitions
#[derive(Parser, Debug)]
#[command(name = "repoconf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update a repository definition in a .repo file
    Present(commands::present::PresentArgs),

    /// Remove a repository definition from a .repo file
    Absent(commands::absent::AbsentArgs),

    /// Enable or disable tracking of managed repo files
    Tracking(commands::tracking::TrackingArgs),

    /// Delete repo files that are not tracked as managed
    Purge(commands::purge::PurgeArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(&self.log_level),
        )
        .init();

        match self.command {
            Commands::Present(args) => commands::present::execute(args),
            Commands::Absent(args) => commands::absent::execute(args),
            Commands::Tracking(args) => commands::tracking::execute(args),
            Commands::Purge(args) => commands::purge::execute(args),
        }
    }
}
