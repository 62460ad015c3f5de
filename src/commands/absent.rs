//! Absent command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use repoconf::defaults::default_reposdir;
use repoconf::reconcile::{reconcile, DesiredState, Request};

use super::report;

/// Arguments for the absent command
#[derive(Args, Debug)]
pub struct AbsentArgs {
    /// Unique repository id, used as the section name
    pub name: String,

    /// Repo file name without the .repo suffix (defaults to the repo id)
    #[arg(long, value_name = "NAME")]
    pub file: Option<String>,

    /// Directory holding the .repo files
    #[arg(long, value_name = "DIR", env = "REPOCONF_REPOSDIR", default_value_os_t = default_reposdir())]
    pub reposdir: PathBuf,

    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the `absent` command.
pub fn execute(args: AbsentArgs) -> Result<()> {
    let outcome = reconcile(&Request {
        name: args.name.clone(),
        definition: None,
        file: args.file.clone(),
        reposdir: args.reposdir.clone(),
        state: DesiredState::Absent,
        dry_run: args.dry_run,
    })?;

    let human = format!(
        "repo '{}' absent ({}){}",
        outcome.repo,
        if outcome.changed { "changed" } else { "unchanged" },
        if args.dry_run { " [dry-run]" } else { "" }
    );
    report(args.json, &outcome, &human)
}
