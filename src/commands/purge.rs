//! Purge command implementation
//!
//! Deletes every `.repo` file in the repository directory that is neither
//! recorded in the ledger nor explicitly exempted. A no-op while tracking
//! is disabled.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use repoconf::defaults::default_reposdir;
use repoconf::ledger::ManagedLedger;
use repoconf::reconcile::ensure_reposdir;

use super::report;

/// Arguments for the purge command
#[derive(Args, Debug)]
pub struct PurgeArgs {
    /// Directory holding the .repo files
    #[arg(long, value_name = "DIR", env = "REPOCONF_REPOSDIR", default_value_os_t = default_reposdir())]
    pub reposdir: PathBuf,

    /// Repo file ids to leave alone even when unmanaged (repeatable)
    #[arg(long, value_name = "ID")]
    pub exempt: Vec<String>,

    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct PurgeOutcome {
    changed: bool,
    state: &'static str,
}

/// Execute the `purge` command.
pub fn execute(args: PurgeArgs) -> Result<()> {
    ensure_reposdir(&args.reposdir)?;
    let ledger = ManagedLedger::new(&args.reposdir, args.dry_run);

    let changed = ledger.sweep(&args.reposdir, &args.exempt)?;

    let outcome = PurgeOutcome {
        changed,
        state: "purged",
    };
    let human = format!(
        "purge of '{}' ({}){}",
        args.reposdir.display(),
        if changed { "changed" } else { "unchanged" },
        if args.dry_run { " [dry-run]" } else { "" }
    );
    report(args.json, &outcome, &human)
}
