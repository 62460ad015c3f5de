//! Tracking command implementation
//!
//! Turns the managed-file ledger on or off. Enabling with an existing
//! non-empty ledger truncates it, which doubles as a tracking reset.

use anyhow::Result;
use clap::Args;
use clap::ValueEnum;
use serde::Serialize;
use std::path::PathBuf;

use repoconf::defaults::default_reposdir;
use repoconf::ledger::ManagedLedger;
use repoconf::reconcile::ensure_reposdir;

use super::report;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingMode {
    Enable,
    Disable,
}

/// Arguments for the tracking command
#[derive(Args, Debug)]
pub struct TrackingArgs {
    /// Whether to enable or disable tracking
    #[arg(value_enum)]
    pub mode: TrackingMode,

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

#[derive(Debug, Serialize)]
struct TrackingOutcome {
    changed: bool,
    state: &'static str,
}

/// Execute the `tracking` command.
pub fn execute(args: TrackingArgs) -> Result<()> {
    ensure_reposdir(&args.reposdir)?;
    let ledger = ManagedLedger::new(&args.reposdir, args.dry_run);

    let (changed, state) = match args.mode {
        TrackingMode::Enable => (ledger.enable()?, "enabled"),
        TrackingMode::Disable => (ledger.disable()?, "disabled"),
    };

    let outcome = TrackingOutcome { changed, state };
    let human = format!(
        "tracking {} ({}){}",
        state,
        if changed { "changed" } else { "unchanged" },
        if args.dry_run { " [dry-run]" } else { "" }
    );
    report(args.json, &outcome, &human)
}
