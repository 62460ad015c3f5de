//! Present command implementation
//!
//! Assembles an immutable [`RepositoryDefinition`] from the command-line
//! flags, merges the optional `--options-json` override map last (so a
//! JSON `null` can delete a key from the eventual section), and hands the
//! finished request to the reconciliation core.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use repoconf::defaults::default_reposdir;
use repoconf::definition::{is_list_option, RepositoryDefinition};
use repoconf::reconcile::{reconcile, DesiredState, Request};

use super::report;

/// Arguments for the present command
#[derive(Args, Debug)]
pub struct PresentArgs {
    /// Unique repository id, used as the section name
    pub name: String,

    /// Human readable description (written as the section's 'name' key)
    #[arg(short, long, value_name = "TEXT")]
    pub description: String,

    /// URL to the directory where the repository's repodata lives
    #[arg(long, value_name = "URL")]
    pub baseurl: Option<String>,

    /// URL to a file containing a list of base URLs
    #[arg(long, value_name = "URL")]
    pub mirrorlist: Option<String>,

    /// URL pointing to the gpg key for the repository
    #[arg(long, value_name = "URL")]
    pub gpgkey: Option<String>,

    /// Whether yum should use this repository
    #[arg(long, value_name = "BOOL")]
    pub enabled: Option<bool>,

    /// Whether yum should perform a GPG check on packages
    #[arg(long, value_name = "BOOL")]
    pub gpgcheck: Option<bool>,

    /// Relative priority of this repository
    #[arg(long, value_name = "N")]
    pub priority: Option<String>,

    /// Packages to exclude from updates or installs (repeatable)
    #[arg(long, value_name = "PKG")]
    pub exclude: Vec<String>,

    /// Packages usable from this repository only (repeatable)
    #[arg(long, value_name = "PKG")]
    pub includepkgs: Vec<String>,

    /// Set any allow-listed option as KEY=VALUE (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set_options: Vec<String>,

    /// JSON object of option overrides, merged last; null values delete keys
    #[arg(long, value_name = "JSON")]
    pub options_json: Option<String>,

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

/// Build the definition from the parsed arguments.
fn build_definition(args: &PresentArgs) -> Result<RepositoryDefinition> {
    let mut definition = RepositoryDefinition::new(args.name.as_str());
    definition.set_scalar("name", args.description.as_str());

    if let Some(baseurl) = &args.baseurl {
        definition.set_scalar("baseurl", baseurl.as_str());
    }
    if let Some(mirrorlist) = &args.mirrorlist {
        definition.set_scalar("mirrorlist", mirrorlist.as_str());
    }
    if let Some(gpgkey) = &args.gpgkey {
        definition.set_scalar("gpgkey", gpgkey.as_str());
    }
    if let Some(enabled) = args.enabled {
        definition.set_bool("enabled", enabled);
    }
    if let Some(gpgcheck) = args.gpgcheck {
        definition.set_bool("gpgcheck", gpgcheck);
    }
    if let Some(priority) = &args.priority {
        definition.set_scalar("priority", priority.as_str());
    }
    if !args.exclude.is_empty() {
        definition.set_list("exclude", args.exclude.clone());
    }
    if !args.includepkgs.is_empty() {
        definition.set_list("includepkgs", args.includepkgs.clone());
    }

    for pair in &args.set_options {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Invalid --set value '{}': expected KEY=VALUE", pair))?;
        if is_list_option(key) {
            definition.set_list(
                key,
                value.split_whitespace().map(str::to_string).collect(),
            );
        } else {
            definition.set_scalar(key, value);
        }
    }

    if let Some(raw) = &args.options_json {
        let parsed: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| anyhow::anyhow!("Invalid --options-json: {}", e))?;
        let map = parsed
            .as_object()
            .ok_or_else(|| anyhow::anyhow!("Invalid --options-json: expected a JSON object"))?;
        definition.merge_overrides(map);
    }

    Ok(definition)
}

/// Execute the `present` command.
pub fn execute(args: PresentArgs) -> Result<()> {
    let definition = build_definition(&args)?;

    // The core re-validates this; checking here gives a clean message
    // before any file is touched.
    if !definition.has_url_source() {
        anyhow::bail!("Parameter 'baseurl' or 'mirrorlist' is required for state 'present'");
    }

    let outcome = reconcile(&Request {
        name: args.name.clone(),
        definition: Some(definition),
        file: args.file.clone(),
        reposdir: args.reposdir.clone(),
        state: DesiredState::Present,
        dry_run: args.dry_run,
    })?;

    let human = format!(
        "repo '{}' present ({}){}",
        outcome.repo,
        if outcome.changed { "changed" } else { "unchanged" },
        if args.dry_run { " [dry-run]" } else { "" }
    );
    report(args.json, &outcome, &human)
}
