//! Default values and well-known names used across commands.

use std::path::PathBuf;

/// File extension of repository definition files, including the dot.
pub const REPO_SUFFIX: &str = ".repo";

/// Basename of the ledger file that records which repo files are managed.
pub const LEDGER_FILE_NAME: &str = ".managed";

/// Returns the default repository directory.
///
/// This is the standard location on RPM-based distributions. It can be
/// overridden by the `--reposdir` CLI flag or the `REPOCONF_REPOSDIR`
/// environment variable.
pub fn default_reposdir() -> PathBuf {
    PathBuf::from("/etc/yum.repos.d")
}
