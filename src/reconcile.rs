//! Reconciliation orchestrator
//!
//! Ties the repo file store and the managed ledger together for one
//! request: load the document, mutate the target section toward the
//! desired state, detect change by comparing serialized snapshots, persist
//! only when something changed, and keep the ledger consistent with the
//! resulting file set.
//!
//! The two components stay independent; the only coupling lives here:
//! a `present` request registers the file id, and an `absent` request
//! unregisters it only once the repo file is actually gone from disk.
//!
//! There is no transactional guarantee across the document write and the
//! ledger update. If the first succeeds and the second fails the two are
//! left inconsistent and the error is reported as-is.

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::defaults::REPO_SUFFIX;
use crate::definition::RepositoryDefinition;
use crate::error::{Error, Result};
use crate::ledger::ManagedLedger;
use crate::repofile::ConfigDocument;

/// Desired terminal state of a repository definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    Present,
    Absent,
}

impl DesiredState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DesiredState::Present => "present",
            DesiredState::Absent => "absent",
        }
    }
}

/// One reconciliation request, assembled in full before the core runs.
#[derive(Debug)]
pub struct Request {
    /// Repository id; doubles as the section name.
    pub name: String,
    /// Desired section contents. Ignored for `Absent`.
    pub definition: Option<RepositoryDefinition>,
    /// File grouping without the `.repo` suffix. Defaults to the repo id.
    pub file: Option<String>,
    /// Directory holding the repo files and the ledger.
    pub reposdir: PathBuf,
    pub state: DesiredState,
    pub dry_run: bool,
}

/// Result reported back to the caller: the changed flag plus an echo of
/// the acted-upon repository and its terminal state.
#[derive(Debug, Serialize)]
pub struct Outcome {
    pub changed: bool,
    pub repo: String,
    pub state: DesiredState,
}

/// Reconcile one repository definition against its repo file.
pub fn reconcile(request: &Request) -> Result<Outcome> {
    ensure_reposdir(&request.reposdir)?;

    let file_id = request.file.clone().unwrap_or_else(|| request.name.clone());
    let dest = request
        .reposdir
        .join(format!("{}{}", file_id, REPO_SUFFIX));
    debug!("reconciling '{}' in '{}'", request.name, dest.display());

    let ledger = ManagedLedger::new(&request.reposdir, request.dry_run);
    let mut document = ConfigDocument::load(&dest)?;
    let before = document.serialize();

    match request.state {
        DesiredState::Present => {
            let definition = request.definition.as_ref().ok_or_else(|| {
                Error::validation("A repository definition is required for state 'present'")
            })?;
            document.apply(definition)?;
            ledger.add_entry(&file_id)?;
        }
        DesiredState::Absent => {
            document.remove(&request.name);
        }
    }

    let after = document.serialize();
    let changed = before != after;

    if changed && !request.dry_run {
        document.persist(&dest)?;
    }

    // The ledger only forgets a file once that file is really gone.
    if request.state == DesiredState::Absent && !dest.is_file() {
        ledger.remove_entry(&file_id)?;
    }

    if changed {
        info!(
            "repo '{}' is now {} in '{}'",
            request.name,
            request.state.as_str(),
            dest.display()
        );
    }

    Ok(Outcome {
        changed,
        repo: request.name.clone(),
        state: request.state,
    })
}

/// Fail early when the repository directory is missing.
pub fn ensure_reposdir(reposdir: &Path) -> Result<()> {
    if !reposdir.is_dir() {
        return Err(Error::io(
            reposdir,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "repo directory does not exist",
            ),
        ));
    }
    Ok(())
}
