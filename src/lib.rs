//! # repoconf
//!
//! Core library for reconciling YUM repository definitions against
//! INI-style `.repo` files, and for tracking which of those files are
//! under management so strays can be purged.
//!
//! ## Quick Example
//!
//! ```
//! use repoconf::definition::RepositoryDefinition;
//! use repoconf::reconcile::{reconcile, DesiredState, Request};
//!
//! let temp = tempfile::tempdir().unwrap();
//!
//! let mut definition = RepositoryDefinition::new("epel");
//! definition
//!     .set_scalar("baseurl", "https://download.example/epel")
//!     .set_scalar("name", "EPEL")
//!     .set_bool("gpgcheck", true);
//!
//! let outcome = reconcile(&Request {
//!     name: "epel".to_string(),
//!     definition: Some(definition),
//!     file: None,
//!     reposdir: temp.path().to_path_buf(),
//!     state: DesiredState::Present,
//!     dry_run: false,
//! }).unwrap();
//!
//! assert!(outcome.changed);
//! ```
//!
//! ## Core Concepts
//!
//! - **Definitions (`definition`)**: the immutable desired state for one
//!   repository section, with option coercion and allow-list rules.
//! - **Repo File Store (`repofile`)**: loads, mutates and deterministically
//!   serializes a whole `.repo` file; an empty document deletes its file.
//! - **Managed Ledger (`ledger`)**: the `.managed` sentinel file recording
//!   which repo files this tool owns, plus the sweep that deletes the rest.
//! - **Reconciliation (`reconcile`)**: the orchestrator that combines the
//!   two, detects change via serialized snapshots, and honors dry-run.
//!
//! Change detection is textual and deterministic: sections and keys are
//! serialized in sorted order, and a request changed something iff the
//! serialized document differs before and after.

pub mod defaults;
pub mod definition;
pub mod error;
pub mod ledger;
pub mod reconcile;
pub mod repofile;

pub use error::{Error, Result};
