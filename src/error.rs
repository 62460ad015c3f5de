//! # Error Handling
//!
//! Centralized error handling for `repoconf`, built on `thiserror`.
//!
//! Every failure mode of the library surfaces as one of three variants:
//!
//! - **`Validation`**: the requested repository definition is structurally
//!   incomplete (e.g. neither `baseurl` nor `mirrorlist` supplied when
//!   creating a repository).
//! - **`Io`**: a filesystem operation failed. Always carries the offending
//!   path plus the underlying `std::io::Error` so the system message
//!   (permission denied, no such directory, disk full) reaches the user.
//! - **`Syntax`**: an existing repo file could not be parsed as sectioned
//!   key/value text. Corrupt files are reported, never silently ignored.
//!
//! Errors are surfaced synchronously to the caller; nothing is retried and
//! no rollback of already-applied in-memory mutations is attempted.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for repoconf operations
#[derive(Error, Debug)]
pub enum Error {
    /// The requested definition is missing a required field combination.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A filesystem operation failed on the given path.
    ///
    /// Covers open/read/write/delete/truncate failures on both the repo
    /// file and the ledger file, and a missing repository directory.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An existing repo file is not valid sectioned key/value text.
    #[error("Syntax error in '{}' at line {line}: {message}", path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl Error {
    /// Wrap an `std::io::Error` with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
