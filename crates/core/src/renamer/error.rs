//! Error types for the renamer module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from acquiring or releasing a destination lock.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another renamer kept the lock for the whole wait period.
    #[error("Lock {} still held after {waited_ms} ms", path.display())]
    Held { path: PathBuf, waited_ms: u64 },

    /// The lock's directory was missing and could not be created.
    #[error("Failed to create lock directory {}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// The marker could not be created for a reason other than contention.
    #[error("Failed to create lock {}: {error}", path.display())]
    CreateFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// The marker could not be removed.
    #[error("Failed to release lock {}: {error}", path.display())]
    ReleaseFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
}

/// Errors that end a single rename.
#[derive(Debug, Error)]
pub enum RenameError {
    /// The destination is taken by a different file.
    #[error("Failed because '{}' already exists (renaming '{}')", to.display(), from.display())]
    WouldOverwrite { from: PathBuf, to: PathBuf },

    /// The destination lock could not be acquired.
    #[error("Could not lock '{}': {error}", to.display())]
    LockFailure {
        to: PathBuf,
        #[source]
        error: LockError,
    },

    /// The rename syscall failed.
    #[error("Failed to rename '{}' to '{}': {error}", from.display(), to.display())]
    RenameFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: std::io::Error,
    },
}

impl RenameError {
    /// Creates a rename failed error.
    pub fn rename_failed(from: PathBuf, to: PathBuf, error: std::io::Error) -> Self {
        Self::RenameFailure { from, to, error }
    }
}
