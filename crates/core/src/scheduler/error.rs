//! Job-level error taxonomy.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::naming::NamingError;
use crate::renamer::RenameError;

/// Why a single job failed. Never aborts the run.
#[derive(Debug, Error)]
pub enum JobError {
    /// Tags could not be read from the file.
    #[error("Could not read metadata from '{}': {reason}", path.display())]
    MetadataUnreadable { path: PathBuf, reason: String },

    /// None of the wanted tags produced a usable name.
    #[error("Failed because '{}' is missing all tags", path.display())]
    AllTagsMissing { path: PathBuf },

    /// The collision-safe rename failed.
    #[error(transparent)]
    Rename(#[from] RenameError),

    /// The job's path is not usable.
    #[error("Invalid input: {reason}")]
    InvalidInput { path: PathBuf, reason: String },

    /// The task processing the job panicked.
    #[error("Worker panicked: {reason}")]
    WorkerPanicked { path: PathBuf, reason: String },
}

/// Flat classification of [`JobError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MetadataUnreadable,
    AllTagsMissing,
    WouldOverwrite,
    LockFailure,
    RenameFailure,
    InvalidInput,
    Internal,
}

impl JobError {
    /// Creates an invalid input error.
    pub fn invalid_input(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MetadataUnreadable { .. } => ErrorKind::MetadataUnreadable,
            Self::AllTagsMissing { .. } => ErrorKind::AllTagsMissing,
            Self::Rename(RenameError::WouldOverwrite { .. }) => ErrorKind::WouldOverwrite,
            Self::Rename(RenameError::LockFailure { .. }) => ErrorKind::LockFailure,
            Self::Rename(RenameError::RenameFailure { .. }) => ErrorKind::RenameFailure,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::WorkerPanicked { .. } => ErrorKind::Internal,
        }
    }
}

impl From<NamingError> for JobError {
    fn from(err: NamingError) -> Self {
        match err {
            NamingError::AllTagsMissing { path } => Self::AllTagsMissing { path },
        }
    }
}
