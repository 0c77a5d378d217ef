//! Error types for the naming module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while computing a destination.
#[derive(Debug, Error)]
pub enum NamingError {
    /// None of the wanted tags produced a usable name.
    #[error("Failed because '{}' is missing all tags", path.display())]
    AllTagsMissing { path: PathBuf },
}
