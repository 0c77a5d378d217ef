//! Error types for the extractor module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading tags from a media file.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// FFprobe binary not found.
    #[error("FFprobe not found at path: {}", path.display())]
    FfprobeNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// The prober ran but rejected the file.
    #[error("Failed to probe media file: {reason}")]
    ProbeFailed { reason: String },

    /// Probing took longer than the configured limit.
    #[error("Probe timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Failed to parse FFprobe output.
    #[error("Failed to parse media info: {reason}")]
    ParseError { reason: String },

    /// I/O error while probing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractorError {
    /// Creates a new probe failed error.
    pub fn probe_failed(reason: impl Into<String>) -> Self {
        Self::ProbeFailed {
            reason: reason.into(),
        }
    }
}
