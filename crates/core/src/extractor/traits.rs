//! Trait definitions for the extractor module.

use async_trait::async_trait;
use std::path::Path;

use super::error::ExtractorError;
use super::types::TagSet;

/// Reads metadata tags from media files.
#[async_trait]
pub trait TagExtractor: Send + Sync {
    /// Returns the name of this extractor implementation.
    fn name(&self) -> &str;

    /// Reads the tags embedded in the file at `path`.
    async fn extract(&self, path: &Path) -> Result<TagSet, ExtractorError>;

    /// Validates that the extractor is properly configured and ready.
    async fn validate(&self) -> Result<(), ExtractorError>;
}
