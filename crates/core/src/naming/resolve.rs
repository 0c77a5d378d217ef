//! Destination resolution: tags in, new path out.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::extractor::TagSet;

use super::config::{MissingTagsPolicy, NamingConfig};
use super::error::NamingError;
use super::slug::{Slugifier, StandardSlugifier};
use super::synthesize::synthesize;

/// Computes the path a file should be renamed to.
///
/// The result depends only on the old path, the tags and the configuration,
/// so resolving the same input twice always yields the same destination.
pub struct DestinationResolver<S: Slugifier = StandardSlugifier> {
    config: NamingConfig,
    slugifier: S,
}

impl DestinationResolver<StandardSlugifier> {
    /// Creates a resolver using the standard slugifier.
    pub fn new(config: NamingConfig) -> Self {
        Self::with_slugifier(config, StandardSlugifier)
    }
}

impl<S: Slugifier> DestinationResolver<S> {
    /// Creates a resolver with a custom slug transform.
    pub fn with_slugifier(config: NamingConfig, slugifier: S) -> Self {
        Self { config, slugifier }
    }

    /// The naming configuration in use.
    pub fn config(&self) -> &NamingConfig {
        &self.config
    }

    /// Builds the pre-slug candidate name from `tags`.
    pub fn candidate(&self, tags: &TagSet) -> String {
        synthesize(tags, &self.config.tags, &self.config.separator)
    }

    /// Turns a candidate name into the destination for `old_path`.
    pub fn resolve(&self, old_path: &Path, candidate: &str) -> Result<PathBuf, NamingError> {
        let slug = self.slugifier.slugify(candidate, self.config.keep_case);
        let extension = extension_of(old_path);

        if slug.is_empty()
            && (self.config.missing_tags == MissingTagsPolicy::Fail || extension.is_none())
        {
            return Err(NamingError::AllTagsMissing {
                path: old_path.to_path_buf(),
            });
        }

        let mut file_name = OsString::from(slug);
        if let Some(extension) = extension {
            file_name.push(".");
            file_name.push(extension);
        }

        let directory = old_path.parent().unwrap_or_else(|| Path::new(""));
        Ok(directory.join(file_name))
    }

    /// Candidate synthesis and resolution in one step.
    pub fn destination_for(&self, old_path: &Path, tags: &TagSet) -> Result<PathBuf, NamingError> {
        let candidate = self.candidate(tags);
        self.resolve(old_path, &candidate)
    }
}

/// The extension of `path`. A name that is only `.ext` (what an
/// extension-only rename produces) counts as having extension `ext`.
fn extension_of(path: &Path) -> Option<&OsStr> {
    path.extension().or_else(|| {
        let bare = path.file_name()?.to_str()?.strip_prefix('.')?;
        (!bare.is_empty() && !bare.contains('.')).then(|| OsStr::new(bare))
    })
}
