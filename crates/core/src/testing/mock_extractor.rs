//! Mock tag extractor for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::extractor::{ExtractorError, TagExtractor, TagSet};

/// Mock implementation of the TagExtractor trait.
///
/// Provides controllable behavior for testing:
/// - Per-path tags, with an optional fallback for unknown paths
/// - Per-path failures
/// - Simulated probe latency
/// - Call count and peak concurrency for assertions
///
/// Clones share all state, so a clone kept by the test observes the calls
/// made through the one handed to the scheduler.
///
/// # Example
///
/// ```rust,ignore
/// use tagtoname_core::testing::MockTagExtractor;
///
/// let extractor = MockTagExtractor::new();
/// extractor.set_tags("/music/01.flac", fixtures::paradise_lost()).await;
/// extractor.set_failure("/music/broken.flac", "Invalid data found").await;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTagExtractor {
    /// Tags returned per path.
    tags: Arc<RwLock<HashMap<PathBuf, TagSet>>>,
    /// Tags returned for paths with no entry.
    default_tags: Arc<RwLock<Option<TagSet>>>,
    /// Probe failures per path.
    failures: Arc<RwLock<HashMap<PathBuf, String>>>,
    /// Simulated probe duration in milliseconds.
    delay_ms: Arc<RwLock<u64>>,
    calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockTagExtractor {
    /// Create a new mock extractor. Unknown paths fail until tags are set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tags returned for a path.
    pub async fn set_tags(&self, path: impl AsRef<Path>, tags: TagSet) {
        self.tags
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), tags);
    }

    /// Set the tags returned for any path without its own entry.
    pub async fn set_default_tags(&self, tags: TagSet) {
        *self.default_tags.write().await = Some(tags);
    }

    /// Make extraction fail for a path.
    pub async fn set_failure(&self, path: impl AsRef<Path>, reason: impl Into<String>) {
        self.failures
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), reason.into());
    }

    /// Set the simulated probe duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay_ms.write().await = delay.as_millis() as u64;
    }

    /// Number of `extract` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of concurrent `extract` calls observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn lookup(&self, path: &Path) -> Result<TagSet, ExtractorError> {
        if let Some(reason) = self.failures.read().await.get(path) {
            return Err(ExtractorError::probe_failed(reason.clone()));
        }
        if let Some(tags) = self.tags.read().await.get(path) {
            return Ok(tags.clone());
        }
        if let Some(tags) = self.default_tags.read().await.as_ref() {
            return Ok(tags.clone());
        }
        Err(ExtractorError::InputNotFound {
            path: path.to_path_buf(),
        })
    }
}

#[async_trait]
impl TagExtractor for MockTagExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(&self, path: &Path) -> Result<TagSet, ExtractorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = *self.delay_ms.read().await;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let result = self.lookup(path).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn validate(&self) -> Result<(), ExtractorError> {
        Ok(())
    }
}
