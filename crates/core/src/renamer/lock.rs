//! Cross-process advisory locks keyed on a rename destination.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::config::LockConfig;
use super::error::LockError;

/// Derives the lock identifier for a destination: `<dir>/<file name>.lock`.
pub fn lock_path_for(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".lock");
    match destination.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Proof of a held lock. Pass it back to [`AdvisoryLock::release`].
///
/// A handle dropped without being released (e.g. when its task panics)
/// removes its marker on a best-effort basis.
#[derive(Debug)]
pub struct LockHandle {
    path: PathBuf,
    released: bool,
}

impl LockHandle {
    /// Wraps a lock identifier that has just been acquired.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            released: false,
        }
    }

    /// The lock identifier.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Marks the handle released so dropping it does nothing.
    pub fn disarm(mut self) -> PathBuf {
        self.released = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for LockHandle {
    fn drop(&mut self) {
        if !self.released {
            debug!("Releasing abandoned lock: {}", self.path.display());
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Mutual exclusion between renamers that target the same destination,
/// including renamers in other processes.
#[async_trait]
pub trait AdvisoryLock: Send + Sync {
    /// Returns the name of this lock backend.
    fn name(&self) -> &str;

    /// Blocks until the lock identified by `path` is held.
    async fn acquire(&self, path: &Path) -> Result<LockHandle, LockError>;

    /// Releases a held lock.
    async fn release(&self, handle: LockHandle) -> Result<(), LockError>;
}

#[derive(Serialize)]
struct MarkerContents {
    pid: u32,
    acquired_at: String,
}

/// Lock backend using exclusive-create marker files.
///
/// Creating the marker with `O_CREAT | O_EXCL` succeeds for exactly one
/// contender; the others poll until the marker is removed or the wait
/// period ends.
pub struct MarkerFileLock {
    config: LockConfig,
}

impl MarkerFileLock {
    /// Creates a marker-file lock with the given configuration.
    pub fn new(config: LockConfig) -> Self {
        Self { config }
    }

    /// Creates a marker-file lock with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(LockConfig::default())
    }

    /// Removes `path` if it is older than the stale threshold.
    async fn clear_if_stale(&self, path: &Path) -> bool {
        let Some(stale_after) = self.config.stale_after() else {
            return false;
        };
        let Ok(modified) = fs::metadata(path).await.and_then(|m| m.modified()) else {
            return false;
        };
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or_default();
        if age < stale_after {
            return false;
        }

        warn!(
            "Removing stale lock {} ({} ms old)",
            path.display(),
            age.as_millis()
        );
        match fs::remove_file(path).await {
            Ok(()) => true,
            Err(e) => e.kind() == ErrorKind::NotFound,
        }
    }

    async fn write_marker(file: &mut fs::File, path: &Path) {
        let contents = MarkerContents {
            pid: std::process::id(),
            acquired_at: Utc::now().to_rfc3339(),
        };
        let written = match serde_json::to_vec(&contents) {
            Ok(payload) => file.write_all(&payload).await,
            Err(e) => Err(std::io::Error::new(ErrorKind::InvalidData, e)),
        };
        if let Err(e) = written {
            // The marker's existence is the lock; its contents are informational.
            debug!("Failed to write lock contents {}: {}", path.display(), e);
        }
    }
}

#[async_trait]
impl AdvisoryLock for MarkerFileLock {
    fn name(&self) -> &str {
        "marker-file"
    }

    async fn acquire(&self, path: &Path) -> Result<LockHandle, LockError> {
        let start = Instant::now();
        let mut created_parent = false;

        loop {
            let attempt = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .await;

            match attempt {
                Ok(mut file) => {
                    Self::write_marker(&mut file, path).await;
                    debug!("Acquired lock {}", path.display());
                    return Ok(LockHandle::new(path.to_path_buf()));
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if self.clear_if_stale(path).await {
                        continue;
                    }
                    let waited = start.elapsed();
                    if waited >= self.config.wait() {
                        return Err(LockError::Held {
                            path: path.to_path_buf(),
                            waited_ms: waited.as_millis() as u64,
                        });
                    }
                    tokio::time::sleep(self.config.poll_interval()).await;
                }
                Err(e) if e.kind() == ErrorKind::NotFound && !created_parent => {
                    let parent = path.parent().unwrap_or_else(|| Path::new("."));
                    fs::create_dir_all(parent).await.map_err(|error| {
                        LockError::DirectoryCreationFailed {
                            path: parent.to_path_buf(),
                            error,
                        }
                    })?;
                    debug!("Created lock directory {}", parent.display());
                    created_parent = true;
                }
                Err(error) => {
                    return Err(LockError::CreateFailed {
                        path: path.to_path_buf(),
                        error,
                    });
                }
            }
        }
    }

    async fn release(&self, handle: LockHandle) -> Result<(), LockError> {
        let path = handle.disarm();
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Released lock {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(LockError::ReleaseFailed { path, error }),
        }
    }
}
