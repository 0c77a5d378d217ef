//! Collision-safe rename.

use std::fs::Metadata;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use super::config::RenamerConfig;
use super::error::RenameError;
use super::lock::{lock_path_for, AdvisoryLock, MarkerFileLock};

/// Result of a rename that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameStatus {
    /// The file now lives at this path (or would, in a dry run).
    Renamed(PathBuf),
    /// The file already had the right name.
    Unchanged(PathBuf),
}

/// Renames files without ever replacing an existing one.
///
/// The destination is checked once up front, then again while holding the
/// destination's advisory lock, so two renamers racing for the same name
/// (in this process or another) cannot both succeed.
pub struct SafeRenamer<L: AdvisoryLock = MarkerFileLock> {
    lock: L,
    noop: bool,
}

impl SafeRenamer<MarkerFileLock> {
    /// Creates a renamer backed by marker-file locks.
    pub fn new(config: RenamerConfig) -> Self {
        Self::with_lock(MarkerFileLock::new(config.lock), config.noop)
    }
}

impl<L: AdvisoryLock> SafeRenamer<L> {
    /// Creates a renamer with a custom lock backend.
    pub fn with_lock(lock: L, noop: bool) -> Self {
        Self { lock, noop }
    }

    /// Whether this renamer only simulates.
    pub fn is_noop(&self) -> bool {
        self.noop
    }

    /// Moves `from` to `to` unless that would replace another file.
    pub async fn rename(&self, from: &Path, to: &Path) -> Result<RenameStatus, RenameError> {
        if from == to {
            debug!("{} already named correctly", from.display());
            return Ok(RenameStatus::Unchanged(from.to_path_buf()));
        }

        self.ensure_vacant(from, to).await?;

        if self.noop {
            debug!("Dry run: {} -> {}", from.display(), to.display());
            return Ok(RenameStatus::Renamed(to.to_path_buf()));
        }

        let lock_path = lock_path_for(to);
        let handle =
            self.lock
                .acquire(&lock_path)
                .await
                .map_err(|error| RenameError::LockFailure {
                    to: to.to_path_buf(),
                    error,
                })?;

        let result = self.rename_locked(from, to).await;

        if let Err(e) = self.lock.release(handle).await {
            warn!("{}", e);
        }

        result?;
        info!("Renamed {} -> {}", from.display(), to.display());
        Ok(RenameStatus::Renamed(to.to_path_buf()))
    }

    async fn rename_locked(&self, from: &Path, to: &Path) -> Result<(), RenameError> {
        // Another renamer may have claimed the name since the first check.
        self.ensure_vacant(from, to).await?;

        fs::rename(from, to)
            .await
            .map_err(|e| RenameError::rename_failed(from.to_path_buf(), to.to_path_buf(), e))
    }

    /// Fails with `WouldOverwrite` if `to` is taken by anything but `from`.
    async fn ensure_vacant(&self, from: &Path, to: &Path) -> Result<(), RenameError> {
        let existing = match fs::symlink_metadata(to).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(RenameError::rename_failed(
                    from.to_path_buf(),
                    to.to_path_buf(),
                    e,
                ))
            }
        };

        // Case-only renames on case-insensitive filesystems see the source
        // here. A hard link with a different name is a real occupant.
        if differ_only_by_case(from, to) {
            if let Ok(source) = fs::symlink_metadata(from).await {
                if same_file(&source, &existing) {
                    return Ok(());
                }
            }
        }

        Err(RenameError::WouldOverwrite {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        })
    }
}

fn differ_only_by_case(a: &Path, b: &Path) -> bool {
    a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
}

#[cfg(unix)]
fn same_file(a: &Metadata, b: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_file(_a: &Metadata, _b: &Metadata) -> bool {
    false
}
