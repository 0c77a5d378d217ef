//! Configuration for the renamer module.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long and how often to wait for a destination lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    /// Give up on a held lock after this many milliseconds.
    ///
    /// Waiting is bounded: a marker still present after `wait_ms` fails the
    /// rename with `LockFailure` rather than blocking until it is released.
    #[serde(default = "default_wait_ms")]
    pub wait_ms: u64,

    /// Delay between attempts on a held lock, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Markers older than this are left over from a crashed process and get
    /// removed. Unset means markers never go stale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale_ms: Option<u64>,
}

fn default_wait_ms() -> u64 {
    10_000
}

fn default_poll_interval_ms() -> u64 {
    50
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            wait_ms: default_wait_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            stale_ms: None,
        }
    }
}

impl LockConfig {
    /// Sets how long to wait on a held lock.
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait_ms = wait.as_millis() as u64;
        self
    }

    /// Sets the polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Treats markers older than `age` as stale.
    pub fn with_stale_after(mut self, age: Duration) -> Self {
        self.stale_ms = Some(age.as_millis() as u64);
        self
    }

    pub(crate) fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }

    pub(crate) fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub(crate) fn stale_after(&self) -> Option<Duration> {
        self.stale_ms.map(Duration::from_millis)
    }
}

/// Configuration for the collision-safe renamer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenamerConfig {
    /// Dry run: report destinations without touching the filesystem.
    #[serde(default)]
    pub noop: bool,

    /// Destination lock settings.
    #[serde(default)]
    pub lock: LockConfig,
}

impl RenamerConfig {
    /// Enables or disables dry-run mode.
    pub fn with_noop(mut self, noop: bool) -> Self {
        self.noop = noop;
        self
    }

    /// Replaces the lock settings.
    pub fn with_lock(mut self, lock: LockConfig) -> Self {
        self.lock = lock;
        self
    }
}
