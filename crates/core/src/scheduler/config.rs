//! Configuration for the scheduler module.

use serde::{Deserialize, Serialize};

/// Configuration for the job scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum jobs in flight at once. `0` uses the number of available CPUs.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_jobs: usize,

    /// Capacity of the event channel handed to the caller.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,

    /// Glob patterns; matching paths are never scheduled.
    #[serde(default)]
    pub ignore: Vec<String>,
}

fn default_max_concurrent() -> usize {
    4
}

fn default_event_buffer() -> usize {
    256
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: default_max_concurrent(),
            event_buffer: default_event_buffer(),
            ignore: Vec::new(),
        }
    }
}

impl SchedulerConfig {
    /// Sets the concurrency limit.
    pub fn with_max_concurrent_jobs(mut self, max: usize) -> Self {
        self.max_concurrent_jobs = max;
        self
    }

    /// Adds an ignore pattern.
    pub fn with_ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignore.push(pattern.into());
        self
    }

    /// The concurrency limit actually applied.
    pub fn effective_concurrency(&self) -> usize {
        if self.max_concurrent_jobs > 0 {
            return self.max_concurrent_jobs;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// Compiles the ignore patterns.
    pub fn ignore_patterns(&self) -> Result<Vec<glob::Pattern>, glob::PatternError> {
        self.ignore.iter().map(|p| glob::Pattern::new(p)).collect()
    }
}
