//! Types for the scheduler module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::error::{ErrorKind, JobError};
use crate::renamer::RenameStatus;

/// A path to process: a file to rename or a directory to expand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Job {
    /// Path as given (or as discovered while expanding a directory).
    pub path: PathBuf,
}

impl Job {
    /// Creates a job for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Final result of a file job.
#[derive(Debug)]
pub enum Outcome {
    /// Moved to (or, in a dry run, would be moved to) this path.
    Renamed(PathBuf),
    /// Already correctly named.
    Unchanged(PathBuf),
    /// The job failed; the file was left where it was.
    Failed { path: PathBuf, error: JobError },
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// The error kind, for failures.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Failed { error, .. } => Some(error.kind()),
            _ => None,
        }
    }
}

impl From<RenameStatus> for Outcome {
    fn from(status: RenameStatus) -> Self {
        match status {
            RenameStatus::Renamed(path) => Self::Renamed(path),
            RenameStatus::Unchanged(path) => Self::Unchanged(path),
        }
    }
}

/// A job together with how it ended.
#[derive(Debug)]
pub struct JobReport {
    pub job: Job,
    pub outcome: Outcome,
}

/// Counts for a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Identifier of the run, for correlating log lines.
    pub run_id: Uuid,
    pub renamed: usize,
    pub unchanged: usize,
    pub failed: usize,
    /// Directories expanded into child jobs.
    pub directories_expanded: usize,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
}

impl RunSummary {
    /// Creates an empty summary.
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            renamed: 0,
            unchanged: 0,
            failed: 0,
            directories_expanded: 0,
            duration_ms: 0,
        }
    }

    /// Counts one outcome.
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Renamed(_) => self.renamed += 1,
            Outcome::Unchanged(_) => self.unchanged += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
    }

    /// Total outcomes emitted.
    pub fn total(&self) -> usize {
        self.renamed + self.unchanged + self.failed
    }

    /// Whether every job succeeded.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Event delivered to the caller while a run progresses.
#[derive(Debug)]
pub enum RunEvent {
    /// A file job finished.
    Outcome(JobReport),
    /// All jobs (including those discovered in directories) are finished.
    /// Always the last event of a run.
    Done(RunSummary),
}

/// Everything a run produced, gathered by [`RunHandle::collect`](super::RunHandle::collect).
#[derive(Debug)]
pub struct RunReport {
    /// Outcomes in the order they were emitted.
    pub reports: Vec<JobReport>,
    pub summary: RunSummary,
}

impl RunReport {
    /// Reports for failed jobs.
    pub fn failures(&self) -> impl Iterator<Item = &JobReport> {
        self.reports.iter().filter(|r| r.outcome.is_failure())
    }

    /// Finds the report for a job path.
    pub fn for_path(&self, path: &Path) -> Option<&JobReport> {
        self.reports.iter().find(|r| r.job.path == path)
    }
}
