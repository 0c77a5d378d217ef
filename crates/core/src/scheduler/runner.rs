//! Scheduler implementation.
//!
//! One coordinator task per run owns the work queue and the set of in-flight
//! jobs. Workers never touch the queue: a directory worker hands its
//! children back to the coordinator, a file worker hands back an outcome.

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, Stream};
use glob::Pattern;
use tokio::fs;
use tokio::sync::mpsc;
use tokio::task::{self, JoinError, JoinSet};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{Config, ConfigError};
use crate::extractor::{ExtractorError, TagExtractor};
use crate::naming::{DestinationResolver, Slugifier, StandardSlugifier};
use crate::renamer::{AdvisoryLock, MarkerFileLock, RenameStatus, SafeRenamer};

use super::config::SchedulerConfig;
use super::error::JobError;
use super::types::{Job, JobReport, Outcome, RunEvent, RunReport, RunSummary};

/// What a worker hands back to the coordinator.
enum JobResult {
    /// The job was a directory; these are its children.
    Expanded(Vec<Job>),
    /// The job was a file and is finished.
    Finished(Outcome),
}

/// The per-file pipeline shared by all workers of a scheduler.
struct Worker<E, L, S>
where
    E: TagExtractor,
    L: AdvisoryLock,
    S: Slugifier,
{
    extractor: E,
    resolver: DestinationResolver<S>,
    renamer: SafeRenamer<L>,
    ignore: Vec<Pattern>,
}

impl<E, L, S> Worker<E, L, S>
where
    E: TagExtractor,
    L: AdvisoryLock,
    S: Slugifier,
{
    async fn process(&self, job: &Job) -> JobResult {
        let path = job.path();

        let is_dir = match self.inspect(path).await {
            Ok(is_dir) => is_dir,
            Err(error) => return failed(path, error),
        };

        if is_dir {
            return match self.expand(path).await {
                Ok(children) => JobResult::Expanded(children),
                Err(e) => failed(
                    path,
                    JobError::invalid_input(path, format!("could not list directory: {}", e)),
                ),
            };
        }

        match self.rename_file(path).await {
            Ok(status) => JobResult::Finished(status.into()),
            Err(error) => failed(path, error),
        }
    }

    /// Returns whether `path` is a directory to expand. Symlinks are not followed.
    async fn inspect(&self, path: &Path) -> Result<bool, JobError> {
        if path.as_os_str().is_empty() {
            return Err(JobError::invalid_input(path, "empty path"));
        }
        let meta = fs::symlink_metadata(path)
            .await
            .map_err(|e| JobError::invalid_input(path, e.to_string()))?;
        Ok(meta.is_dir())
    }

    async fn expand(&self, dir: &Path) -> std::io::Result<Vec<Job>> {
        let mut entries = fs::read_dir(dir).await?;
        let mut children = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if is_lock_marker(&path) || self.is_ignored(&path) {
                debug!("Skipping {}", path.display());
                continue;
            }
            children.push(path);
        }
        children.sort();
        debug!("Expanded {} into {} job(s)", dir.display(), children.len());
        Ok(children.into_iter().map(Job::new).collect())
    }

    async fn rename_file(&self, path: &Path) -> Result<RenameStatus, JobError> {
        let tags = self
            .extractor
            .extract(path)
            .await
            .map_err(|e| metadata_unreadable(path, e))?;
        debug!("Read {} tag(s) from {}", tags.len(), path.display());

        let destination = self.resolver.destination_for(path, &tags)?;
        debug!("Resolved {} -> {}", path.display(), destination.display());

        Ok(self.renamer.rename(path, &destination).await?)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let file_name = path.file_name().map(|n| n.to_string_lossy());
        self.ignore.iter().any(|pattern| {
            pattern.matches_path(path)
                || file_name
                    .as_deref()
                    .is_some_and(|name| pattern.matches(name))
        })
    }
}

fn failed(path: &Path, error: JobError) -> JobResult {
    JobResult::Finished(Outcome::Failed {
        path: path.to_path_buf(),
        error,
    })
}

fn metadata_unreadable(path: &Path, error: ExtractorError) -> JobError {
    JobError::MetadataUnreadable {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}

fn is_lock_marker(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "lock")
}

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Drives one run from the first job to `Done`.
struct Coordinator<E, L, S>
where
    E: TagExtractor,
    L: AdvisoryLock,
    S: Slugifier,
{
    worker: Arc<Worker<E, L, S>>,
    queue: VecDeque<Job>,
    limit: usize,
    events: mpsc::Sender<RunEvent>,
    summary: RunSummary,
}

impl<E, L, S> Coordinator<E, L, S>
where
    E: TagExtractor + 'static,
    L: AdvisoryLock + 'static,
    S: Slugifier + 'static,
{
    async fn drive(mut self) {
        let started = Instant::now();
        let mut in_flight: JoinSet<JobResult> = JoinSet::new();
        let mut jobs_by_task: HashMap<task::Id, Job> = HashMap::new();

        loop {
            while in_flight.len() < self.limit {
                let Some(job) = self.queue.pop_front() else {
                    break;
                };
                let worker = Arc::clone(&self.worker);
                let task_job = job.clone();
                let handle = in_flight.spawn(async move { worker.process(&task_job).await });
                jobs_by_task.insert(handle.id(), job);
            }

            let Some(joined) = in_flight.join_next_with_id().await else {
                break;
            };

            match joined {
                Ok((id, result)) => {
                    if let Some(job) = jobs_by_task.remove(&id) {
                        self.handle_result(job, result).await;
                    }
                }
                Err(err) => {
                    if let Some(job) = jobs_by_task.remove(&err.id()) {
                        self.handle_panic(job, err).await;
                    }
                }
            }
        }

        self.summary.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            "Run {} finished: {} renamed, {} unchanged, {} failed",
            self.summary.run_id, self.summary.renamed, self.summary.unchanged, self.summary.failed
        );
        // The receiver may already be gone; there is nobody left to tell.
        let _ = self.events.send(RunEvent::Done(self.summary)).await;
    }

    async fn handle_result(&mut self, job: Job, result: JobResult) {
        match result {
            JobResult::Expanded(children) => {
                self.summary.directories_expanded += 1;
                self.queue.extend(children);
            }
            JobResult::Finished(outcome) => self.emit(job, outcome).await,
        }
    }

    async fn handle_panic(&mut self, job: Job, err: JoinError) {
        warn!("Worker for {} did not finish cleanly", job.path.display());
        let reason = if err.is_panic() {
            panic_reason(err.into_panic())
        } else {
            err.to_string()
        };
        let outcome = Outcome::Failed {
            path: job.path.clone(),
            error: JobError::WorkerPanicked {
                path: job.path.clone(),
                reason,
            },
        };
        self.emit(job, outcome).await;
    }

    async fn emit(&mut self, job: Job, outcome: Outcome) {
        if let Outcome::Failed { path, error } = &outcome {
            debug!("{} failed: {}", path.display(), error);
        }
        self.summary.record(&outcome);
        let _ = self
            .events
            .send(RunEvent::Outcome(JobReport { job, outcome }))
            .await;
    }
}

/// Bounded-concurrency driver that renames every file under the given paths.
///
/// `run` must be called from within a Tokio runtime.
pub struct Scheduler<E, L = MarkerFileLock, S = StandardSlugifier>
where
    E: TagExtractor,
    L: AdvisoryLock,
    S: Slugifier,
{
    worker: Arc<Worker<E, L, S>>,
    concurrency: usize,
    event_buffer: usize,
}

impl<E: TagExtractor + 'static> Scheduler<E> {
    /// Creates a scheduler from the root configuration.
    pub fn new(config: &Config, extractor: E) -> Result<Self, ConfigError> {
        Self::with_parts(
            config.scheduler.clone(),
            extractor,
            DestinationResolver::new(config.naming.clone()),
            SafeRenamer::new(config.renamer.clone()),
        )
    }
}

impl<E, L, S> Scheduler<E, L, S>
where
    E: TagExtractor + 'static,
    L: AdvisoryLock + 'static,
    S: Slugifier + 'static,
{
    /// Creates a scheduler from individually built stages.
    pub fn with_parts(
        config: SchedulerConfig,
        extractor: E,
        resolver: DestinationResolver<S>,
        renamer: SafeRenamer<L>,
    ) -> Result<Self, ConfigError> {
        let ignore = config
            .ignore_patterns()
            .map_err(|e| ConfigError::ValidationError(format!("scheduler.ignore: {}", e)))?;

        Ok(Self {
            worker: Arc::new(Worker {
                extractor,
                resolver,
                renamer,
                ignore,
            }),
            concurrency: config.effective_concurrency(),
            event_buffer: config.event_buffer.max(1),
        })
    }

    /// Maximum number of jobs this scheduler keeps in flight.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Checks that the tag extractor is usable.
    pub async fn validate(&self) -> Result<(), ExtractorError> {
        self.worker.extractor.validate().await
    }

    /// Starts a run over `paths` and returns a handle to its events.
    ///
    /// Directories are expanded recursively. Every file yields exactly one
    /// [`RunEvent::Outcome`], followed by a single [`RunEvent::Done`].
    pub fn run<I, P>(&self, paths: I) -> RunHandle
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let run_id = Uuid::new_v4();
        let queue: VecDeque<Job> = paths
            .into_iter()
            .map(Job::new)
            .filter(|job| !self.worker.is_ignored(job.path()))
            .collect();

        info!(
            "Starting run {} with {} job(s), up to {} at a time",
            run_id,
            queue.len(),
            self.concurrency
        );

        let (tx, rx) = mpsc::channel(self.event_buffer);
        let coordinator = Coordinator {
            worker: Arc::clone(&self.worker),
            queue,
            limit: self.concurrency,
            events: tx,
            summary: RunSummary::new(run_id),
        };
        tokio::spawn(coordinator.drive());

        RunHandle { run_id, events: rx }
    }
}

/// Receiving end of a run.
pub struct RunHandle {
    run_id: Uuid,
    events: mpsc::Receiver<RunEvent>,
}

impl RunHandle {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Waits for the next event. Returns `None` after `Done` has been delivered.
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.events.recv().await
    }

    /// Turns the handle into a stream of events.
    pub fn into_stream(self) -> impl Stream<Item = RunEvent> + Send + 'static {
        stream::unfold(self.events, |mut events| async move {
            events.recv().await.map(|event| (event, events))
        })
    }

    /// Waits for the run to finish and gathers everything it produced.
    pub async fn collect(mut self) -> RunReport {
        let mut reports = Vec::new();
        while let Some(event) = self.events.recv().await {
            match event {
                RunEvent::Outcome(report) => reports.push(report),
                RunEvent::Done(summary) => return RunReport { reports, summary },
            }
        }

        // Coordinator went away without a summary; rebuild one from what arrived.
        let mut summary = RunSummary::new(self.run_id);
        for report in &reports {
            summary.record(&report.outcome);
        }
        RunReport { reports, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::TagSet;
    use crate::naming::NamingConfig;
    use crate::renamer::RenamerConfig;
    use crate::scheduler::ErrorKind;
    use crate::testing::MockTagExtractor;
    use async_trait::async_trait;
    use futures::StreamExt;
    use std::time::Duration;
    use tempfile::TempDir;

    fn scheduler(extractor: MockTagExtractor, max: usize) -> Scheduler<MockTagExtractor> {
        let config = Config {
            scheduler: SchedulerConfig::default().with_max_concurrent_jobs(max),
            ..Config::default()
        };
        Scheduler::new(&config, extractor).unwrap()
    }

    #[tokio::test]
    async fn test_empty_run_reports_done() {
        let scheduler = scheduler(MockTagExtractor::new(), 2);
        let mut handle = scheduler.run(Vec::<PathBuf>::new());

        match handle.next_event().await {
            Some(RunEvent::Done(summary)) => {
                assert_eq!(summary.total(), 0);
                assert_eq!(summary.run_id, handle.run_id());
            }
            other => panic!("expected Done, got {:?}", other),
        }
        assert!(handle.next_event().await.is_none());
    }

    #[tokio::test]
    async fn test_missing_path_is_invalid_input() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.flac");

        let report = scheduler(MockTagExtractor::new(), 2)
            .run([missing.clone()])
            .collect()
            .await;

        assert_eq!(report.summary.failed, 1);
        let job = report.for_path(&missing).unwrap();
        assert_eq!(job.outcome.error_kind(), Some(ErrorKind::InvalidInput));
    }

    #[tokio::test]
    async fn test_empty_path_is_invalid_input() {
        let report = scheduler(MockTagExtractor::new(), 1)
            .run([PathBuf::new()])
            .collect()
            .await;
        assert_eq!(report.reports.len(), 1);
        assert_eq!(
            report.reports[0].outcome.error_kind(),
            Some(ErrorKind::InvalidInput)
        );
    }

    #[tokio::test]
    async fn test_directory_expansion_skips_locks_and_ignored() {
        let temp = TempDir::new().unwrap();
        let album = temp.path().join("album");
        std::fs::create_dir_all(album.join("disc-2")).unwrap();
        std::fs::write(album.join("01.flac"), "").unwrap();
        std::fs::write(album.join("cover.jpg"), "").unwrap();
        std::fs::write(album.join("other.flac.lock"), "").unwrap();
        std::fs::write(album.join("disc-2/01.flac"), "").unwrap();

        let config = Config {
            scheduler: SchedulerConfig::default().with_ignore("*.jpg"),
            naming: NamingConfig::default().with_tags(["title"]),
            ..Config::default()
        };
        let extractor = MockTagExtractor::new();
        extractor
            .set_tags(album.join("01.flac"), TagSet::new().with("title", "Ruun"))
            .await;
        extractor
            .set_tags(
                album.join("disc-2/01.flac"),
                TagSet::new().with("title", "Gumption"),
            )
            .await;
        let report = Scheduler::new(&config, extractor)
            .unwrap()
            .run([album.clone()])
            .collect()
            .await;

        assert_eq!(report.summary.directories_expanded, 2);
        assert_eq!(report.summary.renamed, 2);
        assert_eq!(report.reports.len(), 2);
        assert!(album.join("ruun.flac").exists());
        assert!(album.join("disc-2/gumption.flac").exists());
        assert!(album.join("cover.jpg").exists());
        assert!(album.join("other.flac.lock").exists());
    }

    #[tokio::test]
    async fn test_ignored_input_never_becomes_a_job() {
        let temp = TempDir::new().unwrap();
        let cover = temp.path().join("cover.jpg");
        std::fs::write(&cover, "").unwrap();

        let config = Config {
            scheduler: SchedulerConfig::default().with_ignore("**/*.jpg"),
            ..Config::default()
        };
        let report = Scheduler::new(&config, MockTagExtractor::new())
            .unwrap()
            .run([cover.clone()])
            .collect()
            .await;

        assert!(report.reports.is_empty());
        assert!(cover.exists());
    }

    #[tokio::test]
    async fn test_invalid_ignore_pattern_is_rejected() {
        let config = Config {
            scheduler: SchedulerConfig::default().with_ignore("["),
            ..Config::default()
        };
        let result = Scheduler::new(&config, MockTagExtractor::new());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_concurrency_bound_is_respected() {
        let temp = TempDir::new().unwrap();
        let mut paths = Vec::new();
        for i in 0..12 {
            let path = temp.path().join(format!("{:02}.flac", i));
            std::fs::write(&path, "").unwrap();
            paths.push(path);
        }

        let extractor = MockTagExtractor::new();
        extractor.set_default_tags(TagSet::new()).await;
        extractor.set_delay(Duration::from_millis(20)).await;
        let stats = extractor.clone();

        let report = scheduler(extractor, 3).run(paths).collect().await;

        assert_eq!(report.summary.failed, 12);
        assert!(stats.max_in_flight() <= 3);
        assert!(stats.max_in_flight() >= 2);
        assert_eq!(stats.calls(), 12);
    }

    #[tokio::test]
    async fn test_stream_ends_with_done() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.flac");
        std::fs::write(&path, "").unwrap();

        let extractor = MockTagExtractor::new();
        extractor
            .set_tags(&path, TagSet::new().with("title", "Ruun"))
            .await;
        let events: Vec<RunEvent> = scheduler(extractor, 1)
            .run([path])
            .into_stream()
            .collect()
            .await;

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], RunEvent::Outcome(_)));
        assert!(matches!(events[1], RunEvent::Done(_)));
    }

    struct PanickingExtractor;

    #[async_trait]
    impl TagExtractor for PanickingExtractor {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn extract(&self, path: &Path) -> Result<TagSet, ExtractorError> {
            if path.ends_with("bad.flac") {
                panic!("decoder exploded");
            }
            Ok(TagSet::new().with("title", "Fine"))
        }

        async fn validate(&self) -> Result<(), ExtractorError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_panicking_job_fails_alone() {
        let temp = TempDir::new().unwrap();
        let bad = temp.path().join("bad.flac");
        let good = temp.path().join("good.flac");
        std::fs::write(&bad, "").unwrap();
        std::fs::write(&good, "").unwrap();

        let scheduler = Scheduler::with_parts(
            SchedulerConfig::default(),
            PanickingExtractor,
            DestinationResolver::new(NamingConfig::default().with_tags(["title"])),
            SafeRenamer::new(RenamerConfig::default()),
        )
        .unwrap();
        let report = scheduler.run([bad.clone(), good.clone()]).collect().await;

        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.renamed, 1);
        let failure = report.for_path(&bad).unwrap();
        assert_eq!(failure.outcome.error_kind(), Some(ErrorKind::Internal));
        assert!(bad.exists());
        assert!(temp.path().join("fine.flac").exists());
    }
}
