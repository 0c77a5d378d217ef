//! Rename pipeline integration tests.
//!
//! These tests drive the scheduler end to end with a mock tag extractor and
//! a real temporary directory:
//! - Tag-derived names, dry runs and missing-tag policies
//! - Collisions between files that resolve to the same name
//! - Recursive directories and the concurrency limit
//! - Held locks and unreadable metadata

use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use tagtoname_core::{
    naming::MissingTagsPolicy,
    renamer::{lock_path_for, LockConfig},
    scheduler::{ErrorKind, Outcome, RunReport, Scheduler},
    testing::{fixtures, MockTagExtractor},
    Config, TagSet,
};

/// Test helper bundling a music directory, a mock extractor and a config.
struct TestHarness {
    extractor: MockTagExtractor,
    config: Config,
    music_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let mut config = Config::default();
        config.renamer.lock = LockConfig::default()
            .with_wait(Duration::from_millis(200))
            .with_poll_interval(Duration::from_millis(5));

        Self {
            extractor: MockTagExtractor::new(),
            config,
            music_dir: TempDir::new().expect("Failed to create music dir"),
        }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.music_dir.path().join(relative)
    }

    /// Creates a file whose contents are its original name.
    fn create(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, relative).expect("Failed to write file");
        path
    }

    async fn create_tagged(&self, relative: &str, tags: TagSet) -> PathBuf {
        let path = self.create(relative);
        self.extractor.set_tags(&path, tags).await;
        path
    }

    async fn run(&self, paths: Vec<PathBuf>) -> RunReport {
        Scheduler::new(&self.config, self.extractor.clone())
            .expect("Failed to create scheduler")
            .run(paths)
            .collect()
            .await
    }
}

fn contents(path: &Path) -> String {
    std::fs::read_to_string(path).expect("Failed to read file")
}

#[tokio::test]
async fn test_renames_from_artist_and_title() {
    let harness = TestHarness::new();
    let source = harness
        .create_tagged("01 - track.flac", fixtures::paradise_lost())
        .await;

    let report = harness.run(vec![source.clone()]).await;

    let expected = harness.path("paradise-lost-victim-of-the-past.flac");
    assert_eq!(report.reports.len(), 1);
    assert!(matches!(&report.reports[0].outcome, Outcome::Renamed(p) if *p == expected));
    assert!(!source.exists());
    assert_eq!(contents(&expected), "01 - track.flac");
    assert!(!lock_path_for(&expected).exists());
    assert!(report.summary.is_success());
}

#[tokio::test]
async fn test_already_named_file_is_unchanged() {
    let harness = TestHarness::new();
    let source = harness
        .create_tagged(
            "paradise-lost-victim-of-the-past.flac",
            fixtures::paradise_lost(),
        )
        .await;

    let report = harness.run(vec![source.clone()]).await;

    assert!(matches!(&report.reports[0].outcome, Outcome::Unchanged(p) if *p == source));
    assert_eq!(report.summary.unchanged, 1);
    assert!(source.exists());
}

#[tokio::test]
async fn test_colliding_names_rename_only_one_file() {
    let mut harness = TestHarness::new();
    harness.config.scheduler.max_concurrent_jobs = 2;
    let first = harness.create_tagged("a.ogg", fixtures::ruun()).await;
    let second = harness
        .create_tagged("b.ogg", fixtures::ruun_duplicate())
        .await;

    let report = harness.run(vec![first, second]).await;

    assert_eq!(report.summary.renamed, 1);
    assert_eq!(report.summary.failed, 1);
    let failure = report.failures().next().expect("one failure");
    assert_eq!(failure.outcome.error_kind(), Some(ErrorKind::WouldOverwrite));
    // The loser stays where it was.
    assert!(failure.job.path.exists());

    let winner = harness.path("ruun-4-ruun.ogg");
    assert!(winner.exists());
    assert!(["a.ogg", "b.ogg"].contains(&contents(&winner).as_str()));
}

#[tokio::test]
async fn test_missing_tags_policies() {
    let mut harness = TestHarness::new();
    harness.config.naming.tags = vec!["album".to_string(), "track".to_string()];
    let source = harness
        .create_tagged("song.flac", TagSet::new().with("artist", "Ruun"))
        .await;

    let report = harness.run(vec![source.clone()]).await;
    assert_eq!(
        report.reports[0].outcome.error_kind(),
        Some(ErrorKind::AllTagsMissing)
    );
    assert!(source.exists());

    harness.config.naming.missing_tags = MissingTagsPolicy::ExtensionOnly;
    let report = harness.run(vec![source.clone()]).await;
    let expected = harness.path(".flac");
    assert!(matches!(&report.reports[0].outcome, Outcome::Renamed(p) if *p == expected));
    assert!(expected.exists());

    harness
        .extractor
        .set_tags(&expected, TagSet::new().with("artist", "Ruun"))
        .await;
    let report = harness.run(vec![expected.clone()]).await;
    assert!(matches!(&report.reports[0].outcome, Outcome::Unchanged(p) if *p == expected));
}

#[tokio::test]
async fn test_slash_in_tag_value_is_idempotent() {
    let harness = TestHarness::new();
    let tags = TagSet::new()
        .with("artist", "AC/DC")
        .with("title", "Back In Black");
    let source = harness.create_tagged("01.mp3", tags.clone()).await;

    let report = harness.run(vec![source]).await;
    let expected = harness.path("ac-dc-back-in-black.mp3");
    assert!(matches!(&report.reports[0].outcome, Outcome::Renamed(p) if *p == expected));
    assert!(!harness.path("ac").exists());

    harness.extractor.set_tags(&expected, tags).await;
    let report = harness.run(vec![expected.clone()]).await;
    assert!(matches!(&report.reports[0].outcome, Outcome::Unchanged(p) if *p == expected));
}

#[tokio::test]
async fn test_multi_valued_track_uses_first_value() {
    let mut harness = TestHarness::new();
    harness.config.naming.tags = vec!["album".to_string(), "track".to_string()];
    let source = harness
        .create_tagged("x.flac", fixtures::album_only())
        .await;

    harness.run(vec![source]).await;
    assert!(harness.path("draconian-times-3.flac").exists());
}

#[tokio::test]
async fn test_noop_reports_without_touching_files() {
    let mut harness = TestHarness::new();
    harness.config.renamer.noop = true;
    let source = harness
        .create_tagged("01.flac", fixtures::paradise_lost())
        .await;

    let report = harness.run(vec![source.clone()]).await;

    let expected = harness.path("paradise-lost-victim-of-the-past.flac");
    assert!(matches!(&report.reports[0].outcome, Outcome::Renamed(p) if *p == expected));
    assert!(source.exists());
    assert!(!expected.exists());
    assert!(!lock_path_for(&expected).exists());
}

#[tokio::test]
async fn test_existing_file_is_never_clobbered() {
    let harness = TestHarness::new();
    let occupant = harness.create("paradise-lost-victim-of-the-past.flac");
    let source = harness
        .create_tagged("02.flac", fixtures::paradise_lost())
        .await;

    let report = harness.run(vec![source.clone()]).await;

    assert_eq!(
        report.reports[0].outcome.error_kind(),
        Some(ErrorKind::WouldOverwrite)
    );
    assert_eq!(contents(&occupant), "paradise-lost-victim-of-the-past.flac");
    assert_eq!(contents(&source), "02.flac");
}

#[tokio::test]
async fn test_separator_slash_creates_subdirectory() {
    let mut harness = TestHarness::new();
    harness.config.naming.separator = "/".to_string();
    let source = harness
        .create_tagged("01.flac", fixtures::paradise_lost())
        .await;

    harness.run(vec![source]).await;
    assert!(harness
        .path("paradise-lost/victim-of-the-past.flac")
        .exists());
}

#[tokio::test]
async fn test_every_file_in_a_tree_gets_one_outcome() {
    let harness = TestHarness::new();
    let mut expected = Vec::new();
    for (i, relative) in [
        "a/01.flac",
        "a/02.flac",
        "a/b/03.ogg",
        "a/b/c/04.mp3",
        "d/05.flac",
    ]
    .iter()
    .enumerate()
    {
        let tags = TagSet::new().with("title", format!("Song {}", i));
        expected.push(harness.create_tagged(relative, tags).await);
    }
    let broken = harness.create("a/b/broken.flac");
    harness
        .extractor
        .set_failure(&broken, "Invalid data found when processing input")
        .await;

    let report = harness
        .run(vec![harness.path("a"), harness.path("d")])
        .await;

    assert_eq!(report.reports.len(), 6);
    assert_eq!(report.summary.renamed, 5);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.summary.directories_expanded, 4);

    let failure = report.for_path(&broken).expect("broken file reported");
    assert_eq!(
        failure.outcome.error_kind(),
        Some(ErrorKind::MetadataUnreadable)
    );
    if let Outcome::Failed { error, .. } = &failure.outcome {
        assert!(error.to_string().contains("Invalid data found"));
    }

    assert!(harness.path("a/song-0.flac").exists());
    assert!(harness.path("a/b/c/song-3.mp3").exists());
    assert!(harness.path("d/song-4.flac").exists());
}

#[tokio::test]
async fn test_concurrency_limit_holds_across_directories() {
    let mut harness = TestHarness::new();
    harness.config.scheduler.max_concurrent_jobs = 2;
    harness.extractor.set_delay(Duration::from_millis(15)).await;
    for i in 0..10 {
        harness
            .create_tagged(
                &format!("album/{:02}.flac", i),
                TagSet::new().with("title", format!("Take {}", i)),
            )
            .await;
    }

    let report = harness.run(vec![harness.path("album")]).await;

    assert_eq!(report.summary.renamed, 10);
    assert!(harness.extractor.max_in_flight() <= 2);
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let harness = TestHarness::new();
    let a = harness
        .create_tagged("a.flac", fixtures::paradise_lost())
        .await;
    let b = harness.create_tagged("b.ogg", fixtures::ruun()).await;
    harness.run(vec![a, b]).await;

    let renamed = vec![
        harness.path("paradise-lost-victim-of-the-past.flac"),
        harness.path("ruun-4-ruun.ogg"),
    ];
    harness
        .extractor
        .set_tags(&renamed[0], fixtures::paradise_lost())
        .await;
    harness.extractor.set_tags(&renamed[1], fixtures::ruun()).await;

    let report = harness.run(vec![harness.music_dir.path().to_path_buf()]).await;

    assert_eq!(report.summary.unchanged, 2);
    assert_eq!(report.summary.renamed, 0);
    assert!(renamed.iter().all(|p| p.exists()));
}

#[tokio::test]
async fn test_held_lock_fails_the_job() {
    let harness = TestHarness::new();
    let source = harness
        .create_tagged("01.flac", fixtures::paradise_lost())
        .await;
    let destination = harness.path("paradise-lost-victim-of-the-past.flac");
    std::fs::write(lock_path_for(&destination), "").unwrap();

    let report = harness.run(vec![source.clone()]).await;

    assert_eq!(
        report.reports[0].outcome.error_kind(),
        Some(ErrorKind::LockFailure)
    );
    assert!(source.exists());
    assert!(!destination.exists());
}

#[tokio::test]
async fn test_empty_run_completes() {
    let harness = TestHarness::new();
    let report = harness.run(Vec::new()).await;

    assert!(report.reports.is_empty());
    assert_eq!(report.summary.total(), 0);
    assert!(report.summary.is_success());
}
