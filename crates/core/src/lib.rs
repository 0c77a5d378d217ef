//! Core library for renaming media files after their metadata tags.
//!
//! A run flows through the modules in order: the [`scheduler`] hands each
//! file to an [`extractor`], [`naming`] turns the tags into a destination,
//! and the [`renamer`] moves the file there without clobbering anything.

pub mod config;
pub mod extractor;
pub mod naming;
pub mod renamer;
pub mod scheduler;
pub mod testing;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError,
};
pub use extractor::{
    ExtractorConfig, ExtractorError, FfprobeExtractor, TagExtractor, TagSet, TagValue,
};
pub use naming::{
    DestinationResolver, MissingTagsPolicy, NamingConfig, NamingError, Slugifier,
    StandardSlugifier,
};
pub use renamer::{
    AdvisoryLock, LockConfig, LockError, MarkerFileLock, RenameError, RenameStatus,
    RenamerConfig, SafeRenamer,
};
pub use scheduler::{
    ErrorKind, Job, JobError, JobReport, Outcome, RunEvent, RunHandle, RunReport, RunSummary,
    Scheduler, SchedulerConfig,
};
