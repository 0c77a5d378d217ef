//! Scheduler module for running rename jobs with bounded concurrency.
//!
//! A [`Scheduler`] takes input paths, expands directories recursively, and
//! sends every file through extraction, naming and the collision-safe
//! renamer. Results arrive on a [`RunHandle`] as [`RunEvent`]s; a single
//! [`RunEvent::Done`] closes every run, including empty ones.
//!
//! # Example
//!
//! ```ignore
//! use tagtoname_core::scheduler::{RunEvent, Scheduler};
//!
//! let scheduler = Scheduler::new(&config, FfprobeExtractor::new(config.extractor.clone()))?;
//! let mut run = scheduler.run(["/music"]);
//! while let Some(event) = run.next_event().await {
//!     match event {
//!         RunEvent::Outcome(report) => println!("{:?}", report.outcome),
//!         RunEvent::Done(summary) => println!("{} failed", summary.failed),
//!     }
//! }
//! ```

mod config;
mod error;
mod runner;
mod types;

pub use config::SchedulerConfig;
pub use error::{ErrorKind, JobError};
pub use runner::{RunHandle, Scheduler};
pub use types::{Job, JobReport, Outcome, RunEvent, RunReport, RunSummary};
