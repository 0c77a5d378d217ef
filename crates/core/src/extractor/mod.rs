//! Extractor module for reading metadata tags from media files.
//!
//! This module provides the `TagExtractor` trait and an implementation backed
//! by `ffprobe`. Extractors return a [`TagSet`]: tag names mapped to one or
//! more equivalent values.
//!
//! # Example
//!
//! ```ignore
//! use tagtoname_core::extractor::{FfprobeExtractor, TagExtractor};
//!
//! let extractor = FfprobeExtractor::with_defaults();
//! extractor.validate().await?;
//!
//! let tags = extractor.extract(Path::new("/music/track.flac")).await?;
//! println!("artist: {:?}", tags.get("artist"));
//! ```

mod config;
mod error;
mod ffprobe;
mod traits;
mod types;

pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use ffprobe::FfprobeExtractor;
pub use traits::TagExtractor;
pub use types::{TagSet, TagValue};
