//! Naming module for turning tags into destination paths.
//!
//! Three steps, each usable on its own:
//! - [`synthesize`] joins the wanted tag values into a candidate name
//! - a [`Slugifier`] makes the candidate safe for the filesystem
//! - [`DestinationResolver`] puts slug, source directory and extension together
//!
//! # Example
//!
//! ```ignore
//! use tagtoname_core::naming::{DestinationResolver, NamingConfig};
//!
//! let resolver = DestinationResolver::new(NamingConfig::default());
//! let dest = resolver.destination_for(Path::new("/music/01.flac"), &tags)?;
//! // "/music/paradise-lost-victim-of-the-past.flac"
//! ```

mod config;
mod error;
mod resolve;
mod slug;
mod synthesize;

pub use config::{MissingTagsPolicy, NamingConfig};
pub use error::NamingError;
pub use resolve::DestinationResolver;
pub use slug::{Slugifier, StandardSlugifier};
pub use synthesize::synthesize;
