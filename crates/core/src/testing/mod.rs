//! Testing utilities and mock implementations.
//!
//! Provides a mock [`TagExtractor`](crate::extractor::TagExtractor) so the
//! whole rename pipeline can be exercised without ffprobe or real media
//! files, plus tag fixtures used across the test suites.
//!
//! # Example
//!
//! ```rust,ignore
//! use tagtoname_core::testing::{fixtures, MockTagExtractor};
//!
//! let extractor = MockTagExtractor::new();
//! extractor.set_tags(&path, fixtures::paradise_lost()).await;
//! ```

mod mock_extractor;

pub use mock_extractor::MockTagExtractor;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::extractor::{TagSet, TagValue};

    /// Artist and title of a well-tagged track.
    pub fn paradise_lost() -> TagSet {
        TagSet::new()
            .with("artist", "Paradise Lost")
            .with("title", "Victim Of The Past")
    }

    /// Tags whose slug collides with [`ruun_duplicate`].
    pub fn ruun() -> TagSet {
        TagSet::new().with("artist", "Ruun").with("title", "4 Ruun")
    }

    /// Differently written tags that slugify to the same name as [`ruun`].
    pub fn ruun_duplicate() -> TagSet {
        TagSet::new().with("artist", "RUUN").with("title", "4  Ruun!")
    }

    /// Tags with a `number/total` track value and no artist or title.
    pub fn album_only() -> TagSet {
        TagSet::new()
            .with("album", "Draconian Times")
            .with("track", TagValue::Multi(vec!["3".into(), "12".into()]))
    }
}
