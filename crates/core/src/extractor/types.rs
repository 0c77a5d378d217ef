//! Types for the extractor module.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single tag value as reported by an extractor.
///
/// Containers frequently report the same tag more than once (per stream, or
/// split into `number/total`). Those equivalent values are kept together and
/// only the first one is used for naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    /// One value.
    Single(String),
    /// Several equivalent values, most significant first.
    Multi(Vec<String>),
}

impl TagValue {
    /// Returns the value used for naming, if any.
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value.as_str()),
            Self::Multi(values) => values.first().map(String::as_str),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for TagValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multi(values)
    }
}

/// Tags read from one media file, keyed by lower-case tag name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet {
    tags: BTreeMap<String, TagValue>,
}

impl TagSet {
    /// Creates an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a tag, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<TagValue>) {
        self.tags
            .insert(name.as_ref().to_lowercase(), value.into());
    }

    /// Builder-style variant of [`TagSet::insert`].
    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<TagValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Looks up a tag by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&TagValue> {
        self.tags.get(&name.to_lowercase())
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the set holds no tags at all.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterates over tag names and values in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.tags.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: AsRef<str>, V: Into<TagValue>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}
