//! Configuration for the naming module.

use serde::{Deserialize, Serialize};

/// What to do when none of the wanted tags yields a usable name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingTagsPolicy {
    /// Fail the file with `AllTagsMissing`.
    #[default]
    Fail,
    /// Rename the file to its bare extension (e.g. `.flac`).
    ExtensionOnly,
}

/// How new file names are built from tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Keep the original case of tag values.
    #[serde(default)]
    pub keep_case: bool,

    /// Placed between tag values.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Tags used in the new name, in order.
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,

    /// Policy for files where no wanted tag is present.
    #[serde(default)]
    pub missing_tags: MissingTagsPolicy,
}

fn default_separator() -> String {
    "-".to_string()
}

fn default_tags() -> Vec<String> {
    vec!["artist".to_string(), "title".to_string()]
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            keep_case: false,
            separator: default_separator(),
            tags: default_tags(),
            missing_tags: MissingTagsPolicy::default(),
        }
    }
}

impl NamingConfig {
    /// Keeps or drops the original case of tag values.
    pub fn with_keep_case(mut self, keep_case: bool) -> Self {
        self.keep_case = keep_case;
        self
    }

    /// Sets the separator placed between tag values.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Sets the tags used in the new name.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the missing-tags policy.
    pub fn with_missing_tags(mut self, policy: MissingTagsPolicy) -> Self {
        self.missing_tags = policy;
        self
    }
}
