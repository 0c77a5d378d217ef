//! Command line arguments.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use tagtoname_core::{Config, MissingTagsPolicy};

#[derive(Parser, Debug)]
#[command(name = "tagtoname", version)]
#[command(about = "Renames audio files using the metadata tags")]
#[command(long_about = "\
Renames audio files using the metadata tags.

For example, by default a file with the \"mp3\" extension, the artist tag
\"Beethoven\" and the title tag \"Ode to Joy\" is renamed to
\"beethoven-ode-to-joy.mp3\". Directories are renamed recursively and an
existing file is never replaced.")]
pub struct Cli {
    /// Files, directories or glob patterns to rename
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Ignore paths matching a glob pattern
    #[arg(short = 'i', long = "ignore", value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Keep the original case of the tags when renaming
    #[arg(short = 'k', long)]
    pub keep_case: bool,

    /// Dry run, show new paths without renaming the files
    #[arg(short = 'n', long)]
    pub noop: bool,

    /// Join tags with SEPARATOR [default: -]
    #[arg(short = 's', long, value_name = "SEPARATOR")]
    pub separator: Option<String>,

    /// Append TAG to the new name; repeatable [default: artist, title]
    #[arg(short = 't', long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Files processed at once; 0 uses every CPU [default: 4]
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// What to do when none of the tags are present
    #[arg(long, value_enum, value_name = "POLICY")]
    pub missing_tags: Option<MissingTags>,

    /// Configuration file
    #[arg(short = 'c', long, env = "TAGTONAME_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingTags {
    /// Fail the file
    Fail,
    /// Rename the file to just its extension
    ExtensionOnly,
}

impl From<MissingTags> for MissingTagsPolicy {
    fn from(value: MissingTags) -> Self {
        match value {
            MissingTags::Fail => MissingTagsPolicy::Fail,
            MissingTags::ExtensionOnly => MissingTagsPolicy::ExtensionOnly,
        }
    }
}

impl Cli {
    /// Overrides `config` with the flags that were given.
    pub fn apply(&self, config: &mut Config) {
        if self.keep_case {
            config.naming.keep_case = true;
        }
        if self.noop {
            config.renamer.noop = true;
        }
        if let Some(separator) = &self.separator {
            config.naming.separator = separator.clone();
        }
        if !self.tags.is_empty() {
            config.naming.tags = self.tags.clone();
        }
        if let Some(policy) = self.missing_tags {
            config.naming.missing_tags = policy.into();
        }
        if let Some(jobs) = self.jobs {
            config.scheduler.max_concurrent_jobs = jobs;
        }
        config.scheduler.ignore.extend(self.ignore.iter().cloned());
    }
}
