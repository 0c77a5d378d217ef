use serde::{Deserialize, Serialize};

use crate::extractor::ExtractorConfig;
use crate::naming::NamingConfig;
use crate::renamer::RenamerConfig;
use crate::scheduler::SchedulerConfig;

/// Root configuration. Every section is optional in the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// How destination names are built.
    #[serde(default)]
    pub naming: NamingConfig,

    /// Dry run and lock behaviour.
    #[serde(default)]
    pub renamer: RenamerConfig,

    /// Concurrency and input filtering.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// How tags are read.
    #[serde(default)]
    pub extractor: ExtractorConfig,
}
