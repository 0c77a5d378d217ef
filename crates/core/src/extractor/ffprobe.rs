//! FFprobe-based tag extractor.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use super::config::ExtractorConfig;
use super::error::ExtractorError;
use super::traits::TagExtractor;
use super::types::{TagSet, TagValue};

/// Container-specific tag names mapped onto the names callers ask for.
const TAG_ALIASES: &[(&str, &str)] = &[
    ("tracknumber", "track"),
    ("discnumber", "disc"),
    ("album_artist", "albumartist"),
    ("album artist", "albumartist"),
];

/// Tags stored as `number/total`.
const NUMBERED_TAGS: &[&str] = &["track", "disc"];

/// Tag extractor that shells out to `ffprobe`.
pub struct FfprobeExtractor {
    config: ExtractorConfig,
}

impl FfprobeExtractor {
    /// Creates a new extractor with the given configuration.
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Creates an extractor with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ExtractorConfig::default())
    }

    fn canonical_name(name: &str) -> String {
        let lower = name.trim().to_lowercase();
        TAG_ALIASES
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or(lower)
    }

    /// Parses ffprobe JSON output into a tag set.
    ///
    /// Format-level tags come first, stream tags follow in stream order.
    fn parse_probe_output(output: &str) -> Result<TagSet, ExtractorError> {
        #[derive(Deserialize)]
        struct ProbeOutput {
            #[serde(default)]
            format: Option<ProbeSection>,
            #[serde(default)]
            streams: Vec<ProbeSection>,
        }

        #[derive(Deserialize)]
        struct ProbeSection {
            #[serde(default)]
            tags: HashMap<String, String>,
        }

        let probe: ProbeOutput =
            serde_json::from_str(output).map_err(|e| ExtractorError::ParseError {
                reason: format!("Failed to parse ffprobe output: {}", e),
            })?;

        if probe.format.is_none() && probe.streams.is_empty() {
            return Err(ExtractorError::probe_failed(
                "Failed to determine media format",
            ));
        }

        let sections = probe.format.iter().chain(probe.streams.iter());
        let mut collected: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for section in sections {
            // HashMap order is arbitrary; sort so aliases resolve the same way every run.
            let mut entries: Vec<(&String, &String)> = section.tags.iter().collect();
            entries.sort();

            for (name, raw) in entries {
                let name = Self::canonical_name(name);
                let values: Vec<&str> = if NUMBERED_TAGS.contains(&name.as_str()) {
                    raw.split('/').collect()
                } else {
                    vec![raw.as_str()]
                };

                let slot = collected.entry(name).or_default();
                for value in values.into_iter().map(str::trim) {
                    if !value.is_empty() && !slot.iter().any(|v| v == value) {
                        slot.push(value.to_string());
                    }
                }
            }
        }

        Ok(collected
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(name, mut values)| {
                let value = if values.len() == 1 {
                    TagValue::Single(values.remove(0))
                } else {
                    TagValue::Multi(values)
                };
                (name, value)
            })
            .collect())
    }
}

#[async_trait]
impl TagExtractor for FfprobeExtractor {
    fn name(&self) -> &str {
        "ffprobe"
    }

    async fn extract(&self, path: &Path) -> Result<TagSet, ExtractorError> {
        if tokio::fs::metadata(path).await.is_err() {
            return Err(ExtractorError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut command = Command::new(&self.config.ffprobe_path);
        command
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .kill_on_drop(true);

        let output = if self.config.timeout_secs > 0 {
            timeout(
                Duration::from_secs(self.config.timeout_secs),
                command.output(),
            )
            .await
            .map_err(|_| ExtractorError::Timeout {
                timeout_secs: self.config.timeout_secs,
            })?
        } else {
            command.output().await
        };

        let output = output.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ExtractorError::FfprobeNotFound {
                    path: self.config.ffprobe_path.clone(),
                }
            } else {
                ExtractorError::Io(e)
            }
        })?;

        if !output.status.success() {
            return Err(ExtractorError::probe_failed(format!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_probe_output(&stdout)
    }

    async fn validate(&self) -> Result<(), ExtractorError> {
        let result = Command::new(&self.config.ffprobe_path)
            .arg("-version")
            .output()
            .await;

        if let Err(e) = result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(ExtractorError::FfprobeNotFound {
                    path: self.config.ffprobe_path.clone(),
                });
            }
            return Err(ExtractorError::Io(e));
        }

        Ok(())
    }
}
