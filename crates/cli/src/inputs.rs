//! Turning command line arguments into paths.

use std::path::PathBuf;
use tracing::debug;

/// Expands arguments that are glob patterns rather than existing paths.
///
/// Existing paths are kept verbatim, even if they contain glob characters.
/// A pattern with no matches is kept as-is so the run reports it.
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for input in inputs {
        if input.symlink_metadata().is_ok() {
            paths.push(input.clone());
            continue;
        }

        let Some(pattern) = input.to_str().filter(|s| is_glob(s)) else {
            paths.push(input.clone());
            continue;
        };

        let matched = match glob::glob(pattern) {
            Ok(entries) => entries
                .filter_map(|entry| match entry {
                    Ok(path) => Some(path),
                    Err(e) => {
                        debug!("Skipping unreadable match: {}", e);
                        None
                    }
                })
                .collect(),
            Err(e) => {
                debug!("Not a valid pattern {}: {}", pattern, e);
                Vec::new()
            }
        };

        if matched.is_empty() {
            paths.push(input.clone());
        } else {
            paths.extend(matched);
        }
    }

    paths
}

fn is_glob(s: &str) -> bool {
    s.contains(['*', '?', '['])
}
