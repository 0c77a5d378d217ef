use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one tag is wanted, and no tag name is blank
/// - Ignore patterns are valid globs
/// - Event buffer and lock poll interval are not 0
/// - ffprobe path is not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Naming validation
    if config.naming.tags.is_empty() {
        return Err(ConfigError::ValidationError(
            "naming.tags must name at least one tag".to_string(),
        ));
    }
    if config.naming.tags.iter().any(|t| t.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "naming.tags cannot contain blank tag names".to_string(),
        ));
    }

    // Scheduler validation
    if config.scheduler.event_buffer == 0 {
        return Err(ConfigError::ValidationError(
            "scheduler.event_buffer cannot be 0".to_string(),
        ));
    }
    if let Err(e) = config.scheduler.ignore_patterns() {
        return Err(ConfigError::ValidationError(format!(
            "scheduler.ignore: {}",
            e
        )));
    }

    // Renamer validation
    if config.renamer.lock.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "renamer.lock.poll_interval_ms cannot be 0".to_string(),
        ));
    }

    if config.extractor.ffprobe_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "extractor.ffprobe_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::NamingConfig;
    use crate::scheduler::SchedulerConfig;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_empty_tags_fails() {
        let config = Config {
            naming: NamingConfig::default().with_tags(Vec::<String>::new()),
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_blank_tag_fails() {
        let config = Config {
            naming: NamingConfig::default().with_tags(["artist", "  "]),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_bad_glob_fails() {
        let config = Config {
            scheduler: SchedulerConfig::default().with_ignore("**/[.flac"),
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("scheduler.ignore"));
    }

    #[test]
    fn test_validate_zero_poll_interval_fails() {
        let mut config = Config::default();
        config.renamer.lock.poll_interval_ms = 0;
        assert!(validate_config(&config).is_err());
    }
}
