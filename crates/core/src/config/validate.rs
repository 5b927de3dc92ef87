use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one worker thread
/// - At least one line
/// - Line names are non-empty and unique
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.control.worker_threads == 0 {
        return Err(ConfigError::ValidationError(
            "control.worker_threads cannot be 0".to_string(),
        ));
    }

    if config.lines.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one [[lines]] entry is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for line in &config.lines {
        if line.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "line name cannot be empty".to_string(),
            ));
        }
        if !seen.insert(line.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate line name: {}",
                line.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ControlConfig, LineConfig, OutputConfig};
    use std::path::PathBuf;

    fn line(name: &str) -> LineConfig {
        LineConfig {
            name: name.to_string(),
            path: PathBuf::from(format!("{}.json", name)),
        }
    }

    fn config(worker_threads: usize, lines: Vec<LineConfig>) -> Config {
        Config {
            control: ControlConfig { worker_threads },
            lines,
            output: OutputConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&config(2, vec![line("a"), line("b")])).is_ok());
    }

    #[test]
    fn test_validate_zero_workers_fails() {
        let result = validate_config(&config(0, vec![line("a")]));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_no_lines_fails() {
        let result = validate_config(&config(2, Vec::new()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_duplicate_names_fail() {
        let err = validate_config(&config(2, vec![line("a"), line("a")])).unwrap_err();
        assert!(err.to_string().contains("duplicate line name: a"));
    }

    #[test]
    fn test_validate_blank_name_fails() {
        let result = validate_config(&config(2, vec![line(" ")]));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
