use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides
///
/// Nested keys are separated by a double underscore, e.g.
/// `SHEETLINE_CONTROL__WORKER_THREADS=8`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("SHEETLINE_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[control]
worker_threads = 6

[[lines]]
name = "line-a"
path = "a.json"

[[lines]]
name = "line-b"
path = "b.json"

[output]
verify = false
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.control.worker_threads, 6);
        assert_eq!(config.lines.len(), 2);
        assert_eq!(config.lines[1].name, "line-b");
        assert!(!config.output.verify);
    }

    #[test]
    fn test_load_config_from_str_line_without_path() {
        let toml = r#"
[[lines]]
name = "line-a"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/sheetline.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[control]
worker_threads = 3

[[lines]]
name = "only"
path = "only.json"

[output]
report_path = "report.json"
metrics = true
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.control.worker_threads, 3);
        assert_eq!(config.lines[0].name, "only");
        assert!(config.output.metrics);
        assert_eq!(
            config.output.report_path.as_deref(),
            Some(Path::new("report.json"))
        );
    }
}
