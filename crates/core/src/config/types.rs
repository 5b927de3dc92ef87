use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub lines: Vec<LineConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Controller configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControlConfig {
    /// Size of the shared worker pool
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            worker_threads: default_worker_threads(),
        }
    }
}

fn default_worker_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// One production line backed by a JSON file of sheets
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LineConfig {
    pub name: String,
    pub path: PathBuf,
}

impl LineConfig {
    /// Resolve `path` against `base` when it is relative.
    pub fn resolved_path(&self, base: Option<&Path>) -> PathBuf {
        match base {
            Some(base) if self.path.is_relative() => base.join(&self.path),
            _ => self.path.clone(),
        }
    }
}

/// Report and diagnostics configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Where to write the JSON report (stdout when absent)
    #[serde(default)]
    pub report_path: Option<PathBuf>,
    /// Re-check every sheet sequentially and compare results
    #[serde(default = "default_verify")]
    pub verify: bool,
    /// Print Prometheus metrics to stderr on exit
    #[serde(default)]
    pub metrics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: None,
            verify: default_verify(),
            metrics: false,
        }
    }
}

fn default_verify() -> bool {
    true
}
