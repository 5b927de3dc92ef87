//! Run report written at the end of every run.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use sheetline_core::Sheet;

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub worker_threads: usize,
    pub lines: Vec<LineReport>,
}

/// Sheets of one line, in return order.
#[derive(Debug, Serialize)]
pub struct LineReport {
    pub name: String,
    pub verified: bool,
    pub sheets: Vec<Sheet>,
}

impl RunReport {
    pub fn total_sheets(&self) -> usize {
        self.lines.iter().map(|l| l.sheets.len()).sum()
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Writes `report` as pretty JSON to `path`, or to stdout when absent.
pub fn write_report(report: &RunReport, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;

    match path {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("Failed to write report to {:?}", path))?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json).context("Failed to write report to stdout")?;
        }
    }
    Ok(())
}
