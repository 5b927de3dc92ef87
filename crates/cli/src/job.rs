//! One quality-control run over the configured lines.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use sheetline_core::{Config, ProductionLine, QualityControl, QueueLine, Sheet, SheetAnalyzer};

use crate::report::{LineReport, RunReport};

/// Reads a line file: a JSON array of sheets.
pub fn read_sheets(path: &Path) -> Result<Vec<Sheet>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read line file {:?}", path))?;
    let sheets: Vec<Sheet> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse line file {:?}", path))?;

    if let Some(sheet) = sheets.iter().find(|s| carries_results(s)) {
        bail!(
            "Line file {:?} contains sheet {} that already carries results",
            path,
            sheet.id()
        );
    }
    Ok(sheets)
}

fn carries_results(sheet: &Sheet) -> bool {
    sheet.rel_dev.iter().any(|q| q.is_answered())
        || sheet.volume.iter().any(|q| q.is_answered())
        || sheet.min_max.iter().any(|q| q.is_answered())
}

/// Loads every configured line, runs them to completion and builds the report.
pub fn run_job(config: &Config, base_dir: Option<&Path>) -> Result<RunReport> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();

    let mut lines = Vec::with_capacity(config.lines.len());
    let mut inputs = Vec::with_capacity(config.lines.len());
    for line_config in &config.lines {
        let path = line_config.resolved_path(base_dir);
        let sheets = read_sheets(&path)?;
        info!(line = %line_config.name, sheets = sheets.len(), "Loaded line from {:?}", path);

        lines.push(Arc::new(QueueLine::new(
            line_config.name.clone(),
            sheets.clone(),
        )));
        inputs.push(sheets);
    }

    let mut control = QualityControl::default();
    for line in &lines {
        control.add_line(Arc::clone(line) as Arc<dyn ProductionLine>)?;
    }
    control
        .start(config.control.worker_threads)
        .context("Failed to start quality control")?;
    control.stop().context("Failed to stop quality control")?;

    let mut reports = Vec::with_capacity(lines.len());
    for (line, input) in lines.iter().zip(inputs) {
        let returned = line.take_returned();
        if config.output.verify {
            verify_line(&control, line.name(), input, &returned)?;
        }
        reports.push(LineReport {
            name: line.name().to_string(),
            verified: config.output.verify,
            sheets: returned,
        });
    }

    Ok(RunReport {
        run_id,
        started_at,
        finished_at: Utc::now(),
        worker_threads: config.control.worker_threads,
        lines: reports,
    })
}

/// Checks that `returned` holds every input sheet, in input order, with the
/// same results a sequential analysis produces.
pub fn verify_line<A: SheetAnalyzer>(
    control: &QualityControl<A>,
    name: &str,
    inputs: Vec<Sheet>,
    returned: &[Sheet],
) -> Result<()> {
    if inputs.len() != returned.len() {
        bail!(
            "Line {}: {} sheets fetched but {} returned",
            name,
            inputs.len(),
            returned.len()
        );
    }

    for (position, (mut expected, actual)) in inputs.into_iter().zip(returned).enumerate() {
        if expected.id() != actual.id() {
            bail!(
                "Line {}: position {} returned sheet {} instead of {}",
                name,
                position,
                actual.id(),
                expected.id()
            );
        }

        control.check_sheet(&mut expected);
        if &expected != actual {
            bail!(
                "Line {}: sheet {} differs from its sequential check",
                name,
                actual.id()
            );
        }
    }

    debug!(line = name, sheets = returned.len(), "Line verified");
    Ok(())
}
