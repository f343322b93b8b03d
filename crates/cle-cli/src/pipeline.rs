//! The analysis run behind the `analyze` subcommand.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, info_span, warn};

use cle_core::analyze;
use cle_ingest::load_cohort;
use cle_model::DateRange;
use cle_report::write_report_outputs;

use crate::types::{RunConfig, RunResult};

/// Build the analysis window from optional `--start` / `--end` values.
pub fn build_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<DateRange> {
    DateRange::new(start, end).context("invalid analysis range")
}

/// Default output directory: `output/` next to the admission file.
pub fn default_output_dir(admissions: &Path) -> PathBuf {
    admissions
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join("output")
}

/// Ingest, analyze and (unless dry-running) write the reports.
///
/// Nothing is written when ingestion fails.
pub fn run(config: &RunConfig) -> Result<RunResult> {
    let span = info_span!("run", dry_run = config.dry_run);
    let _guard = span.enter();
    let started = Instant::now();

    let inputs = &config.inputs;
    if inputs.clabsi.is_none() && inputs.clanc.is_none() && inputs.events.is_none() {
        warn!("no event files given; event counts will be zero");
    }

    let ingest = load_cohort(inputs, &config.options).context("ingestion failed")?;
    let reference_issues = ingest.summary.reference_issue_count();
    if reference_issues > 0 {
        warn!(rows = reference_issues, "event rows skipped for unknown patients or lines");
    }

    let report = analyze(&ingest.cohort, &config.options);

    let outputs = if config.dry_run {
        info!("dry run; no files written");
        Vec::new()
    } else {
        write_report_outputs(&config.output_dir, &report, &config.report)
            .context("failed to write reports")?
    };

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        files = outputs.len(),
        "run complete"
    );
    Ok(RunResult {
        ingest: ingest.summary,
        report,
        output_dir: config.output_dir.clone(),
        outputs,
        dry_run: config.dry_run,
    })
}
