use std::path::PathBuf;

use cle_core::SurveillanceReport;
use cle_ingest::{IngestSummary, InputFiles};
use cle_model::AnalysisOptions;
use cle_report::ReportOptions;

/// Everything one `analyze` invocation needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub inputs: InputFiles,
    pub options: AnalysisOptions,
    pub output_dir: PathBuf,
    pub report: ReportOptions,
    /// Compute and summarize without writing any file.
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct RunResult {
    pub ingest: IngestSummary,
    pub report: SurveillanceReport,
    pub output_dir: PathBuf,
    /// Files written, empty on a dry run.
    pub outputs: Vec<PathBuf>,
    pub dry_run: bool,
}
