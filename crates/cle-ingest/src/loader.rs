use std::path::{Path, PathBuf};

use tracing::{info, info_span};

use cle_model::{AnalysisOptions, Cohort};

use crate::admissions::ingest_admissions;
use crate::csv_table::{CsvTable, read_csv_table};
use crate::error::Result;
use crate::events::{ingest_clabsi, ingest_clanc, ingest_combined_events};
use crate::lines::ingest_lines;
use crate::schema;
use crate::summary::IngestSummary;

/// Paths of the files that make up one surveillance run.
#[derive(Debug, Clone, Default)]
pub struct InputFiles {
    pub admissions: PathBuf,
    pub lines: PathBuf,
    pub clabsi: Option<PathBuf>,
    pub clanc: Option<PathBuf>,
    /// Combined file carrying both event types in one table.
    pub events: Option<PathBuf>,
}

impl InputFiles {
    pub fn new(admissions: impl Into<PathBuf>, lines: impl Into<PathBuf>) -> Self {
        Self {
            admissions: admissions.into(),
            lines: lines.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_clabsi(mut self, path: impl Into<PathBuf>) -> Self {
        self.clabsi = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_clanc(mut self, path: impl Into<PathBuf>) -> Self {
        self.clanc = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_events(mut self, path: impl Into<PathBuf>) -> Self {
        self.events = Some(path.into());
        self
    }
}

#[derive(Debug)]
pub struct IngestOutput {
    pub cohort: Cohort,
    pub summary: IngestSummary,
}

/// Load a cohort from disk.
///
/// Tables are read in dependency order: admissions register patients,
/// lines attach to patients, and events are classified against the lines
/// and visits already present.
pub fn load_cohort(files: &InputFiles, options: &AnalysisOptions) -> Result<IngestOutput> {
    let span = info_span!("ingest", range = %options.range);
    let _guard = span.enter();

    let mut cohort = Cohort::new();
    let mut summary = IngestSummary::default();

    let table = read_csv_table(&files.admissions, schema::admissions::TABLE)?;
    ingest_admissions(&table, options, &mut cohort, &mut summary)?;
    info!(table = %table.name, rows = table.rows.len(), "loaded admissions");

    let table = read_csv_table(&files.lines, schema::lines::TABLE)?;
    ingest_lines(&table, options, &mut cohort, &mut summary)?;
    info!(table = %table.name, rows = table.rows.len(), "loaded lines");

    if let Some(path) = &files.clabsi {
        load_events(path, schema::clabsi::TABLE, ingest_clabsi, options, &mut cohort, &mut summary)?;
    }
    if let Some(path) = &files.clanc {
        load_events(path, schema::clanc::TABLE, ingest_clanc, options, &mut cohort, &mut summary)?;
    }
    if let Some(path) = &files.events {
        load_events(
            path,
            schema::events::TABLE,
            ingest_combined_events,
            options,
            &mut cohort,
            &mut summary,
        )?;
    }

    summary.patients = cohort.len();
    info!(
        patients = summary.patients,
        visits = summary.visits,
        lines = summary.lines,
        clabsi = summary.clabsi_events,
        clanc = summary.clanc_events,
        skipped = summary.skipped.len(),
        "ingestion complete"
    );
    Ok(IngestOutput { cohort, summary })
}

type EventIngest =
    fn(&CsvTable, &AnalysisOptions, &mut Cohort, &mut IngestSummary) -> Result<()>;

fn load_events(
    path: &Path,
    kind: &str,
    ingest: EventIngest,
    options: &AnalysisOptions,
    cohort: &mut Cohort,
    summary: &mut IngestSummary,
) -> Result<()> {
    let table = read_csv_table(path, kind)?;
    ingest(&table, options, cohort, summary)?;
    info!(table = %table.name, rows = table.rows.len(), "loaded events");
    Ok(())
}
