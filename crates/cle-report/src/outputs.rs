//! Writing every output file of a run into one directory.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use cle_core::SurveillanceReport;

use crate::line_table::write_line_table;
use crate::patient_table::write_patient_table;

pub const PATIENT_TABLE_FILE: &str = "Output Individual Patient.csv";
pub const LINE_TABLE_FILE: &str = "Output Individual Line.csv";
pub const JSON_FILE: &str = "metrics.json";

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Also write the full report as JSON.
    pub json: bool,
}

/// Write the patient and line tables (and optionally JSON) to `output_dir`.
///
/// Returns the written paths in write order.
pub fn write_report_outputs(
    output_dir: &Path,
    report: &SurveillanceReport,
    options: &ReportOptions,
) -> Result<Vec<PathBuf>> {
    let span = info_span!("emit", json = options.json);
    let _guard = span.enter();

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;

    let mut outputs = Vec::new();

    let path = output_dir.join(PATIENT_TABLE_FILE);
    write_file(&path, |writer| write_patient_table(writer, report))?;
    outputs.push(path);

    let path = output_dir.join(LINE_TABLE_FILE);
    write_file(&path, |writer| write_line_table(writer, report))?;
    outputs.push(path);

    if options.json {
        let path = output_dir.join(JSON_FILE);
        write_file(&path, |writer| {
            serde_json::to_writer_pretty(writer, report).context("serialize report")
        })?;
        outputs.push(path);
    }

    info!(
        files = outputs.len(),
        patients = report.patients.len(),
        lines = report.lines.len(),
        "reports written"
    );
    Ok(outputs)
}

fn write_file(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> Result<()>,
) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).with_context(|| format!("write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}
