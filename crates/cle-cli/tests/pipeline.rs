//! Integration tests for the analysis run.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::TempDir;

use cle_cli::pipeline::{build_range, run};
use cle_cli::types::RunConfig;
use cle_ingest::{InputFiles, SkipReason};
use cle_model::{AnalysisOptions, PatientId};
use cle_report::{JSON_FILE, LINE_TABLE_FILE, PATIENT_TABLE_FILE, ReportOptions};

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn inputs(dir: &Path, admissions: &str) -> InputFiles {
    let admissions = write(dir, "admissions.csv", admissions);
    let lines = write(
        dir,
        "lines.csv",
        "MRN,Line,Type,Lumens,Insertion Date,Removal Date,Last Evaluation,Reason\n\
         1,1,PICC,2,2024-01-02,2024-01-08,,Completed\n\
         1,2,CVC,1,2024-01-06,,2024-01-12,\n",
    );
    let events = write(
        dir,
        "events.csv",
        "Patient ID,Date,Event Type,Line ID\n\
         1,2024-01-07,CLABSI,\n\
         1,2024-01-11,CLANC,2\n\
         5,2024-01-07,CLABSI,\n",
    );
    InputFiles::new(admissions, lines).with_events(events)
}

fn config(dir: &Path, inputs: InputFiles) -> RunConfig {
    RunConfig {
        inputs,
        options: AnalysisOptions::default(),
        output_dir: dir.join("output"),
        report: ReportOptions { json: true },
        dry_run: false,
    }
}

const ADMISSIONS: &str = "Patient ID,Admit Date,Discharge Date\n1,2024-01-01,2024-01-10\n";

#[test]
fn run_writes_reports_and_summarizes() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path(), inputs(dir.path(), ADMISSIONS));
    let result = run(&config).unwrap();

    assert_eq!(result.outputs.len(), 3);
    for name in [PATIENT_TABLE_FILE, LINE_TABLE_FILE, JSON_FILE] {
        assert!(config.output_dir.join(name).is_file(), "{name}");
    }

    let patient = result.report.patient(PatientId::new(1)).unwrap();
    assert_eq!(patient.exposure.lines, 2);
    // Jan 2..Jan 12, overlap counted once
    assert_eq!(patient.exposure.catheter_days, 10);
    assert_eq!(patient.exposure.line_days, 12);
    assert_eq!(patient.events.clabsi, 1);
    assert_eq!(patient.events.clanc, 1);
    assert_eq!(patient.events.clanc_outpatient, 1);
    assert_eq!(result.ingest.skipped_by_reason()[&SkipReason::UnknownPatient], 1);

    let lines = fs::read_to_string(config.output_dir.join(LINE_TABLE_FILE)).unwrap();
    assert_eq!(lines.lines().count(), 3);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut config = config(dir.path(), inputs(dir.path(), ADMISSIONS));
    config.dry_run = true;
    let result = run(&config).unwrap();
    assert!(result.outputs.is_empty());
    assert!(!config.output_dir.exists());
    assert_eq!(result.report.population.patients, 1);
}

#[test]
fn schema_error_aborts_before_writing() {
    let dir = TempDir::new().unwrap();
    let admissions = "Patient ID,Admit Date,Discharge Date\n1,2024-01-01,not a date\n";
    let config = config(dir.path(), inputs(dir.path(), admissions));
    let err = run(&config).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.starts_with("ingestion failed: "), "{message}");
    assert!(message.contains("admissions (admissions.csv) row 2"), "{message}");
    assert!(message.contains("'out date'"), "{message}");
    assert!(!config.output_dir.exists());
}

#[test]
fn range_limits_the_run() {
    let dir = TempDir::new().unwrap();
    let mut config = config(dir.path(), inputs(dir.path(), ADMISSIONS));
    let jan = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
    config.options = AnalysisOptions::new().with_range(build_range(Some(jan(8)), None).unwrap());
    let result = run(&config).unwrap();
    let patient = result.report.patient(PatientId::new(1)).unwrap();
    // Line 1 is removed on the range start day: kept, but with no days.
    assert_eq!(patient.exposure.lines, 2);
    assert_eq!(patient.exposure.line_days, 4);
    assert_eq!(patient.exposure.catheter_days, 4);
    assert_eq!(patient.events.clabsi, 0);
    assert_eq!(patient.events.clanc, 1);
}
