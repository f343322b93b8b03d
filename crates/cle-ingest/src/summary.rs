use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Why an input row was not turned into a model record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Record lies entirely outside the analysis range.
    OutOfRange,
    /// Admission shorter than one full day.
    SubDayVisit,
    /// Event references a patient with no admission or line record.
    UnknownPatient,
    /// Complication references a line the patient does not have.
    UnknownLine,
    /// A complication is already attributed to the referenced line.
    DuplicateClanc,
}

impl SkipReason {
    pub fn describe(self) -> &'static str {
        match self {
            SkipReason::OutOfRange => "outside analysis range",
            SkipReason::SubDayVisit => "admission shorter than one day",
            SkipReason::UnknownPatient => "unknown patient",
            SkipReason::UnknownLine => "unknown line",
            SkipReason::DuplicateClanc => "line already has a CLANC",
        }
    }

    /// Data-integrity skips, as opposed to expected filtering.
    pub fn is_reference_issue(self) -> bool {
        matches!(
            self,
            SkipReason::UnknownPatient | SkipReason::UnknownLine | SkipReason::DuplicateClanc
        )
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub table: String,
    pub row: usize,
    pub reason: SkipReason,
}

/// Counts of what ingestion produced and what it dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub patients: usize,
    pub visits: usize,
    pub lines: usize,
    pub clabsi_events: usize,
    pub clanc_events: usize,
    /// Patients first seen in the line file rather than the admission file.
    pub patients_from_lines: usize,
    pub skipped: Vec<SkippedRow>,
}

impl IngestSummary {
    pub fn skip(&mut self, table: &str, row: usize, reason: SkipReason) {
        self.skipped.push(SkippedRow {
            table: table.to_string(),
            row,
            reason,
        });
    }

    pub fn skipped_by_reason(&self) -> BTreeMap<SkipReason, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.skipped {
            *counts.entry(row.reason).or_insert(0) += 1;
        }
        counts
    }

    pub fn reference_issue_count(&self) -> usize {
        self.skipped
            .iter()
            .filter(|row| row.reason.is_reference_issue())
            .count()
    }
}
