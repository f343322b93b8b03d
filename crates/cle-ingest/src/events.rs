//! Event records: CLABSI files, CLANC files and combined event files.
//!
//! Events must be ingested after lines: classification looks at the lines
//! and visits already attached to the patient.

use chrono::NaiveDate;
use tracing::{debug, warn};

use cle_model::{AnalysisOptions, ClancRejection, Cohort, EventKind, LineId, PatientId};

use crate::csv_table::CsvTable;
use crate::error::Result;
use crate::schema::{ResolvedTable, clabsi, clanc, events};
use crate::summary::{IngestSummary, SkipReason};

pub fn ingest_clabsi(
    table: &CsvTable,
    options: &AnalysisOptions,
    cohort: &mut Cohort,
    summary: &mut IngestSummary,
) -> Result<()> {
    let resolved = ResolvedTable::new(table, clabsi::COLUMNS);
    let patient_col = resolved.require(clabsi::PATIENT)?;
    let date_col = resolved.require(clabsi::EVENT_DATE)?;

    let mut recorder = EventRecorder::new(&table.name, options, cohort, summary);
    for row in resolved.rows() {
        let cells = resolved.cells(row);
        let patient_id = PatientId::new(cells.int(patient_col)?);
        let date = cells.date(date_col)?;
        recorder.clabsi(row.number, patient_id, date);
    }
    Ok(())
}

pub fn ingest_clanc(
    table: &CsvTable,
    options: &AnalysisOptions,
    cohort: &mut Cohort,
    summary: &mut IngestSummary,
) -> Result<()> {
    let resolved = ResolvedTable::new(table, clanc::COLUMNS);
    let patient_col = resolved.require(clanc::PATIENT)?;
    let line_col = resolved.require(clanc::LINE_ID)?;
    let date_col = resolved.require(clanc::EVENT_DATE)?;

    let mut recorder = EventRecorder::new(&table.name, options, cohort, summary);
    for row in resolved.rows() {
        let cells = resolved.cells(row);
        let patient_id = PatientId::new(cells.int(patient_col)?);
        let line_id = LineId::new(cells.int(line_col)?);
        let date = cells.date(date_col)?;
        recorder.clanc(row.number, patient_id, line_id, date);
    }
    Ok(())
}

/// Combined event file: `(patient id, event date, event type, line id)`,
/// where the line id is only read for CLANC rows.
pub fn ingest_combined_events(
    table: &CsvTable,
    options: &AnalysisOptions,
    cohort: &mut Cohort,
    summary: &mut IngestSummary,
) -> Result<()> {
    let resolved = ResolvedTable::new(table, events::COLUMNS);
    let patient_col = resolved.require(events::PATIENT)?;
    let date_col = resolved.require(events::EVENT_DATE)?;
    let type_col = resolved.require(events::EVENT_TYPE)?;
    let line_col = resolved.optional(events::LINE_ID);

    let mut recorder = EventRecorder::new(&table.name, options, cohort, summary);
    for row in resolved.rows() {
        let cells = resolved.cells(row);
        let patient_id = PatientId::new(cells.int(patient_col)?);
        let date = cells.date(date_col)?;
        let kind: EventKind = cells
            .text(type_col)?
            .parse()
            .map_err(|_| cells.invalid_value(type_col, "CLABSI or CLANC"))?;
        match kind {
            EventKind::Clabsi => recorder.clabsi(row.number, patient_id, date),
            EventKind::Clanc => {
                let line_id = cells
                    .optional_int(line_col)?
                    .map(LineId::new)
                    .ok_or_else(|| cells.missing_value_for(events::LINE_ID))?;
                recorder.clanc(row.number, patient_id, line_id, date);
            }
        }
    }
    Ok(())
}

struct EventRecorder<'a> {
    table: &'a str,
    options: &'a AnalysisOptions,
    cohort: &'a mut Cohort,
    summary: &'a mut IngestSummary,
}

impl<'a> EventRecorder<'a> {
    fn new(
        table: &'a str,
        options: &'a AnalysisOptions,
        cohort: &'a mut Cohort,
        summary: &'a mut IngestSummary,
    ) -> Self {
        Self {
            table,
            options,
            cohort,
            summary,
        }
    }

    fn in_range(&mut self, row: usize, date: NaiveDate) -> bool {
        if self.options.range.contains(date) {
            return true;
        }
        debug!(table = %self.table, row, "event outside analysis range");
        self.summary.skip(self.table, row, SkipReason::OutOfRange);
        false
    }

    fn clabsi(&mut self, row: usize, patient_id: PatientId, date: NaiveDate) {
        if !self.in_range(row, date) {
            return;
        }
        let Some(patient) = self.cohort.get_mut(patient_id) else {
            warn!(table = %self.table, row, "CLABSI references unknown patient; skipping");
            self.summary.skip(self.table, row, SkipReason::UnknownPatient);
            return;
        };
        let event = patient.record_clabsi(date);
        if !event.is_attributed() {
            debug!(table = %self.table, row, "CLABSI has no line in place on its date");
        }
        self.summary.clabsi_events += 1;
    }

    fn clanc(&mut self, row: usize, patient_id: PatientId, line_id: LineId, date: NaiveDate) {
        if !self.in_range(row, date) {
            return;
        }
        let Some(patient) = self.cohort.get_mut(patient_id) else {
            warn!(table = %self.table, row, "CLANC references unknown patient; skipping");
            self.summary.skip(self.table, row, SkipReason::UnknownPatient);
            return;
        };
        match patient.record_clanc(line_id, date) {
            Ok(_) => self.summary.clanc_events += 1,
            Err(ClancRejection::UnknownLine) => {
                warn!(table = %self.table, row, "CLANC references unknown line; skipping");
                self.summary.skip(self.table, row, SkipReason::UnknownLine);
            }
            Err(ClancRejection::AlreadyRecorded) => {
                warn!(table = %self.table, row, "line already has a CLANC; skipping");
                self.summary.skip(self.table, row, SkipReason::DuplicateClanc);
            }
        }
    }
}
