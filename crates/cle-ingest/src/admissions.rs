//! Admission records: `(patient id, in-date, out-date)`.

use tracing::debug;

use cle_model::{AnalysisOptions, Cohort, DayInterval, EventKind, PatientId, Visit};

use crate::csv_table::CsvTable;
use crate::error::{IngestError, Result};
use crate::schema::{ResolvedTable, admissions};
use crate::summary::{IngestSummary, SkipReason};

/// Register every referenced patient and store their full-day visits.
///
/// Every admission row registers its patient, even when the visit itself is
/// dropped for being shorter than a day or outside the range. A visit that
/// ends just before the range is kept with an empty span while its discharge
/// grace still reaches the range start.
pub fn ingest_admissions(
    table: &CsvTable,
    options: &AnalysisOptions,
    cohort: &mut Cohort,
    summary: &mut IngestSummary,
) -> Result<()> {
    let resolved = ResolvedTable::new(table, admissions::COLUMNS);
    let patient_col = resolved.require(admissions::PATIENT)?;
    let in_col = resolved.require(admissions::IN_DATE)?;
    let out_col = resolved.require(admissions::OUT_DATE)?;

    for row in resolved.rows() {
        let cells = resolved.cells(row);
        let patient_id = PatientId::new(cells.int(patient_col)?);
        let check_in = cells.date(in_col)?;
        let check_out = cells.date(out_col)?;
        let span = DayInterval::new(check_in, check_out).map_err(|_| IngestError::InvalidSpan {
            table: table.name.clone(),
            row: row.number,
            start: check_in,
            end: check_out,
        })?;

        let patient = cohort.register(patient_id);
        if span.days() < 1 {
            debug!(table = %table.name, row = row.number, "skipping sub-day admission");
            summary.skip(&table.name, row.number, SkipReason::SubDayVisit);
            continue;
        }
        let reach = EventKind::max_discharge_grace_days();
        let Some(clipped) = options.range.clip_with_reach(&span, reach) else {
            debug!(table = %table.name, row = row.number, "admission outside analysis range");
            summary.skip(&table.name, row.number, SkipReason::OutOfRange);
            continue;
        };
        patient.add_visit(Visit::clipped(patient_id, span, clipped));
        summary.visits += 1;
    }
    Ok(())
}
