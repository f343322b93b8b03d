//! Line records: patient, line id, type, lumens, in/out dates, removal reason.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use cle_model::{AnalysisOptions, Cohort, DayInterval, Line, LineId, PatientId};

use crate::csv_table::CsvTable;
use crate::error::{IngestError, Result};
use crate::schema::{ResolvedTable, lines};
use crate::summary::{IngestSummary, SkipReason};

/// Attach every in-range line to its patient, then sort each patient's lines
/// chronologically.
///
/// The out-date comes from the removal column, or from the last-evaluation
/// column when removal is blank. A line for a patient with no admission row
/// registers that patient. A line removed on the range start day is kept with
/// an empty span, since it was still in place that day. Line ids must be
/// unique per patient across the whole file, in range or not.
pub fn ingest_lines(
    table: &CsvTable,
    options: &AnalysisOptions,
    cohort: &mut Cohort,
    summary: &mut IngestSummary,
) -> Result<()> {
    let resolved = ResolvedTable::new(table, lines::COLUMNS);
    let patient_col = resolved.require(lines::PATIENT)?;
    let line_col = resolved.require(lines::LINE_ID)?;
    let type_col = resolved.require(lines::LINE_TYPE)?;
    let lumen_col = resolved.require(lines::LUMENS)?;
    let in_col = resolved.require(lines::IN_DATE)?;
    let out_col = resolved.require(lines::OUT_DATE)?;
    let fallback_col = resolved.optional(lines::FALLBACK_OUT_DATE);
    let reason_col = resolved.optional(lines::REMOVAL_REASON);

    let mut seen = BTreeSet::new();
    for row in resolved.rows() {
        let cells = resolved.cells(row);
        let patient_id = PatientId::new(cells.int(patient_col)?);
        let line_id = LineId::new(cells.int(line_col)?);
        let line_type = cells.text(type_col)?;
        let lumens = cells.int(lumen_col)?;
        let lumens = u32::try_from(lumens)
            .ok()
            .filter(|count| *count >= 1)
            .ok_or_else(|| cells.invalid_value(lumen_col, "a positive lumen count"))?;
        let in_date = cells.date(in_col)?;
        let out_date = match cells.optional_date(Some(out_col))? {
            Some(date) => date,
            None => cells
                .optional_date(fallback_col)?
                .ok_or_else(|| cells.missing_value(out_col))?,
        };
        let removal_reason = cells.optional_text(reason_col);
        let span = DayInterval::new(in_date, out_date).map_err(|_| IngestError::InvalidSpan {
            table: table.name.clone(),
            row: row.number,
            start: in_date,
            end: out_date,
        })?;

        if !seen.insert((patient_id, line_id)) {
            return Err(IngestError::DuplicateLine {
                table: table.name.clone(),
                row: row.number,
                line: line_id.get(),
            });
        }

        let Some(clipped) = options.range.clip_with_reach(&span, 0) else {
            debug!(table = %table.name, row = row.number, "line outside analysis range");
            summary.skip(&table.name, row.number, SkipReason::OutOfRange);
            continue;
        };

        if !cohort.contains(patient_id) {
            warn!(
                table = %table.name,
                row = row.number,
                "line references a patient with no admission record; registering"
            );
            summary.patients_from_lines += 1;
        }
        cohort.register(patient_id).add_line(Line {
            patient_id,
            line_id,
            line_type,
            lumens,
            span: clipped,
            recorded: span,
            removal_reason,
            clanc: None,
        });
        summary.lines += 1;
    }

    for patient in cohort.patients_mut() {
        patient.sort_lines();
    }
    Ok(())
}
