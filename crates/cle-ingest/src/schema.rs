//! Column layouts for the input tables.
//!
//! Columns are matched by header name first (ignoring case, spacing and
//! punctuation, with aliases), then by the column's conventional position
//! in spreadsheet exports. A positional match never takes a header that
//! names another column of the table, and optional columns only match by
//! position when no header in the file is recognized at all.

use chrono::NaiveDate;

use crate::csv_table::{CsvRow, CsvTable};
use crate::error::{IngestError, Result};
use crate::values::{parse_date, parse_i64};

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub position: usize,
}

impl ColumnSpec {
    const fn new(name: &'static str, aliases: &'static [&'static str], position: usize) -> Self {
        Self {
            name,
            aliases,
            position,
        }
    }

    fn matches(&self, header: &str) -> bool {
        let key = header_key(header);
        !key.is_empty()
            && (key == header_key(self.name)
                || self.aliases.iter().any(|alias| key == header_key(alias)))
    }
}

fn header_key(header: &str) -> String {
    header
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

pub const PATIENT_ID: ColumnSpec =
    ColumnSpec::new("patient id", &["patient", "mrn", "subject id", "pid"], 0);

pub mod admissions {
    use super::{ColumnSpec, PATIENT_ID};

    pub const TABLE: &str = "admissions";
    pub const PATIENT: ColumnSpec = PATIENT_ID;
    pub const IN_DATE: ColumnSpec = ColumnSpec::new(
        "in date",
        &["admit date", "admission date", "check in date", "check in"],
        1,
    );
    pub const OUT_DATE: ColumnSpec = ColumnSpec::new(
        "out date",
        &["discharge date", "check out date", "check out"],
        2,
    );
    pub const COLUMNS: &[ColumnSpec] = &[PATIENT, IN_DATE, OUT_DATE];
}

pub mod lines {
    use super::{ColumnSpec, PATIENT_ID};

    pub const TABLE: &str = "lines";
    pub const PATIENT: ColumnSpec = PATIENT_ID;
    pub const LINE_ID: ColumnSpec = ColumnSpec::new("line id", &["line", "line number"], 1);
    pub const LINE_TYPE: ColumnSpec = ColumnSpec::new("line type", &["type", "catheter type"], 2);
    pub const LUMENS: ColumnSpec =
        ColumnSpec::new("lumens", &["number of lumens", "lumen count"], 3);
    pub const IN_DATE: ColumnSpec = ColumnSpec::new(
        "in date",
        &["insertion date", "date of insertion", "first evaluation"],
        4,
    );
    pub const OUT_DATE: ColumnSpec =
        ColumnSpec::new("out date", &["removal date", "date of removal"], 5);
    pub const FALLBACK_OUT_DATE: ColumnSpec = ColumnSpec::new(
        "last evaluation",
        &["fallback out date", "last evaluation date"],
        6,
    );
    pub const REMOVAL_REASON: ColumnSpec =
        ColumnSpec::new("removal reason", &["reason for removal", "reason"], 7);
    pub const COLUMNS: &[ColumnSpec] = &[
        PATIENT,
        LINE_ID,
        LINE_TYPE,
        LUMENS,
        IN_DATE,
        OUT_DATE,
        FALLBACK_OUT_DATE,
        REMOVAL_REASON,
    ];
}

pub mod clabsi {
    use super::{ColumnSpec, PATIENT_ID};

    pub const TABLE: &str = "clabsi events";
    pub const PATIENT: ColumnSpec = PATIENT_ID;
    pub const EVENT_DATE: ColumnSpec = ColumnSpec::new("event date", &["date"], 1);
    pub const COLUMNS: &[ColumnSpec] = &[PATIENT, EVENT_DATE];
}

pub mod clanc {
    use super::{ColumnSpec, PATIENT_ID};

    pub const TABLE: &str = "clanc events";
    pub const PATIENT: ColumnSpec = PATIENT_ID;
    pub const LINE_ID: ColumnSpec = ColumnSpec::new("line id", &["line", "line number"], 1);
    pub const EVENT_DATE: ColumnSpec = ColumnSpec::new("event date", &["date"], 2);
    pub const COLUMNS: &[ColumnSpec] = &[PATIENT, LINE_ID, EVENT_DATE];
}

pub mod events {
    use super::{ColumnSpec, PATIENT_ID};

    pub const TABLE: &str = "events";
    pub const PATIENT: ColumnSpec = PATIENT_ID;
    pub const EVENT_DATE: ColumnSpec = ColumnSpec::new("event date", &["date"], 1);
    pub const EVENT_TYPE: ColumnSpec = ColumnSpec::new("event type", &["type", "event"], 2);
    pub const LINE_ID: ColumnSpec = ColumnSpec::new("line id", &["line", "line number"], 3);
    pub const COLUMNS: &[ColumnSpec] = &[PATIENT, EVENT_DATE, EVENT_TYPE, LINE_ID];
}

/// Every input table with its columns, in positional order.
pub const CATALOG: &[(&str, &[ColumnSpec])] = &[
    (admissions::TABLE, admissions::COLUMNS),
    (lines::TABLE, lines::COLUMNS),
    (clabsi::TABLE, clabsi::COLUMNS),
    (clanc::TABLE, clanc::COLUMNS),
    (events::TABLE, events::COLUMNS),
];

/// Column indices resolved against one table's header row.
pub struct ResolvedTable<'a> {
    table: &'a CsvTable,
    columns: &'static [ColumnSpec],
    /// Whether any header names a column of this table.
    named: bool,
}

impl<'a> ResolvedTable<'a> {
    pub fn new(table: &'a CsvTable, columns: &'static [ColumnSpec]) -> Self {
        let named = table
            .headers
            .iter()
            .any(|header| columns.iter().any(|column| column.matches(header)));
        Self {
            table,
            columns,
            named,
        }
    }

    pub fn rows(&self) -> &'a [CsvRow] {
        &self.table.rows
    }

    /// Locate a column that must be present.
    pub fn require(&self, spec: ColumnSpec) -> Result<Column> {
        self.locate(spec, true)
            .ok_or_else(|| IngestError::MissingColumn {
                table: self.table.name.clone(),
                column: spec.name,
            })
    }

    /// Locate a column that may be absent from the file.
    pub fn optional(&self, spec: ColumnSpec) -> Option<Column> {
        self.locate(spec, false)
    }

    fn locate(&self, spec: ColumnSpec, required: bool) -> Option<Column> {
        let headers = &self.table.headers;
        let by_name = headers.iter().position(|header| spec.matches(header));
        let index = by_name.or_else(|| {
            if !required && self.named {
                return None;
            }
            let header = headers.get(spec.position)?;
            (!self.names_other_column(spec, header)).then_some(spec.position)
        })?;
        Some(Column { spec, index })
    }

    fn names_other_column(&self, spec: ColumnSpec, header: &str) -> bool {
        self.columns
            .iter()
            .any(|column| column.name != spec.name && column.matches(header))
    }

    pub fn cells<'r>(&self, row: &'r CsvRow) -> Cells<'r> {
        Cells {
            table: self.table.name.clone(),
            row,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub spec: ColumnSpec,
    pub index: usize,
}

/// Typed access to one row's cells, producing schema errors that name the
/// table, column and row.
pub struct Cells<'r> {
    table: String,
    row: &'r CsvRow,
}

impl Cells<'_> {
    fn raw(&self, column: Column) -> &str {
        self.row.cell(column.index)
    }

    fn missing(&self, column: Column) -> IngestError {
        self.missing_value_for(column.spec)
    }

    fn invalid(&self, column: Column, expected: &'static str) -> IngestError {
        IngestError::InvalidValue {
            table: self.table.clone(),
            column: column.spec.name,
            row: self.row.number,
            value: self.raw(column).to_string(),
            expected,
        }
    }

    pub fn int(&self, column: Column) -> Result<i64> {
        self.optional_int(Some(column))?
            .ok_or_else(|| self.missing(column))
    }

    pub fn optional_int(&self, column: Option<Column>) -> Result<Option<i64>> {
        let Some(column) = column else {
            return Ok(None);
        };
        let raw = self.raw(column);
        if raw.is_empty() {
            return Ok(None);
        }
        parse_i64(raw)
            .map(Some)
            .ok_or_else(|| self.invalid(column, "an integer"))
    }

    pub fn date(&self, column: Column) -> Result<NaiveDate> {
        self.optional_date(Some(column))?
            .ok_or_else(|| self.missing(column))
    }

    pub fn optional_date(&self, column: Option<Column>) -> Result<Option<NaiveDate>> {
        let Some(column) = column else {
            return Ok(None);
        };
        let raw = self.raw(column);
        if raw.is_empty() {
            return Ok(None);
        }
        parse_date(raw)
            .map(Some)
            .ok_or_else(|| self.invalid(column, "a date"))
    }

    pub fn text(&self, column: Column) -> Result<String> {
        self.optional_text(Some(column))
            .ok_or_else(|| self.missing(column))
    }

    pub fn optional_text(&self, column: Option<Column>) -> Option<String> {
        let raw = self.raw(column?);
        (!raw.is_empty()).then(|| raw.to_string())
    }

    pub fn missing_value(&self, column: Column) -> IngestError {
        self.missing(column)
    }

    pub fn missing_value_for(&self, spec: ColumnSpec) -> IngestError {
        IngestError::MissingValue {
            table: self.table.clone(),
            column: spec.name,
            row: self.row.number,
        }
    }

    pub fn invalid_value(&self, column: Column, expected: &'static str) -> IngestError {
        self.invalid(column, expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_table::parse_csv_table;

    #[test]
    fn resolves_by_alias_before_position() {
        let table =
            parse_csv_table("admissions", "Discharge Date,MRN,Admit Date\n".as_bytes()).unwrap();
        let resolved = ResolvedTable::new(&table, admissions::COLUMNS);
        assert_eq!(resolved.require(admissions::PATIENT).unwrap().index, 1);
        assert_eq!(resolved.require(admissions::IN_DATE).unwrap().index, 2);
        assert_eq!(resolved.require(admissions::OUT_DATE).unwrap().index, 0);
    }

    #[test]
    fn falls_back_to_position() {
        let table = parse_csv_table("admissions", "A,B,C\n".as_bytes()).unwrap();
        let resolved = ResolvedTable::new(&table, admissions::COLUMNS);
        assert_eq!(resolved.require(admissions::OUT_DATE).unwrap().index, 2);
    }

    #[test]
    fn position_never_takes_a_header_naming_another_column() {
        let table = parse_csv_table("admissions", "Patient ID,Out Date,Ward\n".as_bytes()).unwrap();
        let err = ResolvedTable::new(&table, admissions::COLUMNS)
            .require(admissions::IN_DATE)
            .unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { column: "in date", .. }));

        let table = parse_csv_table(
            "lines",
            "Patient ID,Line ID,Line Type,Lumens,In Date,Out Date,Removal Reason\n".as_bytes(),
        )
        .unwrap();
        let resolved = ResolvedTable::new(&table, lines::COLUMNS);
        assert!(resolved.optional(lines::FALLBACK_OUT_DATE).is_none());
        assert_eq!(resolved.optional(lines::REMOVAL_REASON).unwrap().index, 6);
    }

    #[test]
    fn optional_columns_match_by_name_in_named_files() {
        let table = parse_csv_table(
            "events",
            "Patient ID,Event Date,Event Type,Ward\n".as_bytes(),
        )
        .unwrap();
        let resolved = ResolvedTable::new(&table, events::COLUMNS);
        assert!(resolved.optional(events::LINE_ID).is_none());

        let table = parse_csv_table("events", "A,B,C,D\n".as_bytes()).unwrap();
        let resolved = ResolvedTable::new(&table, events::COLUMNS);
        assert_eq!(resolved.optional(events::LINE_ID).unwrap().index, 3);
    }

    #[test]
    fn catalog_positions_are_sequential() {
        for (table, columns) in CATALOG {
            for (index, column) in columns.iter().enumerate() {
                assert_eq!(column.position, index, "{table}: {}", column.name);
            }
        }
    }

    #[test]
    fn missing_column_is_reported() {
        let table = parse_csv_table("clanc events", "Patient ID,Line ID\n".as_bytes()).unwrap();
        let err = ResolvedTable::new(&table, clanc::COLUMNS)
            .require(clanc::EVENT_DATE)
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingColumn {
                column: "event date",
                ..
            }
        ));
    }

    #[test]
    fn typed_cells_report_row_and_column() {
        let table = parse_csv_table("admissions", "Patient ID,In,Out\nx1,2024-01-01,\n".as_bytes())
            .unwrap();
        let resolved = ResolvedTable::new(&table, admissions::COLUMNS);
        let patient = resolved.require(admissions::PATIENT).unwrap();
        let out = resolved.require(admissions::OUT_DATE).unwrap();
        let cells = resolved.cells(&table.rows[0]);
        let err = cells.int(patient).unwrap_err();
        assert!(matches!(err, IngestError::InvalidValue { row: 2, .. }));
        let err = cells.date(out).unwrap_err();
        assert!(matches!(err, IngestError::MissingValue { row: 2, .. }));
    }
}
