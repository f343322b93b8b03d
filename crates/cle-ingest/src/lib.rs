//! Central line event ingestion.
//!
//! Reads admission, line and event CSV files into a [`Cohort`], validating
//! the schema as it goes and clipping every span to the analysis range once.
//! Schema violations abort with an [`IngestError`]; rows that only reference
//! unknown patients or lines are skipped and counted in the
//! [`IngestSummary`].
//!
//! [`Cohort`]: cle_model::Cohort

mod admissions;
mod csv_table;
mod error;
mod events;
mod lines;
mod loader;
mod schema;
mod summary;
mod values;

pub use admissions::ingest_admissions;
pub use csv_table::{CsvRow, CsvTable, parse_csv_table, read_csv_table};
pub use error::{IngestError, Result};
pub use events::{ingest_clabsi, ingest_clanc, ingest_combined_events};
pub use lines::ingest_lines;
pub use loader::{IngestOutput, InputFiles, load_cohort};
pub use schema::{CATALOG, ColumnSpec};
pub use summary::{IngestSummary, SkipReason, SkippedRow};
pub use values::{parse_date, parse_i64};
