//! Report generation for central line surveillance metrics.
//!
//! - **Patient table**: one row per patient plus a `Population Total` row
//! - **Line table**: one row per line with its share of each event
//! - **JSON**: the full [`SurveillanceReport`](cle_core::SurveillanceReport)

mod format;
mod line_table;
mod outputs;
mod patient_table;

pub use format::format_decimal;
pub use line_table::{render_line_table, write_line_table};
pub use outputs::{
    JSON_FILE, LINE_TABLE_FILE, PATIENT_TABLE_FILE, ReportOptions, write_report_outputs,
};
pub use patient_table::{POPULATION_LABEL, render_patient_table, write_patient_table};
