//! Cell rendering shared by the CSV tables.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Ratios and rates are written with three decimals.
pub fn format_decimal(value: f64) -> String {
    // Keep rounding noise from rendering as -0.000.
    let value = if value.abs() < 0.5e-3 { 0.0 } else { value };
    format!("{value:.3}")
}

pub(crate) enum Cell {
    Int(i64),
    Decimal(f64),
    Text(String),
    Date(NaiveDate),
    Empty,
}

impl Cell {
    pub(crate) fn count(value: usize) -> Self {
        Cell::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }

    pub(crate) fn flag(value: bool) -> Self {
        Cell::Int(i64::from(value))
    }

    fn render(&self) -> String {
        match self {
            Cell::Int(value) => value.to_string(),
            Cell::Decimal(value) => format_decimal(*value),
            Cell::Text(value) => value.clone(),
            Cell::Date(value) => value.format("%Y-%m-%d").to_string(),
            Cell::Empty => String::new(),
        }
    }
}

pub(crate) struct Column<R> {
    pub header: &'static str,
    pub cell: fn(&R) -> Cell,
}

/// Write a header row and one record per row.
pub(crate) fn write_table<W: Write, R>(writer: W, columns: &[Column<R>], rows: &[R]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(columns.iter().map(|column| column.header))
        .context("write header")?;
    for (index, row) in rows.iter().enumerate() {
        csv.write_record(columns.iter().map(|column| (column.cell)(row).render()))
            .with_context(|| format!("write row {}", index + 1))?;
    }
    csv.flush().context("flush table")?;
    Ok(())
}

pub(crate) fn render_table<R>(columns: &[Column<R>], rows: &[R]) -> Result<String> {
    let mut buffer = Vec::new();
    write_table(&mut buffer, columns, rows)?;
    String::from_utf8(buffer).context("table is not valid UTF-8")
}
