use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};

/// A CSV file held in memory: one header row plus trimmed data rows.
#[derive(Debug, Clone)]
pub struct CsvTable {
    /// Display name used in error messages, e.g. `lines (lines.csv)`.
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// 1-based line number in the source file.
    pub number: usize,
    pub cells: Vec<String>,
}

impl CsvRow {
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a CSV file from disk. `kind` names the table in error messages.
pub fn read_csv_table(path: &Path, kind: &str) -> Result<CsvTable> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("unknown");
    parse_csv_table(format!("{kind} ({file_name})"), file)
}

/// Parse CSV from any reader. Blank rows are dropped; the first remaining row
/// is the header.
pub fn parse_csv_table(name: impl Into<String>, reader: impl Read) -> Result<CsvTable> {
    let name = name.into();
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            table: name.clone(),
            source,
        })?;
        let number = record
            .position()
            .map_or(rows.len() + 1, |pos| pos.line() as usize);
        let cells: Vec<String> = record.iter().map(normalize_cell).collect();
        if cells.iter().all(|value| value.is_empty()) {
            continue;
        }
        if headers.is_none() {
            headers = Some(cells.iter().map(|value| normalize_header(value)).collect());
            continue;
        }
        rows.push(CsvRow { number, cells });
    }
    let Some(headers) = headers else {
        return Err(IngestError::EmptyCsv { table: name });
    };
    Ok(CsvTable {
        name,
        headers,
        rows,
    })
}
