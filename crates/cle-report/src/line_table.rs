//! `Output Individual Line`: one row per line.
//!
//! CLABSI columns hold the line's fractional share of each infection, so they
//! may be non-integral when lines were in place concurrently.

use std::io::Write;

use anyhow::Result;

use cle_core::{LineMetrics, SurveillanceReport};

use crate::format::{Cell, Column, render_table, write_table};

const COLUMNS: &[Column<LineMetrics>] = &[
    Column {
        header: "Line ID",
        cell: |line| Cell::Int(line.line_id.get()),
    },
    Column {
        header: "Patient ID",
        cell: |line| Cell::Int(line.patient_id.get()),
    },
    Column {
        header: "Line Type",
        cell: |line| Cell::Text(line.line_type.clone()),
    },
    Column {
        header: "Number of Lumens",
        cell: |line| Cell::Int(i64::from(line.lumens)),
    },
    Column {
        header: "Date of Insertion (or first evaluation)",
        cell: |line| Cell::Date(line.in_date),
    },
    Column {
        header: "Date of Removal (or last evaluation)",
        cell: |line| Cell::Date(line.out_date),
    },
    Column {
        header: "Removal Reason",
        cell: |line| line.removal_reason.clone().map_or(Cell::Empty, Cell::Text),
    },
    Column {
        header: "Line Days",
        cell: |line| Cell::Int(line.days),
    },
    Column {
        header: "Lumen Days",
        cell: |line| Cell::Int(line.lumen_days),
    },
    Column {
        header: "Inpatient Line Days",
        cell: |line| Cell::Int(line.inpatient_days),
    },
    Column {
        header: "Outpatient Line Days",
        cell: |line| Cell::Int(line.outpatient_days),
    },
    Column {
        header: "Inpatient Lumen Days",
        cell: |line| Cell::Int(line.inpatient_lumen_days),
    },
    Column {
        header: "Outpatient Lumen Days",
        cell: |line| Cell::Int(line.outpatient_lumen_days),
    },
    Column {
        header: "CLABSI",
        cell: |line| Cell::Decimal(line.clabsi_weight),
    },
    Column {
        header: "Inpatient CLABSI",
        cell: |line| Cell::Decimal(line.clabsi_inpatient_weight),
    },
    Column {
        header: "Outpatient CLABSI",
        cell: |line| Cell::Decimal(line.clabsi_outpatient_weight),
    },
    Column {
        header: "CLABSI Rate (x1000)",
        cell: |line| Cell::Decimal(line.clabsi_rate),
    },
    Column {
        header: "CLANC",
        cell: |line| Cell::flag(line.clanc),
    },
    Column {
        header: "Inpatient CLANC",
        cell: |line| Cell::flag(line.clanc_inpatient),
    },
    Column {
        header: "CLANC Rate (x1000)",
        cell: |line| Cell::Decimal(line.clanc_rate),
    },
    Column {
        header: "ALL EVENTS",
        cell: |line| Cell::Decimal(line.events),
    },
    Column {
        header: "ALL EVENT RATE (x1000)",
        cell: |line| Cell::Decimal(line.event_rate),
    },
];

pub fn write_line_table<W: Write>(writer: W, report: &SurveillanceReport) -> Result<()> {
    write_table(writer, COLUMNS, &report.lines)
}

pub fn render_line_table(report: &SurveillanceReport) -> Result<String> {
    render_table(COLUMNS, &report.lines)
}
