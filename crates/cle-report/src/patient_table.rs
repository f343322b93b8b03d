//! `Output Individual Patient`: one row per patient and a population row.

use std::io::Write;

use anyhow::Result;

use cle_core::{EventCounts, Exposure, PatientMetrics, PopulationTotals, Rates, SurveillanceReport};

use crate::format::{Cell, Column, render_table, write_table};

/// Identifier cell of the summary row.
pub const POPULATION_LABEL: &str = "Population Total";

struct PatientRow {
    label: String,
    exposure: Exposure,
    events: EventCounts,
    rates: Rates,
}

impl From<&PatientMetrics> for PatientRow {
    fn from(metrics: &PatientMetrics) -> Self {
        Self {
            label: metrics.patient_id.to_string(),
            exposure: metrics.exposure,
            events: metrics.events,
            rates: metrics.rates,
        }
    }
}

impl From<&PopulationTotals> for PatientRow {
    fn from(totals: &PopulationTotals) -> Self {
        Self {
            label: POPULATION_LABEL.to_string(),
            exposure: totals.exposure,
            events: totals.events,
            rates: totals.rates,
        }
    }
}

const COLUMNS: &[Column<PatientRow>] = &[
    Column {
        header: "Patient ID",
        cell: |row| Cell::Text(row.label.clone()),
    },
    Column {
        header: "Total Lines",
        cell: |row| Cell::count(row.exposure.lines),
    },
    Column {
        header: "Sum of all Line Days",
        cell: |row| Cell::Int(row.exposure.line_days),
    },
    Column {
        header: "Mean Duration of Line (Days)",
        cell: |row| Cell::Decimal(row.rates.mean_line_days),
    },
    Column {
        header: "Total Days with any Catheter",
        cell: |row| Cell::Int(row.exposure.catheter_days),
    },
    Column {
        header: "Inpatient Days with any Catheter",
        cell: |row| Cell::Int(row.exposure.inpatient_catheter_days),
    },
    Column {
        header: "Outpatient Days with any Catheter",
        cell: |row| Cell::Int(row.exposure.outpatient_catheter_days),
    },
    Column {
        header: "Catheter Density",
        cell: |row| Cell::Decimal(row.rates.line_utilization),
    },
    Column {
        header: "Sum of all Lumen Days",
        cell: |row| Cell::Int(row.exposure.lumen_days),
    },
    Column {
        header: "Lumen Density",
        cell: |row| Cell::Decimal(row.rates.lumen_utilization),
    },
    Column {
        header: "Total Visit Days",
        cell: |row| Cell::Int(row.exposure.visit_days),
    },
    Column {
        header: "Inpatient Line Days",
        cell: |row| Cell::Int(row.exposure.inpatient_line_days),
    },
    Column {
        header: "Outpatient Line Days",
        cell: |row| Cell::Int(row.exposure.outpatient_line_days),
    },
    Column {
        header: "Inpatient Lumen Days",
        cell: |row| Cell::Int(row.exposure.inpatient_lumen_days),
    },
    Column {
        header: "Outpatient Lumen Days",
        cell: |row| Cell::Int(row.exposure.outpatient_lumen_days),
    },
    Column {
        header: "CLABSIs",
        cell: |row| Cell::count(row.events.clabsi),
    },
    Column {
        header: "CLABSI Rate (x1000)",
        cell: |row| Cell::Decimal(row.rates.clabsi),
    },
    Column {
        header: "Inpatient CLABSIs",
        cell: |row| Cell::count(row.events.clabsi_inpatient),
    },
    Column {
        header: "Inpatient CLABSI Rate (x1000)",
        cell: |row| Cell::Decimal(row.rates.clabsi_inpatient),
    },
    Column {
        header: "Outpatient CLABSIs",
        cell: |row| Cell::count(row.events.clabsi_outpatient),
    },
    Column {
        header: "Outpatient CLABSI Rate (x1000)",
        cell: |row| Cell::Decimal(row.rates.clabsi_outpatient),
    },
    Column {
        header: "CLABSIs without Line",
        cell: |row| Cell::count(row.events.clabsi_unattributed),
    },
    Column {
        header: "CLANCs",
        cell: |row| Cell::count(row.events.clanc),
    },
    Column {
        header: "CLANC Rate (x1000)",
        cell: |row| Cell::Decimal(row.rates.clanc),
    },
    Column {
        header: "Inpatient CLANCs",
        cell: |row| Cell::count(row.events.clanc_inpatient),
    },
    Column {
        header: "Inpatient CLANC Rate (x1000)",
        cell: |row| Cell::Decimal(row.rates.clanc_inpatient),
    },
    Column {
        header: "Outpatient CLANCs",
        cell: |row| Cell::count(row.events.clanc_outpatient),
    },
    Column {
        header: "Outpatient CLANC Rate (x1000)",
        cell: |row| Cell::Decimal(row.rates.clanc_outpatient),
    },
    Column {
        header: "ALL EVENTS",
        cell: |row| Cell::count(row.events.total()),
    },
    Column {
        header: "ALL EVENT RATE (x1000)",
        cell: |row| Cell::Decimal(row.rates.events),
    },
];

fn rows(report: &SurveillanceReport) -> Vec<PatientRow> {
    report
        .patients
        .iter()
        .map(PatientRow::from)
        .chain(std::iter::once(PatientRow::from(&report.population)))
        .collect()
}

/// Write the patient table as CSV, ending with the population row.
pub fn write_patient_table<W: Write>(writer: W, report: &SurveillanceReport) -> Result<()> {
    write_table(writer, COLUMNS, &rows(report))
}

pub fn render_patient_table(report: &SurveillanceReport) -> Result<String> {
    render_table(COLUMNS, &rows(report))
}
