use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cle_core::{EventCounts, Exposure, PopulationTotals, Rates};
use cle_ingest::IngestSummary;
use cle_report::format_decimal;

use cle_cli::types::RunResult;

pub fn print_summary(result: &RunResult) {
    println!("Range: {}", result.report.range);
    if result.dry_run {
        println!("Output: dry run, nothing written");
    } else {
        println!("Output: {}", result.output_dir.display());
        for path in &result.outputs {
            println!("  {}", path.display());
        }
    }
    print_population_table(&result.report.population);
    print_ingest_table(&result.ingest);
}

fn print_population_table(population: &PopulationTotals) {
    let PopulationTotals {
        patients,
        exposure,
        events,
        rates,
    } = population;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Metric"),
        header_cell("Total"),
        header_cell("Inpatient"),
        header_cell("Outpatient"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    table.add_row(vec![label_cell("Patients"), Cell::new(patients), dim_cell("-"), dim_cell("-")]);
    exposure_rows(&mut table, exposure);
    event_rows(&mut table, events, rates);
    table.add_row(vec![
        label_cell("Catheter density"),
        Cell::new(format_decimal(rates.line_utilization)),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    table.add_row(vec![
        label_cell("Lumen density"),
        Cell::new(format_decimal(rates.lumen_utilization)),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
}

fn exposure_rows(table: &mut Table, exposure: &Exposure) {
    table.add_row(vec![label_cell("Lines"), Cell::new(exposure.lines), dim_cell("-"), dim_cell("-")]);
    table.add_row(vec![
        label_cell("Line days"),
        Cell::new(exposure.line_days),
        Cell::new(exposure.inpatient_line_days),
        Cell::new(exposure.outpatient_line_days),
    ]);
    table.add_row(vec![
        label_cell("Lumen days"),
        Cell::new(exposure.lumen_days),
        Cell::new(exposure.inpatient_lumen_days),
        Cell::new(exposure.outpatient_lumen_days),
    ]);
    table.add_row(vec![
        label_cell("Catheter days"),
        Cell::new(exposure.catheter_days),
        Cell::new(exposure.inpatient_catheter_days),
        Cell::new(exposure.outpatient_catheter_days),
    ]);
}

fn event_rows(table: &mut Table, events: &EventCounts, rates: &Rates) {
    table.add_row(vec![
        label_cell("CLABSIs"),
        count_cell(events.clabsi, Color::Red),
        count_cell(events.clabsi_inpatient, Color::Red),
        count_cell(events.clabsi_outpatient, Color::Red),
    ]);
    table.add_row(vec![
        label_cell("CLABSI rate (x1000)"),
        rate_cell(rates.clabsi),
        rate_cell(rates.clabsi_inpatient),
        rate_cell(rates.clabsi_outpatient),
    ]);
    table.add_row(vec![
        label_cell("CLANCs"),
        count_cell(events.clanc, Color::Yellow),
        count_cell(events.clanc_inpatient, Color::Yellow),
        count_cell(events.clanc_outpatient, Color::Yellow),
    ]);
    table.add_row(vec![
        label_cell("CLANC rate (x1000)"),
        rate_cell(rates.clanc),
        rate_cell(rates.clanc_inpatient),
        rate_cell(rates.clanc_outpatient),
    ]);
    table.add_row(vec![
        label_cell("All events"),
        Cell::new(events.total()).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    table.add_row(vec![
        label_cell("All event rate (x1000)"),
        rate_cell(rates.events),
        dim_cell("-"),
        dim_cell("-"),
    ]);
}

fn print_ingest_table(summary: &IngestSummary) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Ingested"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![label_cell("Visits"), Cell::new(summary.visits)]);
    table.add_row(vec![label_cell("Lines"), Cell::new(summary.lines)]);
    table.add_row(vec![label_cell("CLABSI events"), Cell::new(summary.clabsi_events)]);
    table.add_row(vec![label_cell("CLANC events"), Cell::new(summary.clanc_events)]);
    if summary.patients_from_lines > 0 {
        table.add_row(vec![
            label_cell("Patients only in line file"),
            count_cell(summary.patients_from_lines, Color::Yellow),
        ]);
    }
    for (reason, count) in summary.skipped_by_reason() {
        let color = if reason.is_reference_issue() {
            Color::Yellow
        } else {
            Color::DarkGrey
        };
        table.add_row(vec![
            dim_cell(format!("Skipped: {reason}")),
            count_cell(count, color),
        ]);
    }
    println!();
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn label_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn rate_cell(rate: f64) -> Cell {
    Cell::new(format_decimal(rate))
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
