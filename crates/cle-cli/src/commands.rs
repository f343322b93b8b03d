use anyhow::Result;
use comfy_table::Table;

use cle_ingest::{CATALOG, InputFiles};
use cle_model::AnalysisOptions;
use cle_report::ReportOptions;

use cle_cli::pipeline::{build_range, default_output_dir, run};
use cle_cli::types::{RunConfig, RunResult};

use crate::cli::AnalyzeArgs;
use crate::summary::apply_table_style;

pub fn run_columns() {
    let mut table = Table::new();
    table.set_header(vec!["Table", "Position", "Column", "Aliases"]);
    apply_table_style(&mut table);
    for (name, columns) in CATALOG {
        for column in *columns {
            table.add_row(vec![
                (*name).to_string(),
                (column.position + 1).to_string(),
                column.name.to_string(),
                column.aliases.join(", "),
            ]);
        }
    }
    println!("{table}");
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<RunResult> {
    let range = build_range(args.start, args.end)?;
    let mut inputs = InputFiles::new(&args.admissions, &args.lines);
    inputs.clabsi = args.clabsi.clone();
    inputs.clanc = args.clanc.clone();
    inputs.events = args.events.clone();

    let config = RunConfig {
        inputs,
        options: AnalysisOptions::new().with_range(range),
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| default_output_dir(&args.admissions)),
        report: ReportOptions { json: args.json },
        dry_run: args.dry_run,
    };
    run(&config)
}
