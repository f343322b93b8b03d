//! CLI argument definitions for the central line event calculator.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use cle_cli::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "central-line-events",
    version,
    about = "Central line infection surveillance - CLABSI and CLANC rates per 1000 catheter-days",
    long_about = "Compute central-line-associated infection surveillance metrics.\n\n\
                  Reads admission, line and event CSV files and writes per-patient and\n\
                  per-line reports with rates per 1000 catheter-days."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Logging setup implied by the flags.
    ///
    /// `--log-level` beats `-v`/`-q`, and either one disables `RUST_LOG`.
    pub fn log_config(&self) -> LogConfig {
        let level_filter = self.log_level.map_or_else(
            || self.verbosity.tracing_level_filter(),
            LevelFilter::from,
        );
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        LogConfig {
            level_filter,
            use_env_filter: !(self.verbosity.is_present() || self.log_level.is_some()),
            with_ansi,
            format: self.log_format.into(),
            log_file: self.log_file.clone(),
            ..LogConfig::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute patient and line metrics and write the reports.
    Analyze(AnalyzeArgs),

    /// List the recognized input columns, their aliases and positions.
    Columns,
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Admission records: patient id, in-date, out-date.
    #[arg(long, value_name = "CSV")]
    pub admissions: PathBuf,

    /// Line records: patient id, line id, type, lumens, in/out dates.
    #[arg(long, value_name = "CSV")]
    pub lines: PathBuf,

    /// CLABSI records: patient id, event date.
    #[arg(long, value_name = "CSV")]
    pub clabsi: Option<PathBuf>,

    /// CLANC records: patient id, line id, event date.
    #[arg(long, value_name = "CSV")]
    pub clanc: Option<PathBuf>,

    /// Combined event records: patient id, event date, event type, line id.
    #[arg(long, value_name = "CSV")]
    pub events: Option<PathBuf>,

    /// First day of the analysis range (inclusive).
    #[arg(long, value_name = "DATE", value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,

    /// End of the analysis range (exclusive).
    #[arg(long, value_name = "DATE", value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,

    /// Output directory for the reports (default: <ADMISSIONS_DIR>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Also write the full report as metrics.json.
    #[arg(long)]
    pub json: bool,

    /// Compute and print the summary without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    cle_ingest::parse_date(value).ok_or_else(|| format!("'{value}' is not a recognized date"))
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_analyze_with_range() {
        let cli = Cli::try_parse_from([
            "central-line-events",
            "analyze",
            "--admissions",
            "admit.csv",
            "--lines",
            "lines.csv",
            "--clabsi",
            "clabsi.csv",
            "--start",
            "2024-01-01",
            "--end",
            "06/30/2024",
            "--dry-run",
        ])
        .unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(args.end, NaiveDate::from_ymd_opt(2024, 6, 30));
        assert!(args.dry_run);
        assert!(args.clanc.is_none());
    }

    #[test]
    fn log_level_flag_overrides_verbosity_and_env() {
        let cli = Cli::try_parse_from([
            "central-line-events",
            "-v",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--color",
            "never",
            "columns",
        ])
        .unwrap();
        let config = cli.log_config();
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);
        assert!(!config.with_ansi);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn default_logging_defers_to_env() {
        let cli = Cli::try_parse_from(["central-line-events", "columns"]).unwrap();
        let config = cli.log_config();
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
    }

    #[test]
    fn rejects_unparseable_dates() {
        let result = Cli::try_parse_from([
            "central-line-events",
            "analyze",
            "--admissions",
            "a.csv",
            "--lines",
            "l.csv",
            "--start",
            "next week",
        ]);
        assert!(result.is_err());
    }
}
