//! Command-line parsing for the benchmark size-curve tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting and rendering code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{FigureKind, FitSpace, Predicate, Value};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sizes", version, about = "Fit and plot serialized-size benchmark curves")]
pub struct Cli {
    /// Directory holding the benchmark CSVs [env: SIZE_CURVES_DATA_DIR]
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a line (or polynomial) to two columns of a CSV, optionally per group.
    Fit(FitArgs),
    /// Build one of the benchmark figures, print its fits and plot it.
    Plot(PlotArgs),
    /// Launch the interactive TUI (the default when no subcommand is given).
    Tui(TuiArgs),
    /// Write synthetic benchmark CSVs with the harness layout.
    Sample(SampleArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// CSV file; relative paths are looked up in the data directory when not found as given.
    #[arg(long, value_name = "CSV")]
    pub file: PathBuf,

    /// Column used as x.
    #[arg(long, value_name = "COL")]
    pub x: String,

    /// Column used as y.
    #[arg(long, value_name = "COL")]
    pub y: String,

    /// Row filter, `COL=VALUE` or `COL==OTHER_COL` (repeatable, combined with AND).
    #[arg(long = "where", value_name = "PRED")]
    pub predicates: Vec<Predicate>,

    /// Fit one series per value of this column.
    #[arg(long, value_name = "COL")]
    pub group_by: Option<String>,

    /// Group values for `--group-by` (comma separated); every distinct value when omitted.
    #[arg(long, value_name = "V,...", value_delimiter = ',', value_parser = parse_value, requires = "group_by")]
    pub groups: Vec<Value>,

    /// Space the least-squares fit is computed in.
    #[arg(long, value_enum, default_value_t = FitSpace::Linear)]
    pub space: FitSpace,

    /// Polynomial degree (at least 1).
    #[arg(long, default_value_t = 1, value_parser = parse_degree)]
    pub degree: usize,

    /// Export fit rows to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Print fits as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct PlotArgs {
    /// Figure to build.
    #[arg(value_enum)]
    pub figure: FigureKind,

    /// `NumberAttributes` groups for the history tree figure (comma separated).
    #[arg(long, value_name = "V,...", value_delimiter = ',', value_parser = parse_value)]
    pub groups: Vec<Value>,

    /// Only use query proof rows with this sorting window `w`.
    #[arg(long, value_name = "W", value_parser = parse_value)]
    pub window: Option<Value>,

    /// Also write the figure as SVG.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,

    /// ASCII plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// ASCII plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Skip the ASCII plot (fit table only).
    #[arg(long)]
    pub no_ascii: bool,
}

#[derive(Debug, Parser, Clone, Default)]
pub struct TuiArgs {
    /// `NumberAttributes` groups for the history tree figure (comma separated).
    #[arg(long, value_name = "V,...", value_delimiter = ',', value_parser = parse_value)]
    pub groups: Vec<Value>,
}

#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Output directory (defaults to the data directory).
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Largest record count in the history tree tables.
    #[arg(long, default_value_t = 32_768)]
    pub records: usize,

    /// Largest attribute count.
    #[arg(long, default_value_t = 512)]
    pub attributes: usize,

    /// Records behind every query proof row.
    #[arg(long, default_value_t = 100_000)]
    pub query_records: usize,

    /// Relative Gaussian noise on generated sizes.
    #[arg(long, default_value_t = 0.01)]
    pub noise: f64,
}

fn parse_degree(s: &str) -> Result<usize, String> {
    let degree: usize = s.trim().parse().map_err(|e| format!("invalid degree '{s}': {e}"))?;
    if degree == 0 {
        return Err("degree must be at least 1".to_string());
    }
    Ok(degree)
}

fn parse_value(s: &str) -> Result<Value, String> {
    if s.trim().is_empty() {
        return Err("empty value".to_string());
    }
    Ok(Value::parse(s))
}
