//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the data directory
//! - runs ad-hoc fits and builds figures
//! - prints reports/plots
//! - writes optional exports

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::cli::{Command, FitArgs, PlotArgs, SampleArgs, TuiArgs};
use crate::domain::{FigureConfig, FitRequest, SampleConfig, Value, DEFAULT_DATA_DIR};
use crate::error::AppError;

pub mod pipeline;

/// Environment variable overriding the default data directory.
pub const DATA_DIR_ENV: &str = "SIZE_CURVES_DATA_DIR";

/// Entry point for the `sizes` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine.
    dotenvy::dotenv().ok();

    // Plain `sizes` opens the TUI. Clap requires a subcommand name, so argv is
    // rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let data_dir = resolve_data_dir(cli.data_dir, std::env::var(DATA_DIR_ENV).ok());
    log::debug!("data directory: {}", data_dir.display());

    match cli.command {
        Command::Fit(args) => handle_fit(args, &data_dir),
        Command::Plot(args) => handle_plot(args, data_dir),
        Command::Tui(args) => handle_tui(args, data_dir),
        Command::Sample(args) => handle_sample(args, data_dir),
    }
}

/// `--data-dir` wins over the environment, which wins over the default.
fn resolve_data_dir(flag: Option<PathBuf>, env: Option<String>) -> PathBuf {
    flag.or_else(|| env.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

fn handle_fit(args: FitArgs, data_dir: &Path) -> Result<(), AppError> {
    let request = fit_request_from_args(&args);
    let outcome = pipeline::run_fit_request(&request, data_dir)?;
    let rows = outcome.rows();
    let skipped = outcome.skipped();

    if args.json {
        println!("{}", crate::io::fits_json(&rows, &skipped)?);
    } else {
        match &outcome {
            pipeline::FitOutcome::Single { .. } => print!("{}", crate::report::format_fit_table(&rows)),
            pipeline::FitOutcome::Grouped { fits, .. } => print!("{}", crate::report::format_group_fits(fits)),
        }
    }

    if let Some(path) = &args.export {
        crate::io::write_fits_csv(path, &rows, &skipped)?;
    }
    Ok(())
}

fn handle_plot(args: PlotArgs, data_dir: PathBuf) -> Result<(), AppError> {
    let config = figure_config(data_dir, args.groups.clone(), args.window.clone());
    let figure = crate::figures::build_figure(args.figure, &config)?;

    if !args.no_ascii {
        println!("{}", crate::plot::render_ascii(&figure, args.width, args.height));
    }
    print!("{}", crate::report::format_figure_summary(&figure));

    if let Some(path) = &args.svg {
        crate::plot::write_svg(&figure, path, crate::plot::DEFAULT_SVG_SIZE)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn handle_tui(args: TuiArgs, data_dir: PathBuf) -> Result<(), AppError> {
    crate::tui::run(figure_config(data_dir, args.groups, None))
}

fn handle_sample(args: SampleArgs, data_dir: PathBuf) -> Result<(), AppError> {
    let config = SampleConfig {
        out_dir: args.out.unwrap_or(data_dir),
        seed: args.seed,
        max_records: args.records,
        max_attributes: args.attributes,
        query_records: args.query_records,
        noise_rel: args.noise,
    };
    let tables = crate::data::generate_benchmarks(&config)?;
    for path in crate::io::write_tables(&config.out_dir, &tables)? {
        println!("wrote {}", path.display());
    }
    Ok(())
}

/// Empty `groups` keeps the default history tree groups.
fn figure_config(data_dir: PathBuf, groups: Vec<Value>, window: Option<Value>) -> FigureConfig {
    let mut config = FigureConfig::new(data_dir);
    if !groups.is_empty() {
        config.groups = groups;
    }
    config.window = window;
    config
}

pub fn fit_request_from_args(args: &FitArgs) -> FitRequest {
    FitRequest {
        file: args.file.clone(),
        x_column: args.x.clone(),
        y_column: args.y.clone(),
        predicates: args.predicates.clone(),
        group_by: args.group_by.clone(),
        groups: args.groups.clone(),
        space: args.space,
        degree: args.degree,
    }
}

/// Rewrite argv so `sizes` defaults to `sizes tui`.
///
/// Rules:
/// - `sizes`                          -> `sizes tui`
/// - `sizes --data-dir D`             -> `sizes tui --data-dir D`
/// - `sizes --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let has_subcommand = argv[1..]
        .iter()
        .any(|a| matches!(a.as_str(), "fit" | "plot" | "tui" | "sample"));
    if has_subcommand {
        return argv;
    }

    // Only flags: treat them as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is so clap reports the unknown subcommand.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(args(&["sizes"])), args(&["sizes", "tui"]));
    }

    #[test]
    fn leading_flags_go_to_tui() {
        assert_eq!(
            rewrite_args(args(&["sizes", "--groups", "2,8"])),
            args(&["sizes", "tui", "--groups", "2,8"])
        );
    }

    #[test]
    fn global_flag_before_subcommand_is_untouched() {
        let argv = args(&["sizes", "--data-dir", "bench", "plot", "history-tree"]);
        assert_eq!(rewrite_args(argv.clone()), argv);
    }

    #[test]
    fn help_and_subcommands_are_untouched() {
        assert_eq!(rewrite_args(args(&["sizes", "--help"])), args(&["sizes", "--help"]));
        assert_eq!(rewrite_args(args(&["sizes", "sample"])), args(&["sizes", "sample"]));
    }

    #[test]
    fn data_dir_precedence() {
        assert_eq!(
            resolve_data_dir(Some(PathBuf::from("flag")), Some("env".to_string())),
            PathBuf::from("flag")
        );
        assert_eq!(resolve_data_dir(None, Some("env".to_string())), PathBuf::from("env"));
        assert_eq!(resolve_data_dir(None, Some("  ".to_string())), PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(resolve_data_dir(None, None), PathBuf::from(DEFAULT_DATA_DIR));
    }

    #[test]
    fn empty_groups_keep_defaults() {
        let config = figure_config(PathBuf::from("d"), vec![], Some(Value::Number(0.0)));
        assert_eq!(config.groups.len(), 3);
        assert_eq!(config.window, Some(Value::Number(0.0)));

        let config = figure_config(PathBuf::from("d"), vec![Value::Number(8.0)], None);
        assert_eq!(config.groups, vec![Value::Number(8.0)]);
    }
}
