//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the input path (flag > `DATA_PATH` env > default)
//! - runs the analysis pipeline
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{AnalyzeArgs, Command, ReportArgs};
use crate::error::AppError;

pub mod pipeline;

use pipeline::AnalysisConfig;

/// Entry point for the `rxs` binary.
pub fn run() -> Result<(), AppError> {
    // We want bare `rxs` (and `rxs --company X`) to behave like
    // `rxs analyze ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Forecast(args) => handle_forecast(args),
        Command::Report(args) => handle_report(args),
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args);
    let run = pipeline::run_analysis(&config)?;

    println!("{}", crate::report::format_run_summary(&run, config.top_n));
    println!("{}", crate::report::format_focal_summary(&run, config.top_n));
    println!("{}", crate::report::format_forecast(&run.forecast));
    println!("{}", crate::report::format_competitive(&run, config.top_n));

    // Optional exports.
    if let Some(path) = &config.export_allocation {
        crate::io::export::write_allocation_csv(path, &run.allocation)?;
    }
    if let Some(path) = &config.export_report {
        let report = crate::io::report::build_report(&run)?;
        crate::io::report::write_report_json(path, &report)?;
    }

    Ok(())
}

fn handle_forecast(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args);
    let loaded = crate::io::ingest::load_dataset(&config.data_path)?;
    let forecast = crate::forecast::forecast_next_year(&loaded.dataset)?;

    println!("{}", crate::report::format_forecast(&forecast));
    Ok(())
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AnalysisConfig {
        data_path: crate::io::ingest::resolve_data_path(args.data),
        manufacturer: args.company,
        top_n: 10,
        export_allocation: None,
        export_report: None,
    };
    let run = pipeline::run_analysis(&config)?;

    std::fs::create_dir_all(&args.out).map_err(|e| {
        AppError::new(
            crate::error::ErrorKind::Io,
            format!("Failed to create output directory '{}': {e}", args.out.display()),
        )
    })?;

    let report_path = args.out.join("analysis_report.json");
    let report = crate::io::report::build_report(&run)?;
    crate::io::report::write_report_json(&report_path, &report)?;

    println!("Wrote {}", report_path.display());
    Ok(())
}

fn analysis_config_from_args(args: &AnalyzeArgs) -> AnalysisConfig {
    AnalysisConfig {
        data_path: crate::io::ingest::resolve_data_path(args.data.clone()),
        manufacturer: args.company.clone(),
        top_n: args.top,
        export_allocation: args.export.clone(),
        export_report: args.export_report.clone(),
    }
}

/// Rewrite argv so `rxs` defaults to `rxs analyze`.
///
/// Rules:
/// - `rxs`                      -> `rxs analyze`
/// - `rxs --company X ...`      -> `rxs analyze --company X ...`
/// - `rxs --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("analyze".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "forecast" | "report");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "analyze flags".
    if arg1.starts_with('-') {
        argv.insert(1, "analyze".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
