//! Command-line parsing for the sales analytics tool.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the analytics code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "rxs", version, about = "Pharmaceutical sales analytics and revenue forecasting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full analysis: metrics, forecast, competitive positioning.
    Analyze(AnalyzeArgs),
    /// Print the twelve-month revenue forecast only (useful for scripting).
    Forecast(AnalyzeArgs),
    /// Write the batch JSON report into an output directory.
    Report(ReportArgs),
}

/// Common options for analysis runs.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Path to the sales CSV. Falls back to $DATA_PATH, then the default
    /// ./data/pharma_drug_sales.csv.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Focal manufacturer for recommendations and positioning.
    #[arg(long, default_value = "Company W")]
    pub company: String,

    /// Show top-N entries in ranked tables.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Export the sales-allocation ranking to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the batch report to JSON.
    #[arg(long = "export-report")]
    pub export_report: Option<PathBuf>,
}

/// Options for the batch report command.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    /// Path to the sales CSV. Falls back to $DATA_PATH, then the default
    /// ./data/pharma_drug_sales.csv.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Focal manufacturer for recommendations and positioning.
    #[arg(long, default_value = "Company W")]
    pub company: String,

    /// Output directory for analysis_report.json.
    #[arg(long, default_value = "output")]
    pub out: PathBuf,
}
