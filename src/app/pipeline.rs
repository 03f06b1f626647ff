//! Shared analysis pipeline used by every CLI command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> metrics -> forecast -> competitive analysis
//!
//! Commands then focus on presentation (printing vs file exports). Each run
//! loads and computes from scratch; nothing is cached between invocations.

use std::path::PathBuf;

use crate::domain::{
    AllocationRow, ChannelLeader, CompetitivePosition, FocalMetrics, FocusAreas, ForecastResult,
    GroupedAggregate, GrowthRate, KeyFactors, RegionalLeader, RevenueTotals,
};
use crate::error::AppError;
use crate::io::ingest::LoadedData;

/// A full run's configuration, derived from CLI flags plus defaults.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub data_path: PathBuf,
    /// The focal manufacturer for recommendations and positioning.
    pub manufacturer: String,
    pub top_n: usize,
    pub export_allocation: Option<PathBuf>,
    pub export_report: Option<PathBuf>,
}

/// All computed outputs of a single analysis run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub loaded: LoadedData,
    pub totals: RevenueTotals,
    pub focal: FocalMetrics,
    pub focus: FocusAreas,
    pub factors: KeyFactors,
    pub allocation: Vec<AllocationRow>,
    pub forecast: ForecastResult,
    pub shares: GroupedAggregate,
    pub growth: Vec<GrowthRate>,
    pub diversity: Vec<(String, usize)>,
    pub channel_leaders: Vec<ChannelLeader>,
    pub regional_leaders: Vec<RegionalLeader>,
    pub position: CompetitivePosition,
}

/// Execute the full analysis pipeline and return the computed outputs.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let loaded = crate::io::ingest::load_dataset(&config.data_path)?;
    let dataset = &loaded.dataset;

    let totals = crate::metrics::revenue_totals(dataset);
    let focal = crate::metrics::focal_company_metrics(dataset, &config.manufacturer);
    let focus = crate::metrics::recommended_focus_areas(dataset, &config.manufacturer)?;
    let factors = crate::metrics::key_factors(dataset);
    let allocation = crate::metrics::sales_allocation(dataset);

    let forecast = crate::forecast::forecast_next_year(dataset)?;

    let shares = crate::compete::market_share(dataset)?;
    let growth = crate::compete::annualized_growth_rates(dataset);
    let diversity = crate::compete::portfolio_diversity(dataset);
    let channel_leaders = crate::compete::channel_strength(dataset);
    let regional_leaders = crate::compete::regional_dominance(dataset);
    let position = crate::compete::competitive_advantages(dataset, &config.manufacturer)?;

    Ok(RunOutput {
        loaded,
        totals,
        focal,
        focus,
        factors,
        allocation,
        forecast,
        shares,
        growth,
        diversity,
        channel_leaders,
        regional_leaders,
        position,
    })
}
