//! Batch JSON report.
//!
//! The report is the "portable" summary of a full analysis run, with fixed
//! top-level keys consumed by downstream dashboards:
//!
//! - `forecast_2025`: the forecast result
//! - `key_factors`: price elasticity + top region/channel by mean revenue
//! - `recommendations`: focus areas for the focal manufacturer
//! - `current_metrics`: grand total + top drug

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::app::pipeline::RunOutput;
use crate::domain::{FocusAreas, ForecastResult};
use crate::error::{AppError, ErrorKind};

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub forecast_2025: ForecastResult,
    pub key_factors: KeyFactorsSection,
    pub recommendations: FocusAreas,
    pub current_metrics: CurrentMetricsSection,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyFactorsSection {
    pub price_elasticity: Option<f64>,
    pub top_region: String,
    pub top_channel: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentMetricsSection {
    pub total_revenue: f64,
    pub top_drug: String,
}

/// Assemble the report from a completed run.
pub fn build_report(run: &RunOutput) -> Result<AnalysisReport, AppError> {
    let missing = |what: &str| {
        AppError::new(
            ErrorKind::EmptyDataset,
            format!("Cannot build report: no {what} in dataset."),
        )
    };

    let (top_region, _) = run.factors.regional_impact.top().ok_or_else(|| missing("regions"))?;
    let (top_channel, _) = run.factors.channel_impact.top().ok_or_else(|| missing("channels"))?;
    let (top_drug, _) = run.totals.by_drug.top().ok_or_else(|| missing("drugs"))?;

    Ok(AnalysisReport {
        forecast_2025: run.forecast.clone(),
        key_factors: KeyFactorsSection {
            price_elasticity: run.factors.price_elasticity,
            top_region: top_region.to_string(),
            top_channel: top_channel.to_string(),
        },
        recommendations: run.focus.clone(),
        current_metrics: CurrentMetricsSection {
            total_revenue: run.totals.total_revenue,
            top_drug: top_drug.to_string(),
        },
    })
}

/// Write the report as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &AnalysisReport) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to create report JSON '{}': {e}", path.display()),
        )
    })?;

    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to write report JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_with_fixed_top_level_keys() {
        let report = AnalysisReport {
            forecast_2025: ForecastResult {
                projected_annual_revenue: 11_400.0,
                expected_growth_percent: 1_800.0,
                current_revenue: 600.0,
                monthly_projection: vec![400.0],
            },
            key_factors: KeyFactorsSection {
                price_elasticity: Some(0.9),
                top_region: "North".to_string(),
                top_channel: "Retail".to_string(),
            },
            recommendations: FocusAreas {
                region: "North".to_string(),
                channel: "Retail".to_string(),
                drug: "Drug A".to_string(),
            },
            current_metrics: CurrentMetricsSection {
                total_revenue: 600.0,
                top_drug: "Drug A".to_string(),
            },
        };

        let value = serde_json::to_value(&report).unwrap();
        for key in ["forecast_2025", "key_factors", "recommendations", "current_metrics"] {
            assert!(value.get(key).is_some(), "missing top-level key {key}");
        }
        // The forecast section keeps its legacy field names.
        assert_eq!(value["forecast_2025"]["forecast_2025"], 11_400.0);
        assert_eq!(value["forecast_2025"]["expected_growth"], 1_800.0);
        assert_eq!(value["key_factors"]["top_region"], "North");
    }
}
