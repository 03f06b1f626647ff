//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during analysis
//! - exported to JSON/CSV
//! - consumed by presentation layers (terminal tables, dashboards) as plain data

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the sales input after parsing.
///
/// Invariant (enforced at load time): `units_sold` and `revenue` are finite
/// and non-negative. A row that violates this fails the whole load.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub sale_date: NaiveDate,
    pub manufacturer: String,
    pub drug_name: String,
    pub region: String,
    pub channel: String,
    pub units_sold: f64,
    pub revenue: f64,
}

/// The loaded dataset: insertion-ordered, immutable after load.
///
/// Every engine function borrows this immutably; nothing in the pipeline
/// mutates records once they are in.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<SalesRecord>,
}

impl Dataset {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records for a single manufacturer, in input order.
    pub fn by_manufacturer<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SalesRecord> {
        self.records.iter().filter(move |r| r.manufacturer == name)
    }
}

/// Summary stats about the rows actually loaded (for display only).
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub n_records: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub n_manufacturers: usize,
    pub n_drugs: usize,
    pub n_regions: usize,
    pub n_channels: usize,
}

/// Revenue aggregated into one calendar month.
///
/// `month_index` is an ordinal over the distinct months *present in the
/// data* (0 = earliest). Calendar months with no records get no bucket, so
/// a data gap compresses the index axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub month_index: usize,
    pub year: i32,
    pub month: u32,
    pub total_revenue: f64,
}

/// Output of the twelve-month revenue forecast.
///
/// Derived, never persisted by the core; recomputed from the full dataset on
/// each request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Sum of the twelve extrapolated monthly predictions.
    #[serde(rename = "forecast_2025")]
    pub projected_annual_revenue: f64,
    /// `(projected - current) / current * 100`.
    #[serde(rename = "expected_growth")]
    pub expected_growth_percent: f64,
    /// Total historical revenue across all existing buckets.
    pub current_revenue: f64,
    /// The twelve extrapolated monthly values, in order.
    pub monthly_projection: Vec<f64>,
}

/// Dataset-wide revenue metrics: the grand total plus ranked breakdowns.
#[derive(Debug, Clone, Serialize)]
pub struct RevenueTotals {
    pub total_revenue: f64,
    pub by_drug: super::GroupedAggregate,
    pub by_region: super::GroupedAggregate,
    pub by_channel: super::GroupedAggregate,
}

/// The same breakdowns restricted to the focal manufacturer.
///
/// All fields are empty/zero when the manufacturer has no records; that is
/// a valid result, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct FocalMetrics {
    pub manufacturer: String,
    pub total_revenue: f64,
    pub by_drug: super::GroupedAggregate,
    pub by_region: super::GroupedAggregate,
    pub by_channel: super::GroupedAggregate,
}

/// Top-ranked focus areas for the focal manufacturer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusAreas {
    pub region: String,
    pub channel: String,
    pub drug: String,
}

/// Factors impacting revenue across the whole dataset.
#[derive(Debug, Clone, Serialize)]
pub struct KeyFactors {
    /// Pearson correlation of units sold vs revenue. `None` when undefined
    /// (fewer than two records, or zero variance on either side).
    pub price_elasticity: Option<f64>,
    /// Mean revenue per record, by region, descending.
    pub regional_impact: super::GroupedAggregate,
    /// Mean revenue per record, by channel, descending.
    pub channel_impact: super::GroupedAggregate,
}

/// One row of the sales-allocation ranking (region x channel x drug).
#[derive(Debug, Clone, Serialize)]
pub struct AllocationRow {
    pub region: String,
    pub channel: String,
    pub drug: String,
    pub revenue: f64,
}

/// A manufacturer's annualized growth rate.
///
/// `rate_percent` is `None` when the manufacturer has fewer than 13 distinct
/// months of history; callers must treat that as "insufficient history",
/// never as zero growth.
#[derive(Debug, Clone, Serialize)]
pub struct GrowthRate {
    pub manufacturer: String,
    pub rate_percent: Option<f64>,
}

/// A manufacturer's single best-revenue channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelLeader {
    pub manufacturer: String,
    pub channel: String,
    pub revenue: f64,
}

/// The manufacturer with the highest revenue in one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalLeader {
    pub region: String,
    pub manufacturer: String,
}

/// Qualitative competitive positioning for the focal manufacturer.
///
/// Statement order follows the fixed check order (pricing, coverage,
/// channel efficiency), not a sorted order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompetitivePosition {
    pub advantages: Vec<String>,
    pub disadvantages: Vec<String>,
}
