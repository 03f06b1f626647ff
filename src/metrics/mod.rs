//! Descriptive revenue metrics.
//!
//! Pure functions over an immutable `Dataset`:
//!
//! - dataset-wide totals and ranked breakdowns
//! - the same breakdowns restricted to the focal manufacturer
//! - recommended focus areas (top region/channel/drug for the focal subset)
//! - revenue key factors (price elasticity proxy + mean impact by bucket)
//! - the region x channel x drug sales-allocation ranking

use std::collections::HashMap;

use crate::domain::{
    AllocationRow, Dataset, FocalMetrics, FocusAreas, KeyFactors, RevenueTotals, group,
};
use crate::error::{AppError, ErrorKind};

/// Total revenue plus ranked breakdowns by drug, region, and channel.
pub fn revenue_totals(dataset: &Dataset) -> RevenueTotals {
    let records = dataset.records();
    RevenueTotals {
        total_revenue: records.iter().map(|r| r.revenue).sum(),
        by_drug: group::sum_by(records.iter().map(|r| (r.drug_name.as_str(), r.revenue))),
        by_region: group::sum_by(records.iter().map(|r| (r.region.as_str(), r.revenue))),
        by_channel: group::sum_by(records.iter().map(|r| (r.channel.as_str(), r.revenue))),
    }
}

/// The same breakdowns restricted to `manufacturer`.
///
/// No matching records is a valid outcome: zero total, empty aggregates.
pub fn focal_company_metrics(dataset: &Dataset, manufacturer: &str) -> FocalMetrics {
    let subset: Vec<_> = dataset.by_manufacturer(manufacturer).collect();
    FocalMetrics {
        manufacturer: manufacturer.to_string(),
        total_revenue: subset.iter().map(|r| r.revenue).sum(),
        by_drug: group::sum_by(subset.iter().map(|r| (r.drug_name.as_str(), r.revenue))),
        by_region: group::sum_by(subset.iter().map(|r| (r.region.as_str(), r.revenue))),
        by_channel: group::sum_by(subset.iter().map(|r| (r.channel.as_str(), r.revenue))),
    }
}

/// Top-ranked region, channel, and drug for the focal manufacturer.
///
/// Fails with an empty-dataset error when the manufacturer has no records,
/// because no top element exists.
pub fn recommended_focus_areas(dataset: &Dataset, manufacturer: &str) -> Result<FocusAreas, AppError> {
    let focal = focal_company_metrics(dataset, manufacturer);

    let no_records = || {
        AppError::new(
            ErrorKind::EmptyDataset,
            format!("No sales records for manufacturer '{manufacturer}'; cannot recommend focus areas."),
        )
    };

    let (region, _) = focal.by_region.top().ok_or_else(no_records)?;
    let (channel, _) = focal.by_channel.top().ok_or_else(no_records)?;
    let (drug, _) = focal.by_drug.top().ok_or_else(no_records)?;

    Ok(FocusAreas {
        region: region.to_string(),
        channel: channel.to_string(),
        drug: drug.to_string(),
    })
}

/// Factors impacting revenue across the whole dataset.
///
/// Price elasticity is proxied by the units-sold vs revenue correlation and
/// is `None` when undefined rather than a NaN that poisons downstream math.
pub fn key_factors(dataset: &Dataset) -> KeyFactors {
    let records = dataset.records();
    let units: Vec<f64> = records.iter().map(|r| r.units_sold).collect();
    let revenue: Vec<f64> = records.iter().map(|r| r.revenue).collect();

    KeyFactors {
        price_elasticity: crate::math::pearson_correlation(&units, &revenue),
        regional_impact: group::mean_by(records.iter().map(|r| (r.region.as_str(), r.revenue))),
        channel_impact: group::mean_by(records.iter().map(|r| (r.channel.as_str(), r.revenue))),
    }
}

/// Revenue summed over (region, channel, drug) triples, descending.
///
/// Used as the sales-representative allocation ranking.
pub fn sales_allocation(dataset: &Dataset) -> Vec<AllocationRow> {
    let mut index: HashMap<(&str, &str, &str), usize> = HashMap::new();
    let mut rows: Vec<AllocationRow> = Vec::new();

    for r in dataset.records() {
        let key = (r.region.as_str(), r.channel.as_str(), r.drug_name.as_str());
        match index.get(&key) {
            Some(&i) => rows[i].revenue += r.revenue,
            None => {
                index.insert(key, rows.len());
                rows.push(AllocationRow {
                    region: r.region.clone(),
                    channel: r.channel.clone(),
                    drug: r.drug_name.clone(),
                    revenue: r.revenue,
                });
            }
        }
    }

    rows.sort_by(|a, b| b.revenue.partial_cmp(&a.revenue).unwrap_or(std::cmp::Ordering::Equal));
    rows
}
