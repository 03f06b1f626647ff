//! Competitive positioning analysis.
//!
//! Everything here follows a two-pass shape: first collect the distinct
//! categorical keys (manufacturers, regions, channels), then compute each
//! derived value as a pure lookup/reduce over the immutable dataset. No
//! accumulation into shared mutable maps keyed by discovered values.
//!
//! Growth rates use the same month-bucketing (and the same gap policy) as
//! the forecast: only months present in a manufacturer's history count, and
//! the 12-step lag is measured in buckets, not calendar months.

use std::collections::HashSet;

use crate::domain::{
    ChannelLeader, CompetitivePosition, Dataset, GroupedAggregate, GrowthRate, RegionalLeader,
    SalesRecord, group,
};
use crate::error::{AppError, ErrorKind};
use crate::forecast::month_totals;

const GROWTH_LAG_MONTHS: usize = 12;

/// Per-manufacturer revenue share as a percentage of the dataset total,
/// rounded to two decimals, descending.
pub fn market_share(dataset: &Dataset) -> Result<GroupedAggregate, AppError> {
    let by_manufacturer = group::sum_by(
        dataset
            .records()
            .iter()
            .map(|r| (r.manufacturer.as_str(), r.revenue)),
    );

    let total = by_manufacturer.value_total();
    if by_manufacturer.is_empty() || total == 0.0 {
        return Err(AppError::new(
            ErrorKind::EmptyDataset,
            "Market share is undefined: dataset has no revenue.",
        ));
    }

    Ok(by_manufacturer.map_values(|v| round2(v / total * 100.0)))
}

/// Mean 12-bucket-lag percent change per manufacturer.
///
/// Returned in first-encountered manufacturer order. `None` marks
/// insufficient history (fewer than 13 distinct months), never zero growth.
pub fn annualized_growth_rates(dataset: &Dataset) -> Vec<GrowthRate> {
    let manufacturers =
        group::distinct_keys(dataset.records().iter().map(|r| r.manufacturer.as_str()));

    manufacturers
        .into_iter()
        .map(|manufacturer| {
            let series: Vec<f64> = month_totals(dataset.by_manufacturer(&manufacturer))
                .into_iter()
                .map(|(_, revenue)| revenue)
                .collect();
            GrowthRate {
                rate_percent: lagged_growth(&series),
                manufacturer,
            }
        })
        .collect()
}

/// Average of `(v[i] - v[i-12]) / v[i-12] * 100` over the series.
///
/// Lag terms with a zero base are skipped; if nothing remains the rate is
/// undefined.
fn lagged_growth(series: &[f64]) -> Option<f64> {
    if series.len() <= GROWTH_LAG_MONTHS {
        return None;
    }

    let mut terms = Vec::new();
    for i in GROWTH_LAG_MONTHS..series.len() {
        let base = series[i - GROWTH_LAG_MONTHS];
        if base != 0.0 {
            terms.push((series[i] - base) / base * 100.0);
        }
    }

    if terms.is_empty() {
        return None;
    }
    Some(terms.iter().sum::<f64>() / terms.len() as f64)
}

/// Distinct drug count per manufacturer, descending (stable ties).
pub fn portfolio_diversity(dataset: &Dataset) -> Vec<(String, usize)> {
    let manufacturers =
        group::distinct_keys(dataset.records().iter().map(|r| r.manufacturer.as_str()));

    let mut counts: Vec<(String, usize)> = manufacturers
        .into_iter()
        .map(|manufacturer| {
            // Count via a temporary set so the borrow of `manufacturer`
            // ends before the name moves into the result pair.
            let n_drugs = dataset
                .by_manufacturer(&manufacturer)
                .map(|r| r.drug_name.as_str())
                .collect::<HashSet<_>>()
                .len();
            (manufacturer, n_drugs)
        })
        .collect();

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Each manufacturer's single best-revenue channel, first-encountered order.
pub fn channel_strength(dataset: &Dataset) -> Vec<ChannelLeader> {
    let manufacturers =
        group::distinct_keys(dataset.records().iter().map(|r| r.manufacturer.as_str()));

    manufacturers
        .into_iter()
        .filter_map(|manufacturer| {
            let by_channel = group::sum_by(
                dataset
                    .by_manufacturer(&manufacturer)
                    .map(|r| (r.channel.as_str(), r.revenue)),
            );
            by_channel.top().map(|(channel, revenue)| ChannelLeader {
                manufacturer: manufacturer.clone(),
                channel: channel.to_string(),
                revenue,
            })
        })
        .collect()
}

/// The top-revenue manufacturer per region, first-encountered region order.
pub fn regional_dominance(dataset: &Dataset) -> Vec<RegionalLeader> {
    let regions = group::distinct_keys(dataset.records().iter().map(|r| r.region.as_str()));

    regions
        .into_iter()
        .filter_map(|region| {
            let by_manufacturer = group::sum_by(
                dataset
                    .records()
                    .iter()
                    .filter(|r| r.region == region)
                    .map(|r| (r.manufacturer.as_str(), r.revenue)),
            );
            by_manufacturer.top().map(|(manufacturer, _)| RegionalLeader {
                region: region.clone(),
                manufacturer: manufacturer.to_string(),
            })
        })
        .collect()
}

/// Qualitative advantage/disadvantage statements for the focal manufacturer.
///
/// Checks run in a fixed order — pricing, regional coverage, per-channel
/// efficiency — and statements are appended in that order.
pub fn competitive_advantages(
    dataset: &Dataset,
    manufacturer: &str,
) -> Result<CompetitivePosition, AppError> {
    let mut position = CompetitivePosition::default();

    check_pricing(dataset, manufacturer, &mut position)?;
    check_coverage(dataset, manufacturer, &mut position);
    check_channel_efficiency(dataset, manufacturer, &mut position);

    Ok(position)
}

fn check_pricing(
    dataset: &Dataset,
    manufacturer: &str,
    position: &mut CompetitivePosition,
) -> Result<(), AppError> {
    let (focal_revenue, focal_units) = revenue_and_units(dataset.by_manufacturer(manufacturer));
    let (other_revenue, other_units) = revenue_and_units(
        dataset
            .records()
            .iter()
            .filter(|r| r.manufacturer != manufacturer),
    );

    if focal_units == 0.0 {
        return Err(AppError::new(
            ErrorKind::UndefinedPrice,
            format!("Average price for '{manufacturer}' is undefined: zero units sold."),
        ));
    }
    if other_units == 0.0 {
        return Err(AppError::new(
            ErrorKind::UndefinedPrice,
            "Average competitor price is undefined: zero units sold by other manufacturers.",
        ));
    }

    let focal_price = focal_revenue / focal_units;
    let other_price = other_revenue / other_units;

    if focal_price < other_price {
        position.advantages.push(format!(
            "Pricing advantage: average realized price {focal_price:.2} undercuts the competitor average {other_price:.2}."
        ));
    } else {
        position.disadvantages.push(format!(
            "Higher pricing: average realized price {focal_price:.2} exceeds the competitor average {other_price:.2}."
        ));
    }
    Ok(())
}

fn check_coverage(dataset: &Dataset, manufacturer: &str, position: &mut CompetitivePosition) {
    let all_regions: HashSet<&str> = dataset.records().iter().map(|r| r.region.as_str()).collect();
    let focal_regions: HashSet<&str> = dataset
        .by_manufacturer(manufacturer)
        .map(|r| r.region.as_str())
        .collect();

    let missing = all_regions.len() - focal_regions.len();
    if missing == 0 {
        position.advantages.push(format!(
            "Full regional coverage: present in all {} regions.",
            all_regions.len()
        ));
    } else {
        position.disadvantages.push(format!(
            "Incomplete regional coverage: missing {missing} of {} regions.",
            all_regions.len()
        ));
    }
}

fn check_channel_efficiency(dataset: &Dataset, manufacturer: &str, position: &mut CompetitivePosition) {
    let focal_channels =
        group::distinct_keys(dataset.by_manufacturer(manufacturer).map(|r| r.channel.as_str()));

    for channel in focal_channels {
        let focal_mean = mean_revenue(
            dataset
                .by_manufacturer(manufacturer)
                .filter(|r| r.channel == channel),
        );
        let other_mean = mean_revenue(
            dataset
                .records()
                .iter()
                .filter(|r| r.manufacturer != manufacturer && r.channel == channel),
        );

        // No comparable competitor data in this channel: omit, don't fail.
        let (Some(focal_mean), Some(other_mean)) = (focal_mean, other_mean) else {
            continue;
        };

        if focal_mean > other_mean {
            position.advantages.push(format!(
                "Channel strength in {channel}: mean revenue per sale {focal_mean:.2} vs {other_mean:.2} for competitors."
            ));
        } else if focal_mean < other_mean {
            position.disadvantages.push(format!(
                "Channel weakness in {channel}: mean revenue per sale {focal_mean:.2} vs {other_mean:.2} for competitors."
            ));
        }
    }
}

fn revenue_and_units<'a, I>(records: I) -> (f64, f64)
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let mut revenue = 0.0;
    let mut units = 0.0;
    for r in records {
        revenue += r.revenue;
        units += r.units_sold;
    }
    (revenue, units)
}

fn mean_revenue<'a, I>(records: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let mut sum = 0.0;
    let mut n = 0usize;
    for r in records {
        sum += r.revenue;
        n += 1;
    }
    (n > 0).then(|| sum / n as f64)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
