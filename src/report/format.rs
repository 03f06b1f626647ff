//! Formatted terminal output for analysis runs.
//!
//! We keep formatting code in one place so:
//! - the analytics engines stay clean and testable
//! - output changes are localized (important for future snapshot tests)
//!
//! Everything here consumes the engines' plain output structures; nothing
//! formats from raw records.

use crate::app::pipeline::RunOutput;
use crate::domain::{ForecastResult, GroupedAggregate};

/// Format the run header: dataset stats plus ranked revenue tables.
pub fn format_run_summary(run: &RunOutput, top_n: usize) -> String {
    let mut out = String::new();
    let stats = &run.loaded.stats;

    out.push_str("=== rxs - Pharmaceutical Sales Analytics ===\n");
    out.push_str(&format!(
        "Records: n={} | dates=[{} .. {}]\n",
        stats.n_records, stats.first_date, stats.last_date
    ));
    out.push_str(&format!(
        "Distinct: {} manufacturers | {} drugs | {} regions | {} channels\n",
        stats.n_manufacturers, stats.n_drugs, stats.n_regions, stats.n_channels
    ));
    out.push_str(&format!("Total revenue: {}\n", fmt_money(run.totals.total_revenue)));

    out.push_str("\nRevenue by drug:\n");
    out.push_str(&format_aggregate_table(&run.totals.by_drug, top_n));
    out.push_str("\nRevenue by region:\n");
    out.push_str(&format_aggregate_table(&run.totals.by_region, top_n));
    out.push_str("\nRevenue by channel:\n");
    out.push_str(&format_aggregate_table(&run.totals.by_channel, top_n));

    out
}

/// Format the focal manufacturer block: totals, breakdowns, focus areas.
pub fn format_focal_summary(run: &RunOutput, top_n: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!("--- {} ---\n", run.focal.manufacturer));
    out.push_str(&format!("Revenue: {}\n", fmt_money(run.focal.total_revenue)));

    out.push_str("\nBy drug:\n");
    out.push_str(&format_aggregate_table(&run.focal.by_drug, top_n));
    out.push_str("\nBy region:\n");
    out.push_str(&format_aggregate_table(&run.focal.by_region, top_n));
    out.push_str("\nBy channel:\n");
    out.push_str(&format_aggregate_table(&run.focal.by_channel, top_n));

    out.push_str("\nRecommended focus areas:\n");
    out.push_str(&format!("- region : {}\n", run.focus.region));
    out.push_str(&format!("- channel: {}\n", run.focus.channel));
    out.push_str(&format!("- drug   : {}\n", run.focus.drug));

    out
}

/// Format the forecast block.
pub fn format_forecast(forecast: &ForecastResult) -> String {
    let mut out = String::new();

    out.push_str("Forecast (next 12 months):\n");
    out.push_str(&format!(
        "- current revenue   : {}\n",
        fmt_money(forecast.current_revenue)
    ));
    out.push_str(&format!(
        "- projected revenue : {}\n",
        fmt_money(forecast.projected_annual_revenue)
    ));
    out.push_str(&format!(
        "- expected growth   : {:+.2}%\n",
        forecast.expected_growth_percent
    ));
    out.push_str(&format!(
        "- monthly projection: {}\n",
        fmt_vec(&forecast.monthly_projection)
    ));

    out
}

/// Format the competitive landscape: shares, growth, diversity, leadership,
/// and the focal manufacturer's advantage/disadvantage statements.
pub fn format_competitive(run: &RunOutput, top_n: usize) -> String {
    let mut out = String::new();

    out.push_str("Market share:\n");
    for (manufacturer, share) in run.shares.iter().take(top_n) {
        out.push_str(&format!("{:<24} {share:>7.2}%\n", truncate(manufacturer, 24)));
    }

    out.push_str("\nAnnualized growth:\n");
    for rate in &run.growth {
        match rate.rate_percent {
            Some(pct) => out.push_str(&format!(
                "{:<24} {pct:>+9.2}%\n",
                truncate(&rate.manufacturer, 24)
            )),
            None => out.push_str(&format!(
                "{:<24} {:>10}\n",
                truncate(&rate.manufacturer, 24),
                "(<13 mo)"
            )),
        }
    }

    out.push_str("\nPortfolio diversity (distinct drugs):\n");
    for (manufacturer, count) in run.diversity.iter().take(top_n) {
        out.push_str(&format!("{:<24} {count:>6}\n", truncate(manufacturer, 24)));
    }

    out.push_str("\nBest channel per manufacturer:\n");
    for leader in &run.channel_leaders {
        out.push_str(&format!(
            "{:<24} {:<12} {}\n",
            truncate(&leader.manufacturer, 24),
            truncate(&leader.channel, 12),
            fmt_money(leader.revenue)
        ));
    }

    out.push_str("\nRegional leaders:\n");
    for leader in &run.regional_leaders {
        out.push_str(&format!(
            "{:<16} {}\n",
            truncate(&leader.region, 16),
            leader.manufacturer
        ));
    }

    out.push_str(&format!("\n{} positioning:\n", run.focal.manufacturer));
    for statement in &run.position.advantages {
        out.push_str(&format!("+ {statement}\n"));
    }
    for statement in &run.position.disadvantages {
        out.push_str(&format!("- {statement}\n"));
    }

    out
}

fn format_aggregate_table(agg: &GroupedAggregate, top_n: usize) -> String {
    let mut out = String::new();
    for (key, value) in agg.iter().take(top_n) {
        out.push_str(&format!("{:<24} {}\n", truncate(key, 24), fmt_money(value)));
    }
    out
}

fn fmt_money(v: f64) -> String {
    format!("${v:>14.2}")
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.0}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
