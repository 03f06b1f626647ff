//! CSV ingest and normalization.
//!
//! This module turns the raw sales CSV into a typed, immutable `Dataset`.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Strict rows**: a malformed row fails the load with its line number
//!   rather than being silently skipped, so downstream totals are never
//!   quietly missing revenue
//! - **Deterministic behavior** (fixed date formats, no locale guessing)
//! - **Separation of concerns**: no analytics logic here

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{Dataset, DatasetStats, SalesRecord};
use crate::error::{AppError, ErrorKind};

/// Default input location, overridable via `DATA_PATH` or `--data`.
pub const DEFAULT_DATA_PATH: &str = "./data/pharma_drug_sales.csv";

const COL_SALE_DATE: &str = "sale date";
const COL_REVENUE: &str = "revenue";
const COL_UNITS_SOLD: &str = "units sold";
const COL_MANUFACTURER: &str = "manufacturer";
const COL_DRUG_NAME: &str = "drug name";
const COL_REGION: &str = "region";
const COL_CHANNEL: &str = "channel";

const REQUIRED_COLUMNS: [&str; 7] = [
    COL_SALE_DATE,
    COL_REVENUE,
    COL_UNITS_SOLD,
    COL_MANUFACTURER,
    COL_DRUG_NAME,
    COL_REGION,
    COL_CHANNEL,
];

/// Ingest output: the dataset plus display stats.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub dataset: Dataset,
    pub stats: DatasetStats,
}

/// Resolve the input path: explicit flag > `DATA_PATH` env > default.
pub fn resolve_data_path(flag: Option<PathBuf>) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    dotenvy::dotenv().ok();
    match std::env::var("DATA_PATH") {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_DATA_PATH),
    }
}

/// Load and validate the sales CSV into a `Dataset`.
pub fn load_dataset(path: &Path) -> Result<LoadedData, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to open sales CSV '{}': {e}", path.display()),
        )
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(ErrorKind::Parse, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;

        let record = result.map_err(|e| {
            AppError::new(ErrorKind::Parse, format!("Line {line}: CSV parse error: {e}"))
        })?;

        let parsed = parse_row(&record, &header_map)
            .map_err(|e| AppError::new(ErrorKind::Parse, format!("Line {line}: {e}")))?;
        records.push(parsed);
    }

    if records.is_empty() {
        return Err(AppError::new(
            ErrorKind::EmptyDataset,
            format!("Sales CSV '{}' contains no data rows.", path.display()),
        ));
    }

    let stats = compute_stats(&records);
    Ok(LoadedData {
        dataset: Dataset::new(records),
        stats,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header. If we don't strip it, schema validation incorrectly
    // reports a missing column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for col in REQUIRED_COLUMNS {
        if !header_map.contains_key(col) {
            return Err(AppError::new(
                ErrorKind::Parse,
                format!("Missing required column: `{col}`"),
            ));
        }
    }
    Ok(())
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<SalesRecord, String> {
    let sale_date = parse_date(get_required(record, header_map, COL_SALE_DATE)?)?;
    let revenue = parse_currency(get_required(record, header_map, COL_REVENUE)?)?;
    let units_sold = parse_units(get_required(record, header_map, COL_UNITS_SOLD)?)?;

    let manufacturer = get_required(record, header_map, COL_MANUFACTURER)?.to_string();
    let drug_name = get_required(record, header_map, COL_DRUG_NAME)?.to_string();
    let region = get_required(record, header_map, COL_REGION)?.to_string();
    let channel = get_required(record, header_map, COL_CHANNEL)?.to_string();

    Ok(SalesRecord {
        sale_date,
        manufacturer,
        drug_name,
        region,
        channel,
        units_sold,
        revenue,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // We recommend ISO dates (`YYYY-MM-DD`), but sales exports commonly use
    // US-style `MM/DD/YYYY`. We accept a small fixed set of formats to keep
    // parsing deterministic.
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, MM/DD/YYYY, YYYY/MM/DD."
    ))
}

/// Parse a currency-formatted amount like `$1,234.56`.
///
/// One leading currency symbol and all `,` grouping separators are removed
/// before numeric conversion.
fn parse_currency(s: &str) -> Result<f64, String> {
    let stripped = s
        .strip_prefix('$')
        .or_else(|| s.strip_prefix('€'))
        .or_else(|| s.strip_prefix('£'))
        .unwrap_or(s);
    let normalized: String = stripped.chars().filter(|&c| c != ',').collect();

    let v = normalized
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid revenue amount '{s}'."))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("Revenue '{s}' must be finite and non-negative."));
    }
    Ok(v)
}

fn parse_units(s: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid units-sold value '{s}'."))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("Units sold '{s}' must be finite and non-negative."));
    }
    Ok(v)
}

fn compute_stats(records: &[SalesRecord]) -> DatasetStats {
    let mut first_date = records[0].sale_date;
    let mut last_date = records[0].sale_date;
    let mut manufacturers = HashSet::new();
    let mut drugs = HashSet::new();
    let mut regions = HashSet::new();
    let mut channels = HashSet::new();

    for r in records {
        first_date = first_date.min(r.sale_date);
        last_date = last_date.max(r.sale_date);
        manufacturers.insert(r.manufacturer.as_str());
        drugs.insert(r.drug_name.as_str());
        regions.insert(r.region.as_str());
        channels.insert(r.channel.as_str());
    }

    DatasetStats {
        n_records: records.len(),
        first_date,
        last_date,
        n_manufacturers: manufacturers.len(),
        n_drugs: drugs.len(),
        n_regions: regions.len(),
        n_channels: channels.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("rx-sales-ingest-{name}-{}.csv", std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    const HEADER: &str = "Sale Date,Revenue,Units Sold,Manufacturer,Drug Name,Region,Channel\n";

    #[test]
    fn loads_rows_in_order_and_parses_currency() {
        let csv = format!(
            "{HEADER}\
             2024-01-15,\"$1,200.50\",10,Company W,Drug A,North,Retail\n\
             2024-02-20,$800.00,5,Company X,Drug B,South,Hospital\n"
        );
        let path = write_temp_csv("ok", &csv);
        let loaded = load_dataset(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let records = loaded.dataset.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].manufacturer, "Company W");
        assert!((records[0].revenue - 1200.50).abs() < 1e-9);
        assert_eq!(records[1].region, "South");
        assert_eq!(loaded.stats.n_manufacturers, 2);
        assert_eq!(
            loaded.stats.first_date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn malformed_row_fails_load_with_line_number() {
        let csv = format!(
            "{HEADER}\
             2024-01-15,$100.00,1,Company W,Drug A,North,Retail\n\
             not-a-date,$100.00,1,Company W,Drug A,North,Retail\n"
        );
        let path = write_temp_csv("bad-date", &csv);
        let err = load_dataset(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("Line 3"));
    }

    #[test]
    fn negative_revenue_is_a_parse_error() {
        let csv = format!("{HEADER}2024-01-15,$-5.00,1,Company W,Drug A,North,Retail\n");
        let path = write_temp_csv("neg", &csv);
        let err = load_dataset(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let csv = "Sale Date,Revenue,Units Sold,Manufacturer,Drug Name,Region\n\
                   2024-01-15,$1.00,1,Company W,Drug A,North\n";
        let path = write_temp_csv("missing-col", csv);
        let err = load_dataset(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("channel"));
    }

    #[test]
    fn empty_file_is_an_empty_dataset_error() {
        let path = write_temp_csv("empty", HEADER);
        let err = load_dataset(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.kind(), ErrorKind::EmptyDataset);
    }

    #[test]
    fn parse_currency_strips_symbol_and_separators() {
        assert!((parse_currency("$1,234,567.89").unwrap() - 1_234_567.89).abs() < 1e-6);
        assert!((parse_currency("42").unwrap() - 42.0).abs() < 1e-12);
        assert!(parse_currency("$abc").is_err());
    }
}
