//! CSV dataset loader. Reads the user export once at startup and converts
//! every row into a typed [`Record`].

use crate::error::{DashboardError, DashboardResult};
use crate::types::{Dataset, Record, SubscriptionType};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Row as it appears in the file, before date/flag parsing.
#[derive(Debug, Deserialize)]
struct CsvRowRaw {
    user_id: String,
    country: String,
    install_date: String,
    #[serde(default)]
    last_active_date: String,
    #[serde(default)]
    pro_upgrade_date: String,
    monthly_revenue: Option<f64>,
    days_active: u32,
    churned: String,
    subscription_type: String,
}

/// Load the dataset from a CSV file on disk.
pub fn load_dataset(path: impl AsRef<Path>) -> DashboardResult<Dataset> {
    let path = path.as_ref();
    let start = Instant::now();
    let file = File::open(path)?;
    let dataset = read_dataset(file)?;

    info!(
        path = %path.display(),
        records = dataset.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Dataset loaded"
    );
    Ok(dataset)
}

/// Read the dataset from any CSV source with a header row.
pub fn read_dataset<R: Read>(reader: R) -> DashboardResult<Dataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, result) in reader.deserialize().enumerate() {
        let raw: CsvRowRaw = result?;
        records.push(parse_row(index + 1, raw)?);
    }

    debug!(records = records.len(), "Parsed CSV rows");
    Ok(Dataset::new(records))
}

fn parse_row(row: usize, raw: CsvRowRaw) -> DashboardResult<Record> {
    let install_date = parse_date(&raw.install_date)
        .ok_or_else(|| invalid(row, "install_date", &raw.install_date))?;
    let last_active_date = parse_optional_date(row, "last_active_date", &raw.last_active_date)?;
    let pro_upgrade_date = parse_optional_date(row, "pro_upgrade_date", &raw.pro_upgrade_date)?;
    let churned =
        parse_flag(&raw.churned).ok_or_else(|| invalid(row, "churned", &raw.churned))?;
    let monthly_revenue = parse_revenue(row, raw.monthly_revenue)?;
    let subscription_type = raw
        .subscription_type
        .parse::<SubscriptionType>()
        .map_err(|_| invalid(row, "subscription_type", &raw.subscription_type))?;

    Ok(Record {
        user_id: raw.user_id,
        country: raw.country,
        install_date,
        last_active_date,
        pro_upgrade_date,
        monthly_revenue,
        days_active: raw.days_active,
        churned,
        subscription_type,
    })
}

fn invalid(row: usize, column: &'static str, value: &str) -> DashboardError {
    DashboardError::InvalidField {
        row,
        column,
        value: value.to_string(),
    }
}

/// Blank and `NaN` cells are missing revenue and count as 0.
fn parse_revenue(row: usize, value: Option<f64>) -> DashboardResult<f64> {
    match value {
        None => Ok(0.0),
        Some(v) if v.is_nan() => Ok(0.0),
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Some(v) => Err(invalid(row, "monthly_revenue", &v.to_string())),
    }
}

fn parse_optional_date(
    row: usize,
    column: &'static str,
    value: &str,
) -> DashboardResult<Option<NaiveDate>> {
    if value.is_empty() || value.eq_ignore_ascii_case("nan") || value.eq_ignore_ascii_case("nat") {
        return Ok(None);
    }
    parse_date(value).map(Some).ok_or_else(|| invalid(row, column, value))
}

/// Accepts plain dates, `date time` timestamps and RFC 3339. Time of day is dropped.
fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ts.date());
        }
    }
    DateTime::parse_from_rfc3339(value).ok().map(|ts| ts.date_naive())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
