//! Shared domain types.
//!
//! `RawRecord` is what the API hands us, `PowerCostRow` is what lands in SQLite.
//! The request window and query parameters live here too so the CLI, the
//! fetcher and the report can agree on them without depending on each other.
//!
//! Decoding passes record fields through unchanged with two exceptions:
//! - a `cost` that is missing, null, non-numeric or non-finite becomes `0.0`
//! - a `sectorid` that is not an integer (e.g. `"all"`) is stored as NULL,
//!   not as text, so the `sector_id INTEGER` column only ever holds integers

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::AppError;

/// Largest page the API accepts in one request.
pub const MAX_PAGE_LENGTH: usize = 5000;

/// Substituted when a record has no usable `cost`.
pub const DEFAULT_COST: f64 = 0.0;

/// A calendar month, formatted `YYYY-MM` on the wire and in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || b.is_ascii_digit());
        if !well_formed {
            return Err(format!("Invalid month '{s}'. Expected YYYY-MM."));
        }
        NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| format!("Invalid month '{s}'. Expected YYYY-MM."))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

/// Sort direction applied to the `period` column by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Which slice of the dataset to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: YearMonth,
    pub end: YearMonth,
    pub sort_direction: SortDirection,
    pub offset: usize,
    pub length: usize,
    /// Keep requesting pages until the API reports no more rows.
    pub all_pages: bool,
}

impl FetchWindow {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.start > self.end {
            return Err(AppError::config(format!(
                "Start month {} is after end month {}.",
                self.start, self.end
            )));
        }
        if self.length == 0 || self.length > MAX_PAGE_LENGTH {
            return Err(AppError::config(format!(
                "Page length must be between 1 and {MAX_PAGE_LENGTH} (got {}).",
                self.length
            )));
        }
        Ok(())
    }
}

impl Default for FetchWindow {
    fn default() -> Self {
        Self {
            start: YearMonth(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()),
            end: YearMonth(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap_or_default()),
            sort_direction: SortDirection::Desc,
            offset: 0,
            length: MAX_PAGE_LENGTH,
            all_pages: false,
        }
    }
}

/// Parameters for the three example queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub fuel_type: String,
    pub sector: String,
    pub period: String,
    pub limit: usize,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            fuel_type: "bituminous coal".to_string(),
            sector: "Electric Utility".to_string(),
            period: "2024-07".to_string(),
            limit: 3,
        }
    }
}

/// One observation from `response.data`.
///
/// Every field is optional. Numeric fields accept both JSON numbers and
/// numeric strings, since the API sends either depending on the dataset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "opt_text")]
    pub period: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub location: Option<String>,
    #[serde(default, rename = "stateDescription", deserialize_with = "opt_text")]
    pub state_description: Option<String>,
    /// NULL when the source value is not an integer.
    #[serde(default, rename = "sectorid", deserialize_with = "opt_i64")]
    pub sector_id: Option<i64>,
    #[serde(default, rename = "sectorDescription", deserialize_with = "opt_text")]
    pub sector_description: Option<String>,
    #[serde(default, rename = "fueltypeid", deserialize_with = "opt_text")]
    pub fuel_type_id: Option<String>,
    #[serde(default, rename = "fuelTypeDescription", deserialize_with = "opt_text")]
    pub fuel_type_description: Option<String>,
    #[serde(default, deserialize_with = "opt_f64")]
    pub cost: Option<f64>,
}

/// A row of the `electric_power_data` table.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerCostRow {
    pub period: Option<String>,
    pub location: Option<String>,
    pub state_description: Option<String>,
    pub sector_id: Option<i64>,
    pub sector_description: Option<String>,
    pub fuel_type_id: Option<String>,
    pub fuel_type_description: Option<String>,
    pub cost: f64,
}

impl From<RawRecord> for PowerCostRow {
    fn from(raw: RawRecord) -> Self {
        Self {
            period: raw.period,
            location: raw.location,
            state_description: raw.state_description,
            sector_id: raw.sector_id,
            sector_description: raw.sector_description,
            fuel_type_id: raw.fuel_type_id,
            fuel_type_description: raw.fuel_type_description,
            cost: raw.cost.unwrap_or(DEFAULT_COST),
        }
    }
}

fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|v| v.is_finite() && v.fract() == 0.0)
                .map(|v| v as i64)
        }),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(v.filter(|v| v.is_finite()))
}
