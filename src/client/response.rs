//! Decoding of raw API response JSON into typed rows.
//!
//! The response body looks like:
//!
//! ```json
//! {
//!   "rows": [
//!     {
//!       "keys": ["2024-04-01", "https://example.com/a"],
//!       "clicks": 12,
//!       "impressions": 340,
//!       "ctr": 0.0353,
//!       "position": 7.2
//!     }
//!   ]
//! }
//! ```
//!
//! `keys` aligns positionally with the dimensions that were requested.
//! A missing `rows` array is the no-data state. A row missing a
//! required numeric field fails fast with an error naming the key and
//! the field; nothing is coerced to zero at this boundary.

use chrono::NaiveDate;
use serde_json::Value;

use crate::model::{Dimension, DimensionKey, MetricRow};
use crate::validation::DataValidationError;

/// How the source encodes click-through-rate.
///
/// Some exports deliver a fraction in `[0, 1]`, others the same value
/// pre-multiplied by 100. Internally this crate always holds the
/// fraction; the conversion happens exactly once, here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtrScale {
    Fraction,
    Percent,
}

impl Default for CtrScale {
    fn default() -> Self {
        CtrScale::Fraction
    }
}

impl CtrScale {
    fn normalize(&self, ctr: f64) -> f64 {
        match self {
            CtrScale::Fraction => ctr,
            CtrScale::Percent => ctr / 100.0,
        }
    }
}

/// Decode an API response body into rows.
///
/// `dimensions` must be the dimension list of the originating request;
/// it drives how each row's `keys` tuple is split into a date and a
/// [`DimensionKey`]. An absent or empty `rows` array yields an empty
/// vector.
pub fn parse_response(
    body: &Value,
    dimensions: &[Dimension],
    ctr_scale: CtrScale,
) -> Result<Vec<MetricRow>, DataValidationError> {
    let rows = match body.get("rows").and_then(Value::as_array) {
        Some(rows) => rows,
        None => return Ok(Vec::new()),
    };

    rows.iter()
        .enumerate()
        .map(|(i, row)| parse_row(row, i, dimensions, ctr_scale))
        .collect()
}

fn parse_row(
    row: &Value,
    index: usize,
    dimensions: &[Dimension],
    ctr_scale: CtrScale,
) -> Result<MetricRow, DataValidationError> {
    let row_name = || format!("row {}", index);

    let keys = row
        .get("keys")
        .and_then(Value::as_array)
        .ok_or_else(|| DataValidationError::missing(row_name(), "keys"))?;

    if keys.len() != dimensions.len() {
        return Err(DataValidationError::new(
            row_name(),
            "keys",
            format!(
                "expected {} key(s) for the requested dimensions, got {}",
                dimensions.len(),
                keys.len()
            ),
        ));
    }

    let mut date: Option<NaiveDate> = None;
    let mut query: Option<String> = None;
    let mut page: Option<String> = None;

    for (dim, key) in dimensions.iter().zip(keys) {
        let text = key
            .as_str()
            .ok_or_else(|| DataValidationError::new(row_name(), "keys", "key is not a string"))?;
        match dim {
            Dimension::Date => {
                let parsed = NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| {
                    DataValidationError::new(row_name(), "date", format!("unparseable date: {e}"))
                })?;
                date = Some(parsed);
            }
            Dimension::Query => query = Some(text.to_string()),
            Dimension::Page => page = Some(text.to_string()),
        }
    }

    let key = match (query, page) {
        (Some(q), Some(p)) => DimensionKey::QueryPage(q, p),
        (Some(q), None) => DimensionKey::Query(q),
        (None, Some(p)) => DimensionKey::Page(p),
        (None, None) => {
            return Err(DataValidationError::new(
                row_name(),
                "keys",
                "no grouping dimension (query or page) was requested",
            ))
        }
    };

    let clicks = require_u64(row, &key, "clicks")?;
    let impressions = require_u64(row, &key, "impressions")?;
    let ctr = ctr_scale.normalize(require_f64(row, &key, "ctr")?);
    let position = require_f64(row, &key, "position")?;

    let parsed = MetricRow {
        key,
        date,
        clicks,
        impressions,
        ctr,
        position,
    };
    crate::validation::check_row(&parsed)?;
    Ok(parsed)
}

fn require_f64(row: &Value, key: &DimensionKey, field: &str) -> Result<f64, DataValidationError> {
    row.get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| DataValidationError::missing(key.label(), field))
}

fn require_u64(row: &Value, key: &DimensionKey, field: &str) -> Result<u64, DataValidationError> {
    let value = row
        .get(field)
        .ok_or_else(|| DataValidationError::missing(key.label(), field))?;
    // The API serializes counts as integers, but some exports write
    // them as floats with a zero fraction.
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as u64),
        _ => Err(DataValidationError::new(
            key.label(),
            field,
            "expected a non-negative integer",
        )),
    }
}
