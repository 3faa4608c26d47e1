//! Fail-fast validation of row data.
//!
//! A row missing a required numeric field, or carrying a non-finite
//! value, aborts the report before merge time. The one deliberate
//! exception is the zero-fill outer-join policy in `compare`, where a
//! key absent from one period contributes zeros by design.

use crate::model::{AggregatedRow, DimensionKey, MetricRow};

/// A row failed shape validation. Names the offending key and field so
/// the caller can see exactly which row broke the report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("row '{key}' has invalid data in field '{field}': {reason}")]
pub struct DataValidationError {
    pub key: String,
    pub field: String,
    pub reason: String,
}

impl DataValidationError {
    pub fn new(
        key: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DataValidationError {
            key: key.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn missing(key: impl Into<String>, field: impl Into<String>) -> Self {
        DataValidationError::new(key, field, "missing required field")
    }
}

/// Check that the floating-point metrics on a row are finite.
///
/// Integer fields cannot be malformed once typed; `ctr` and `position`
/// can still smuggle NaN/infinity out of a bad upstream payload.
pub fn check_row(row: &MetricRow) -> Result<(), DataValidationError> {
    check_rates(&row.key, row.ctr, row.position)
}

/// Same finiteness check for aggregated (period-level) rows.
pub fn check_aggregated(row: &AggregatedRow) -> Result<(), DataValidationError> {
    check_rates(&row.key, row.ctr, row.position)
}

fn check_rates(key: &DimensionKey, ctr: f64, position: f64) -> Result<(), DataValidationError> {
    if !ctr.is_finite() {
        return Err(DataValidationError::new(
            key.label(),
            "ctr",
            "value is not finite",
        ));
    }
    if !position.is_finite() {
        return Err(DataValidationError::new(
            key.label(),
            "position",
            "value is not finite",
        ));
    }
    Ok(())
}
