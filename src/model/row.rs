// src/model/row.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::types::{DateRange, Dimension, DimensionKey};

/// One observation of a dimension key.
///
/// `date` is present only in date-granular fetches. `ctr` is always a
/// fraction in `[0, 1]` inside this crate; sources that deliver a
/// pre-scaled percentage are converted once at the response boundary
/// (see `client::CtrScale`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub key: DimensionKey,
    pub date: Option<NaiveDate>,
    pub clicks: u64,
    pub impressions: u64,
    pub ctr: f64,
    /// Mean search-result rank; lower is better, 1.0 is the top slot.
    pub position: f64,
}

/// The ordered output of one query against one date window and one
/// dimension set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    pub rows: Vec<MetricRow>,
    pub range: DateRange,
    pub dimensions: Vec<Dimension>,
}

impl FetchResult {
    pub fn new(rows: Vec<MetricRow>, range: DateRange, dimensions: Vec<Dimension>) -> Self {
        FetchResult {
            rows,
            range,
            dimensions,
        }
    }

    /// Absence of data for a range is an informational state, not an error.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

impl<'a> IntoIterator for &'a FetchResult {
    type Item = &'a MetricRow;
    type IntoIter = std::slice::Iter<'a, MetricRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// One dimension key collapsed over a whole period.
///
/// Volume metrics are sums; rate metrics are unweighted arithmetic means
/// over the contributing rows (NOT weighted by impressions, so
/// high-traffic days are under-weighted — an inherited behavior that is
/// kept, not fixed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRow {
    pub key: DimensionKey,
    pub clicks: u64,
    pub impressions: u64,
    pub ctr: f64,
    pub position: f64,
}

/// The joined current-vs-previous view of one dimension key.
///
/// Diffs are `current - previous` except `position_diff`, which is
/// `previous - current` so that a positive value means the rank improved
/// (numerically smaller position is better). Field order here is the
/// CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub key: DimensionKey,
    pub clicks_current: u64,
    pub clicks_previous: u64,
    pub impressions_current: u64,
    pub impressions_previous: u64,
    pub ctr_current: f64,
    pub ctr_previous: f64,
    pub position_current: f64,
    pub position_previous: f64,
    pub clicks_diff: i64,
    pub ctr_diff: f64,
    pub impressions_diff: i64,
    pub position_diff: f64,
    pub clicks_pct_change: f64,
}
