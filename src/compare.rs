//! Period-over-period comparison of aggregated rows.
//!
//! Joins current and previous period aggregates with a full outer join
//! on the dimension key, computes deltas, and layers ranking and
//! business filters on top. Pure functions over their inputs.
//!
//! # Zero-fill join policy
//!
//! A key present in only one period still appears in the output; the
//! missing side contributes zero for every numeric field. This is a
//! fill policy, not a measured zero: new and dropped entities should
//! show their full delta rather than vanish from the report. A key new
//! in the current period therefore has no meaningful percent change,
//! and `clicks_pct_change` reports the fixed [`NEW_ENTITY_PCT_CHANGE`]
//! sentinel instead of dividing by zero.

use std::collections::HashMap;

use crate::model::{AggregatedRow, ComparisonRow, DimensionKey};
use crate::validation::{check_aggregated, DataValidationError};

/// Sentinel percent change reported when the previous period had zero
/// clicks for a key.
pub const NEW_ENTITY_PCT_CHANGE: f64 = 100.0;

/// Cap applied by [`declining_with_rising_reach`].
pub const DECLINING_REACH_CAP: usize = 20;

/// The derived fields a comparison can be ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaField {
    ClicksDiff,
    ImpressionsDiff,
    CtrDiff,
    PositionDiff,
    ClicksPctChange,
}

impl DeltaField {
    fn value(&self, row: &ComparisonRow) -> f64 {
        match self {
            DeltaField::ClicksDiff => row.clicks_diff as f64,
            DeltaField::ImpressionsDiff => row.impressions_diff as f64,
            DeltaField::CtrDiff => row.ctr_diff,
            DeltaField::PositionDiff => row.position_diff,
            DeltaField::ClicksPctChange => row.clicks_pct_change,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Full outer join of two period aggregates on dimension key.
///
/// Output order: keys in current-period order first, then keys seen
/// only in the previous period, in their input order. Both empty yields
/// an empty result, not an error.
///
/// Fails with [`DataValidationError`] if a row carries a non-finite
/// rate metric; the zero-fill for a key missing from one side is the
/// documented exception and never an error.
pub fn compare(
    current: &[AggregatedRow],
    previous: &[AggregatedRow],
) -> Result<Vec<ComparisonRow>, DataValidationError> {
    for row in current.iter().chain(previous) {
        check_aggregated(row)?;
    }

    let mut prev_by_key: HashMap<&DimensionKey, &AggregatedRow> =
        HashMap::with_capacity(previous.len());
    for row in previous {
        prev_by_key.insert(&row.key, row);
    }

    let mut out = Vec::with_capacity(current.len() + previous.len());

    for cur in current {
        let prev = prev_by_key.remove(&cur.key);
        out.push(join_row(&cur.key, Some(cur), prev));
    }

    // Keys dropped since the previous period, zero-filled on the
    // current side. `prev_by_key` no longer holds keys seen above.
    for prev in previous {
        if prev_by_key.remove(&prev.key).is_some() {
            out.push(join_row(&prev.key, None, Some(prev)));
        }
    }

    Ok(out)
}

fn join_row(
    key: &DimensionKey,
    current: Option<&AggregatedRow>,
    previous: Option<&AggregatedRow>,
) -> ComparisonRow {
    let (clicks_cur, impressions_cur, ctr_cur, position_cur) = fill(current);
    let (clicks_prev, impressions_prev, ctr_prev, position_prev) = fill(previous);

    let clicks_diff = clicks_cur as i64 - clicks_prev as i64;
    let impressions_diff = impressions_cur as i64 - impressions_prev as i64;
    let ctr_diff = ctr_cur - ctr_prev;
    // Sign inversion: lower position is better, so previous - current
    // makes a positive value mean the rank improved.
    let position_diff = position_prev - position_cur;

    let clicks_pct_change = if clicks_prev == 0 {
        NEW_ENTITY_PCT_CHANGE
    } else {
        clicks_diff as f64 / clicks_prev as f64 * 100.0
    };

    ComparisonRow {
        key: key.clone(),
        clicks_current: clicks_cur,
        clicks_previous: clicks_prev,
        impressions_current: impressions_cur,
        impressions_previous: impressions_prev,
        ctr_current: ctr_cur,
        ctr_previous: ctr_prev,
        position_current: position_cur,
        position_previous: position_prev,
        clicks_diff,
        ctr_diff,
        impressions_diff,
        position_diff,
        clicks_pct_change,
    }
}

fn fill(row: Option<&AggregatedRow>) -> (u64, u64, f64, f64) {
    match row {
        Some(r) => (r.clicks, r.impressions, r.ctr, r.position),
        None => (0, 0, 0.0, 0.0),
    }
}

/// Stable sort by `field` in `direction`, truncated to `n` rows.
///
/// Ties keep their input order; `sort_by` is a stable sort, so equal
/// values never swap. The tie-break is therefore "whoever came first in
/// the comparison output".
pub fn top_n_by(
    rows: &[ComparisonRow],
    field: DeltaField,
    n: usize,
    direction: SortDirection,
) -> Vec<ComparisonRow> {
    let mut sorted: Vec<ComparisonRow> = rows.to_vec();
    sorted.sort_by(|a, b| {
        let ord = field.value(a).total_cmp(&field.value(b));
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    sorted.truncate(n);
    sorted
}

/// The "losing clicks and CTR despite more impressions" signal.
///
/// Keeps rows where clicks_diff < 0 AND ctr_diff < 0 AND
/// impressions_diff > 0, then truncates to the top
/// [`DECLINING_REACH_CAP`] by impressions_diff descending. This is a
/// named business signal, not a generic filter: reach is growing while
/// the entity captures less of it.
pub fn declining_with_rising_reach(rows: &[ComparisonRow]) -> Vec<ComparisonRow> {
    let declining: Vec<ComparisonRow> = rows
        .iter()
        .filter(|r| r.clicks_diff < 0 && r.ctr_diff < 0.0 && r.impressions_diff > 0)
        .cloned()
        .collect();
    top_n_by(
        &declining,
        DeltaField::ImpressionsDiff,
        DECLINING_REACH_CAP,
        SortDirection::Descending,
    )
}
