//! Narrow a date-granular fetch to the top-ranked keys and shape it
//! for charting.
//!
//! Charting front-ends want a dense grid: every (date, key) cell has a
//! value, and a key with no traffic on a given day is an explicit zero,
//! not an absent cell. The pivot here fills that grid itself rather
//! than leaning on a rendering library's implicit behavior.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;

use crate::model::{DimensionKey, MetricRow};
use crate::validation::DataValidationError;

/// Keep only the rows whose key is in `top_keys`, preserving date and
/// key for charting. Order follows the input.
pub fn select_trend(rows: &[MetricRow], top_keys: &HashSet<DimensionKey>) -> Vec<MetricRow> {
    rows.iter()
        .filter(|r| top_keys.contains(&r.key))
        .cloned()
        .collect()
}

/// A dense date-by-key grid of clicks, ready for a line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartTable {
    /// Sorted ascending; the union of all dates observed in the input.
    pub dates: Vec<NaiveDate>,
    /// One column per distinct key, in first-seen input order.
    pub columns: Vec<DimensionKey>,
    /// `values[date_index][column_index]`, zero where no row existed.
    pub values: Vec<Vec<u64>>,
}

impl ChartTable {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Cell lookup by date and key. `None` if either axis lacks the label.
    pub fn value(&self, date: NaiveDate, key: &DimensionKey) -> Option<u64> {
        let di = self.dates.iter().position(|d| *d == date)?;
        let ci = self.columns.iter().position(|k| k == key)?;
        Some(self.values[di][ci])
    }
}

/// Pivot rows into a dense grid indexed by date with one column per
/// key and clicks as values.
///
/// Missing (date, key) combinations are filled with 0. The date axis is
/// the sorted union of every date present across all keys. Rows from a
/// date-granular fetch always carry a date; a row without one fails
/// validation rather than being silently dropped.
pub fn pivot_for_chart(rows: &[MetricRow]) -> Result<ChartTable, DataValidationError> {
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut columns: Vec<DimensionKey> = Vec::new();
    let mut cells: BTreeMap<(NaiveDate, usize), u64> = BTreeMap::new();

    for row in rows {
        let date = row
            .date
            .ok_or_else(|| DataValidationError::missing(row.key.label(), "date"))?;
        dates.insert(date);
        let col = match columns.iter().position(|k| k == &row.key) {
            Some(i) => i,
            None => {
                columns.push(row.key.clone());
                columns.len() - 1
            }
        };
        // Duplicate (date, key) observations accumulate.
        *cells.entry((date, col)).or_insert(0) += row.clicks;
    }

    let dates: Vec<NaiveDate> = dates.into_iter().collect();
    let values = dates
        .iter()
        .map(|date| {
            (0..columns.len())
                .map(|col| cells.get(&(*date, col)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    Ok(ChartTable {
        dates,
        columns,
        values,
    })
}

/// Per-date totals across all keys: total clicks and distinct pages.
///
/// Feeds the "total clicks per day" and "unique URLs per day" line
/// charts. Rows whose key carries no page URL contribute to clicks
/// only.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub clicks: u64,
    pub unique_pages: u64,
}

/// Reduce date-granular rows to one [`DailyTotal`] per date, sorted
/// ascending. Rows without a date are skipped; daily totals are a
/// convenience series, not a validation gate.
pub fn daily_totals(rows: &[MetricRow]) -> Vec<DailyTotal> {
    let mut clicks: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    let mut pages: BTreeMap<NaiveDate, HashSet<&str>> = BTreeMap::new();

    for row in rows {
        let Some(date) = row.date else { continue };
        *clicks.entry(date).or_insert(0) += row.clicks;
        if let Some(url) = row.key.page_url() {
            pages.entry(date).or_default().insert(url);
        }
    }

    clicks
        .into_iter()
        .map(|(date, clicks)| DailyTotal {
            date,
            clicks,
            unique_pages: pages.get(&date).map_or(0, |s| s.len() as u64),
        })
        .collect()
}
