//! End-to-end report generation.
//!
//! This module provides the high-level API that ties the pipeline
//! together:
//!
//! ```text
//! fetch current + previous → aggregate each → compare → rank
//!        └─ optional date-granular fetch → select trend → pivot
//! ```
//!
//! Fetches are sequential and synchronous; a long-running call simply
//! blocks the single active report generation. A fetch either fully
//! succeeds or the report aborts before merge time; there is no
//! partial-result mode and no retry.

use std::collections::HashSet;

use crate::client::{ClientError, DataState, QueryRequest, SearchAnalyticsClient};
use crate::compare::{
    compare, declining_with_rising_reach, top_n_by, DeltaField, SortDirection,
};
use crate::model::{AggregatedRow, ComparisonRow, DateRange, DimensionKey, Grouping};
use crate::trend::{daily_totals, pivot_for_chart, select_trend, ChartTable, DailyTotal};
use crate::aggregate;
use crate::validation::DataValidationError;

/// Errors that can abort a report generation.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    #[error("invalid data: {0}")]
    Validation(#[from] DataValidationError),
}

/// Knobs for one report request.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// How many top movers to keep.
    pub top_n: usize,
    /// Which derived field ranks the movers.
    pub rank_by: DeltaField,
    pub rank_direction: SortDirection,
    /// Row limit passed to each API query.
    pub row_limit: u32,
    /// Also fetch date-granular rows and build the chart tables.
    pub include_trend: bool,
    /// Optional country equals-filter (e.g. "USA").
    pub country: Option<String>,
    pub data_state: DataState,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            top_n: 10,
            rank_by: DeltaField::ClicksDiff,
            rank_direction: SortDirection::Descending,
            row_limit: 25_000,
            include_trend: true,
            country: None,
            data_state: DataState::Final,
        }
    }
}

/// Everything a front-end needs to render or export one report. All
/// tables are transient; nothing persists past the caller dropping
/// this value.
#[derive(Debug, Clone)]
pub struct Report {
    pub site: String,
    pub range: DateRange,
    pub previous_range: DateRange,
    /// Full outer-join comparison, one row per key seen in either period.
    pub comparison: Vec<ComparisonRow>,
    /// Current-period aggregate, for the summary table export.
    pub current_summary: Vec<AggregatedRow>,
    pub top_movers: Vec<ComparisonRow>,
    pub declining_reach: Vec<ComparisonRow>,
    /// Dense date-by-key clicks grid for the top movers.
    pub trend: Option<ChartTable>,
    /// Per-date clicks and unique-page counts across all keys.
    pub daily: Vec<DailyTotal>,
}

impl Report {
    /// The informational "no data" state: both periods came back empty.
    pub fn is_empty(&self) -> bool {
        self.comparison.is_empty()
    }
}

/// Run the whole pipeline for `site` over `range`, comparing against
/// the adjacent previous period.
pub fn generate<C: SearchAnalyticsClient>(
    client: &C,
    site: &str,
    range: DateRange,
    grouping: Grouping,
    options: &ReportOptions,
) -> Result<Report, ReportError> {
    let previous_range = range.previous_period();

    let current_fetch = client.query(site, &request(range, grouping.dimensions(), options))?;
    let previous_fetch =
        client.query(site, &request(previous_range, grouping.dimensions(), options))?;

    let current = aggregate::aggregate(&current_fetch.rows);
    let previous = aggregate::aggregate(&previous_fetch.rows);

    let comparison = compare(&current, &previous)?;
    let top_movers = top_n_by(
        &comparison,
        options.rank_by,
        options.top_n,
        options.rank_direction,
    );
    let declining_reach = declining_with_rising_reach(&comparison);

    let (chart, daily) = if options.include_trend && !comparison.is_empty() {
        let granular =
            client.query(site, &request(range, grouping.trend_dimensions(), options))?;
        let top_keys: HashSet<DimensionKey> =
            top_movers.iter().map(|r| r.key.clone()).collect();
        let selected = select_trend(&granular.rows, &top_keys);
        let chart = pivot_for_chart(&selected)?;
        let daily = daily_totals(&granular.rows);
        (Some(chart), daily)
    } else {
        (None, Vec::new())
    };

    Ok(Report {
        site: site.to_string(),
        range,
        previous_range,
        comparison,
        current_summary: current,
        top_movers,
        declining_reach,
        trend: chart,
        daily,
    })
}

fn request(
    range: DateRange,
    dimensions: Vec<crate::model::Dimension>,
    options: &ReportOptions,
) -> QueryRequest {
    let mut req = QueryRequest::new(range, dimensions, options.row_limit)
        .with_data_state(options.data_state);
    if let Some(country) = &options.country {
        req = req.with_country(country.clone());
    }
    req
}
