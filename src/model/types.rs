// src/model/types.rs
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named axis the analytics API can group results by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Date,
    Query,
    Page,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Date => "date",
            Dimension::Query => "query",
            Dimension::Page => "page",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The non-date grouping requested for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    Query,
    Page,
    QueryPage,
}

impl Grouping {
    /// Dimensions to request for an aggregate (period-level) fetch.
    pub fn dimensions(&self) -> Vec<Dimension> {
        match self {
            Grouping::Query => vec![Dimension::Query],
            Grouping::Page => vec![Dimension::Page],
            Grouping::QueryPage => vec![Dimension::Query, Dimension::Page],
        }
    }

    /// Dimensions to request for a date-granular (trend) fetch.
    pub fn trend_dimensions(&self) -> Vec<Dimension> {
        let mut dims = vec![Dimension::Date];
        dims.extend(self.dimensions());
        dims
    }
}

/// The grouping identity of a row.
///
/// Equality is exact string equality. No case folding or trailing-slash
/// normalization is applied, so two spellings of the same URL are two
/// distinct keys. Upstream data is taken as delivered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DimensionKey {
    Query(String),
    Page(String),
    QueryPage(String, String),
}

impl DimensionKey {
    pub fn query(q: impl Into<String>) -> Self {
        DimensionKey::Query(q.into())
    }

    pub fn page(p: impl Into<String>) -> Self {
        DimensionKey::Page(p.into())
    }

    pub fn query_page(q: impl Into<String>, p: impl Into<String>) -> Self {
        DimensionKey::QueryPage(q.into(), p.into())
    }

    /// The page URL carried by this key, if any.
    pub fn page_url(&self) -> Option<&str> {
        match self {
            DimensionKey::Query(_) => None,
            DimensionKey::Page(p) => Some(p),
            DimensionKey::QueryPage(_, p) => Some(p),
        }
    }

    /// Single-cell rendering for table/CSV output and chart column headers.
    pub fn label(&self) -> String {
        match self {
            DimensionKey::Query(q) => q.clone(),
            DimensionKey::Page(p) => p.clone(),
            DimensionKey::QueryPage(q, p) => format!("{} | {}", q, p),
        }
    }
}

impl fmt::Display for DimensionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// An inclusive calendar date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// Number of calendar days covered, both endpoints included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The adjacent, equal-length, non-overlapping window ending the day
    /// before `start`. This is the "previous period" used for comparison.
    pub fn previous_period(&self) -> DateRange {
        let end = self.start - Duration::days(1);
        let start = end - Duration::days(self.num_days() - 1);
        DateRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
