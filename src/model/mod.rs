//! Core data types for search-analytics trend reports.

pub mod row;
pub mod types;

pub use row::{AggregatedRow, ComparisonRow, FetchResult, MetricRow};
pub use types::{DateRange, Dimension, DimensionKey, Grouping};
