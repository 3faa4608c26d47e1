//! # serptrends
//!
//! Period-over-period trend analysis for search analytics data.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │         Analytics API (external collaborator)            │
//! │      site + date range + dimensions → MetricRows         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [client / response decoding]
//! ┌─────────────────────────────────────────────────────────┐
//! │        FetchResult (current, previous, granular)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [aggregate]
//! ┌─────────────────────────────────────────────────────────┐
//! │          AggregatedRow (one per dimension key)           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [compare: zero-fill outer join]
//! ┌─────────────────────────────────────────────────────────┐
//! │     ComparisonRow + ranking + declining-reach filter     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [trend: select + dense pivot]
//! ┌─────────────────────────────────────────────────────────┐
//! │          ChartTable / DailyTotals / CSV export           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine is synchronous and pure past the client boundary: two
//! (or three) sequential fetches per report, no shared mutable state
//! beyond the caller-owned [`session::Session`].

pub mod aggregate;
pub mod client;
pub mod compare;
pub mod config;
pub mod export;
pub mod model;
pub mod report;
pub mod session;
pub mod trend;
pub mod validation;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::aggregate::aggregate;
    pub use crate::client::{
        parse_response, ClientError, CtrScale, DataState, QueryRequest, SearchAnalyticsClient,
    };
    pub use crate::compare::{
        compare, declining_with_rising_reach, top_n_by, DeltaField, SortDirection,
    };
    pub use crate::model::{
        AggregatedRow, ComparisonRow, DateRange, Dimension, DimensionKey, FetchResult, Grouping,
        MetricRow,
    };
    pub use crate::report::{generate, Report, ReportError, ReportOptions};
    pub use crate::session::Session;
    pub use crate::trend::{daily_totals, pivot_for_chart, select_trend, ChartTable};
    pub use crate::validation::DataValidationError;
}
