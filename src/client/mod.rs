//! Boundary with the external search-analytics API.
//!
//! The engine never talks to the network itself; it asks a
//! [`SearchAnalyticsClient`] for rows. The trait mirrors the Search
//! Console query endpoint: a site, an inclusive date range, one to
//! three dimensions, and a row limit, returning rows that each carry a
//! key tuple plus clicks/impressions/ctr/position. No data for the
//! range is an empty result, never an error.

pub mod response;

pub use response::{parse_response, CtrScale};

use serde::{Deserialize, Serialize};

use crate::model::{DateRange, Dimension, FetchResult};
use crate::validation::DataValidationError;

/// Errors crossing the client boundary. Upstream failures are surfaced
/// as-is; there is no retry policy, a transient failure ends the
/// current report attempt.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("malformed response: {0}")]
    Validation(#[from] DataValidationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Freshness of the data the API should serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataState {
    /// Finalized data only.
    Final,
    /// Include fresh, still-settling data.
    All,
}

/// One equals-filter on a non-grouped dimension (e.g. country).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionFilter {
    pub dimension: String,
    pub expression: String,
    pub operator: String,
}

impl DimensionFilter {
    pub fn country_equals(code: impl Into<String>) -> Self {
        DimensionFilter {
            dimension: "country".to_string(),
            expression: code.into(),
            operator: "equals".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterGroup {
    pub filters: Vec<DimensionFilter>,
}

/// The wire shape of one analytics query. Serializes to the camelCase
/// body the API expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub dimensions: Vec<Dimension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimension_filter_groups: Vec<FilterGroup>,
    pub row_limit: u32,
    pub data_state: DataState,
}

impl QueryRequest {
    pub fn new(range: DateRange, dimensions: Vec<Dimension>, row_limit: u32) -> Self {
        QueryRequest {
            start_date: range.start,
            end_date: range.end,
            dimensions,
            dimension_filter_groups: Vec::new(),
            row_limit,
            data_state: DataState::Final,
        }
    }

    pub fn with_country(mut self, code: impl Into<String>) -> Self {
        self.dimension_filter_groups.push(FilterGroup {
            filters: vec![DimensionFilter::country_equals(code)],
        });
        self
    }

    pub fn with_data_state(mut self, state: DataState) -> Self {
        self.data_state = state;
        self
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// A site the authenticated account can see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteEntry {
    pub site_url: String,
    pub permission_level: String,
}

impl SiteEntry {
    /// Only owner-verified sites are offered for reporting.
    pub fn is_owner(&self) -> bool {
        self.permission_level == "siteOwner"
    }
}

/// The external collaborator that executes queries.
///
/// `Send + Sync` so the two period fetches may run from separate
/// threads if a caller chooses to; the engine itself issues them
/// sequentially.
pub trait SearchAnalyticsClient: Send + Sync {
    /// Execute one analytics query against `site`.
    ///
    /// Absence of data for the range yields an empty [`FetchResult`],
    /// not an error.
    fn query(&self, site: &str, request: &QueryRequest) -> Result<FetchResult, ClientError>;

    /// List the sites visible to the authenticated account.
    fn list_sites(&self) -> Result<Vec<SiteEntry>, ClientError>;
}

/// Filter a site listing down to owner-verified site URLs.
pub fn verified_sites(entries: &[SiteEntry]) -> Vec<String> {
    entries
        .iter()
        .filter(|e| e.is_owner())
        .map(|e| e.site_url.clone())
        .collect()
}
