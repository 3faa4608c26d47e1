//! TOML-based configuration.
//!
//! Settings live in a `serptrends.toml` next to the caller's working
//! directory (or wherever the caller points `Settings::load`). Every
//! section and field is optional; missing pieces fall back to the
//! defaults below.
//!
//! Example configuration:
//! ```toml
//! [query]
//! row_limit = 25000
//! country = "USA"
//! data_state = "final"
//!
//! [report]
//! top_n = 10
//! rank_by = "clicks_diff"
//!
//! [client]
//! ctr_scale = "fraction"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::client::{CtrScale, DataState};
use crate::compare::{DeltaField, SortDirection};
use crate::report::ReportOptions;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub query: QuerySettings,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub client: ClientSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    pub row_limit: u32,
    pub country: Option<String>,
    pub data_state: DataState,
}

impl Default for QuerySettings {
    fn default() -> Self {
        QuerySettings {
            row_limit: 25_000,
            country: None,
            data_state: DataState::Final,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub top_n: usize,
    pub rank_by: DeltaField,
    pub rank_direction: SortDirection,
    pub include_trend: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            top_n: 10,
            rank_by: DeltaField::ClicksDiff,
            rank_direction: SortDirection::Descending,
            include_trend: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// How the upstream source encodes CTR; converted to a fraction at
    /// the response boundary.
    pub ctr_scale: CtrScale,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        match Self::load(&path) {
            Err(SettingsError::FileNotFound(_)) => Ok(Settings::default()),
            other => other,
        }
    }

    /// Translate file settings into per-report options.
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            top_n: self.report.top_n,
            rank_by: self.report.rank_by,
            rank_direction: self.report.rank_direction,
            row_limit: self.query.row_limit,
            include_trend: self.report.include_trend,
            country: self.query.country.clone(),
            data_state: self.query.data_state,
        }
    }
}
