//! Persisted record types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gclusters_types::error::GcError;

/// Maximum number of search history entries kept.
pub const SEARCH_HISTORY_LIMIT: usize = 50;

/// Age after which a saved viewport is no longer restored (one hour).
pub const VIEWPORT_MAX_AGE_MS: i64 = 60 * 60 * 1000;

pub const DEFAULT_SURVEY: &str = "P/DSS2/color";
pub const DEFAULT_PROJECTION: &str = "SIN";
pub const DEFAULT_FRAME: &str = "equatorial";

// ---------------------------------------------------------------------------
// Sort order
// ---------------------------------------------------------------------------

/// Result ordering for literature searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "citation_count desc")]
    CitationCountDesc,
    #[serde(rename = "date desc")]
    DateDesc,
}

impl SortOrder {
    /// Value sent as the `sort` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::CitationCountDesc => "citation_count desc",
            SortOrder::DateDesc => "date desc",
        }
    }

    /// The other ordering.
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::CitationCountDesc => SortOrder::DateDesc,
            SortOrder::DateDesc => SortOrder::CitationCountDesc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = GcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "citation_count desc" => Ok(SortOrder::CitationCountDesc),
            "date desc" => Ok(SortOrder::DateDesc),
            other => Err(GcError::Store(format!("invalid sort order: {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Search history
// ---------------------------------------------------------------------------

/// One completed literature search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub results_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl SearchRecord {
    /// A record stamped with the current time.
    pub fn now(query: impl Into<String>, results_count: u64, sort_order: SortOrder) -> Self {
        Self {
            query: query.into(),
            timestamp: Utc::now(),
            results_count,
            sort_order: Some(sort_order),
        }
    }
}

// ---------------------------------------------------------------------------
// Sky viewer viewport
// ---------------------------------------------------------------------------

/// Last known sky viewer position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub ra: f64,
    pub dec: f64,
    pub fov: f64,
    #[serde(default = "default_survey")]
    pub survey: String,
    #[serde(default = "default_projection")]
    pub projection: String,
    #[serde(rename = "cooFrame", default = "default_frame")]
    pub frame: String,
    /// Milliseconds since the Unix epoch when the state was captured.
    pub timestamp: i64,
}

fn default_survey() -> String {
    DEFAULT_SURVEY.to_string()
}
fn default_projection() -> String {
    DEFAULT_PROJECTION.to_string()
}
fn default_frame() -> String {
    DEFAULT_FRAME.to_string()
}

impl ViewportState {
    /// Viewport at the given position with default survey, projection and
    /// frame, stamped with the current time.
    pub fn new(ra: f64, dec: f64, fov: f64) -> Self {
        Self {
            ra,
            dec,
            fov,
            survey: default_survey(),
            projection: default_projection(),
            frame: default_frame(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn with_timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp = timestamp_ms;
        self
    }

    /// Whether the record is too old to restore at `now_ms`.
    ///
    /// A timestamp too far from `now_ms` to subtract counts as expired.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms
            .checked_sub(self.timestamp)
            .is_none_or(|age| age > VIEWPORT_MAX_AGE_MS)
    }

    /// Whether the survey differs from the viewer's default.
    pub fn has_custom_survey(&self) -> bool {
        self.survey != DEFAULT_SURVEY
    }

    /// Position values are finite numbers.
    pub fn is_valid(&self) -> bool {
        self.ra.is_finite() && self.dec.is_finite() && self.fov.is_finite()
    }
}
