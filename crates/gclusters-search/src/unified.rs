//! The site-wide search box.
//!
//! Input is normalized through the synonym dictionary, classified as a
//! position or an object name, and handed to the catalog fan-out. Object
//! searches also start polling for the generated literature summary.

use std::sync::Arc;

use tokio::task::JoinHandle;

use gclusters_types::error::{GcError, Result};

use crate::coords::{SearchInput, parse_input};
use crate::fanout::{FanOut, FanOutReport};
use crate::summary::{SummaryOutcome, SummaryPoller};
use crate::synonyms::normalize_query;

/// A search box submission after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSearch {
    /// Trimmed text as typed.
    pub original: String,
    /// Text after synonym normalization; this is what gets searched.
    pub query: String,
    pub input: SearchInput,
}

impl PreparedSearch {
    pub fn new(raw: &str) -> Result<Self> {
        let original = raw.trim();
        if original.is_empty() {
            return Err(GcError::Search("empty search query".into()));
        }
        let query = normalize_query(original);
        let input = parse_input(&query);
        Ok(Self {
            original: original.to_string(),
            query,
            input,
        })
    }

    pub fn was_normalized(&self) -> bool {
        self.query != self.original
    }
}

/// Result of one search box submission.
pub struct UnifiedOutcome {
    pub search: PreparedSearch,
    pub report: FanOutReport,
    /// Summary polling, running in the background for object searches.
    pub summary: Option<JoinHandle<SummaryOutcome>>,
}

pub struct UnifiedSearch {
    fanout: FanOut,
    summaries: Arc<SummaryPoller>,
}

impl UnifiedSearch {
    pub fn new(fanout: FanOut, summaries: SummaryPoller) -> Self {
        Self {
            fanout,
            summaries: Arc::new(summaries),
        }
    }

    /// Run the fan-out for `raw` and start summary polling for object
    /// names. Must be called within a tokio runtime.
    pub async fn search(&self, raw: &str) -> Result<UnifiedOutcome> {
        let search = PreparedSearch::new(raw)?;
        if search.was_normalized() {
            log::info!("Query normalized: \"{}\" -> \"{}\"", search.original, search.query);
        }

        let report = self.fanout.run(&search.query).await;

        let summary = search.input.object_name().map(|name| {
            let poller = Arc::clone(&self.summaries);
            let name = name.to_string();
            tokio::spawn(async move { poller.poll(&name).await })
        });

        Ok(UnifiedOutcome {
            search,
            report,
            summary,
        })
    }
}
