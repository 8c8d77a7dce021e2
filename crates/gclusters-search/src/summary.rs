//! Polling for the backend's generated literature summary.
//!
//! After an object search the backend prepares a written summary of the
//! retrieved articles in the background. The poller asks for it at a fixed
//! interval until it is ready, has failed, or the check budget is spent.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use gclusters_types::error::{GcError, Result};

use crate::transport::JsonTransport;

pub const POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const MAX_CHECKS: u32 = 30;
pub const DEFAULT_MAX_RESULTS: u32 = 20;

/// State reported by one status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryStatus {
    /// Ready; carries the first article's summary when there is one.
    Completed(Option<String>),
    Failed,
    Pending,
}

/// How a polling run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Completed(Option<String>),
    Failed,
    /// A check could not be made; polling stops.
    Error(String),
    /// Still pending after the last allowed check.
    Exhausted,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: Option<String>,
    summary_status: Option<String>,
    #[serde(default)]
    articles: Vec<SummaryArticle>,
}

#[derive(Debug, Deserialize)]
struct SummaryArticle {
    general_summary: Option<String>,
}

impl From<StatusResponse> for SummaryStatus {
    fn from(r: StatusResponse) -> Self {
        match r.summary_status.as_deref() {
            Some("completed") if r.status.as_deref() == Some("success") => {
                let summary = r
                    .articles
                    .into_iter()
                    .next()
                    .and_then(|a| a.general_summary)
                    .filter(|s| !s.trim().is_empty());
                SummaryStatus::Completed(summary)
            },
            Some("failed") => SummaryStatus::Failed,
            _ => SummaryStatus::Pending,
        }
    }
}

/// Polls `{base}/search/llm-summary-status`.
pub struct SummaryPoller {
    transport: Arc<dyn JsonTransport>,
    base: String,
    interval: Duration,
    max_checks: u32,
    max_results: u32,
}

impl SummaryPoller {
    pub fn new(transport: Arc<dyn JsonTransport>, base: impl Into<String>) -> Self {
        Self {
            transport,
            base: base.into().trim_end_matches('/').to_string(),
            interval: POLL_INTERVAL,
            max_checks: MAX_CHECKS,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_checks(mut self, max_checks: u32) -> Self {
        self.max_checks = max_checks;
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    fn status_url(&self, object_name: &str) -> Result<String> {
        let base = format!("{}/search/llm-summary-status", self.base);
        let max_results = self.max_results.to_string();
        reqwest::Url::parse_with_params(
            &base,
            [("object_name", object_name), ("max_results", max_results.as_str())],
        )
        .map(String::from)
        .map_err(|e| GcError::Search(format!("invalid summary URL {base}: {e}")))
    }

    /// One status check.
    pub async fn check(&self, object_name: &str) -> Result<SummaryStatus> {
        let url = self.status_url(object_name)?;
        let body = self.transport.get_json(&url).await?;
        let response: StatusResponse = serde_json::from_value(body)?;
        Ok(response.into())
    }

    /// Check every interval until the summary settles.
    ///
    /// The first check happens one interval after the call.
    pub async fn poll(&self, object_name: &str) -> SummaryOutcome {
        for attempt in 1..=self.max_checks {
            tokio::time::sleep(self.interval).await;
            match self.check(object_name).await {
                Ok(SummaryStatus::Completed(summary)) => {
                    log::info!("Summary for '{object_name}' ready after {attempt} checks");
                    return SummaryOutcome::Completed(summary);
                },
                Ok(SummaryStatus::Failed) => {
                    log::info!("Summary generation for '{object_name}' failed");
                    return SummaryOutcome::Failed;
                },
                Ok(SummaryStatus::Pending) => {},
                Err(e) => {
                    log::warn!("Summary status check for '{object_name}' failed: {e}");
                    return SummaryOutcome::Error(e.to_string());
                },
            }
        }
        log::debug!("Stopped checking summary status for '{object_name}'");
        SummaryOutcome::Exhausted
    }
}
