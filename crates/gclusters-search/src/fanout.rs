//! Multi-source object search.
//!
//! One object query is sent to the backend's SIMBAD, VizieR, ADS and arXiv
//! endpoints in turn. Each source is timed on its own and a failing source
//! is recorded and skipped; it never prevents the remaining sources from
//! being queried.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use gclusters_i18n::TextLookup;
use gclusters_types::error::{GcError, Result};
use gclusters_types::lang::Lang;

use crate::transport::JsonTransport;

/// Backend API used when the site is served from a developer machine.
pub const LOCAL_API_BASE: &str = "http://localhost:8000";

/// API base for a site served at `scheme://host`.
pub fn api_base_for(scheme: &str, host: &str) -> String {
    let hostname = host.split(':').next().unwrap_or(host);
    if hostname == "localhost" || hostname == "127.0.0.1" {
        LOCAL_API_BASE.to_string()
    } else {
        format!("{scheme}://{host}/api")
    }
}

// -----------------------------------------------------------------------
// Sources
// -----------------------------------------------------------------------

/// A backend search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogSource {
    Simbad,
    Vizier,
    Ads,
    Arxiv,
}

impl CatalogSource {
    /// Query order.
    pub const ALL: [CatalogSource; 4] = [Self::Simbad, Self::Vizier, Self::Ads, Self::Arxiv];

    /// Path segment under `{api}/search/`.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Simbad => "simbad",
            Self::Vizier => "vizier",
            Self::Ads => "ads",
            Self::Arxiv => "arxiv",
        }
    }

    /// Field of the endpoint's response that carries the data.
    pub fn response_field(self) -> &'static str {
        match self {
            Self::Arxiv => "articles",
            other => other.slug(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Simbad => "SIMBAD",
            Self::Vizier => "VizieR",
            Self::Ads => "ADS",
            Self::Arxiv => "arXiv",
        }
    }

    /// Text key announcing the query.
    pub fn pending_key(self) -> &'static str {
        match self {
            Self::Simbad => "chatSearchingSimbad",
            Self::Vizier => "chatQueryingVizier",
            Self::Ads => "chatSearchingAds",
            Self::Arxiv => "chatSearchingArxiv",
        }
    }

    fn completed_key(self) -> &'static str {
        match self {
            Self::Simbad => "chatSimbadCompleted",
            Self::Vizier => "chatVizierCompleted",
            Self::Ads => "chatAdsCompleted",
            Self::Arxiv => "chatArxivCompleted",
        }
    }

    fn failed_key(self) -> &'static str {
        match self {
            Self::Simbad => "chatSimbadFailed",
            Self::Vizier => "chatVizierFailed",
            Self::Ads => "chatAdsFailed",
            Self::Arxiv => "chatArxivFailed",
        }
    }
}

// -----------------------------------------------------------------------
// Report
// -----------------------------------------------------------------------

/// How one source fared.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceStatus {
    Completed { data: Value, elapsed: Duration },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceOutcome {
    pub source: CatalogSource,
    pub status: SourceStatus,
}

impl SourceOutcome {
    pub fn data(&self) -> Option<&Value> {
        match &self.status {
            SourceStatus::Completed { data, .. } => Some(data),
            SourceStatus::Failed { .. } => None,
        }
    }

    /// Time taken by a completed source; failures count as zero.
    pub fn elapsed(&self) -> Duration {
        match &self.status {
            SourceStatus::Completed { elapsed, .. } => *elapsed,
            SourceStatus::Failed { .. } => Duration::ZERO,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, SourceStatus::Failed { .. })
    }

    /// Whether the source returned at least one record.
    pub fn has_records(&self) -> bool {
        self.data()
            .and_then(Value::as_array)
            .is_some_and(|records| !records.is_empty())
    }

    /// Progress line, e.g. `SIMBAD completed (0.42s)`.
    pub fn progress_message(&self, texts: &dyn TextLookup, lang: &Lang) -> String {
        match &self.status {
            SourceStatus::Completed { elapsed, .. } => format!(
                "{} ({:.2}s)",
                texts.text(self.source.completed_key(), lang),
                elapsed.as_secs_f64()
            ),
            SourceStatus::Failed { .. } => texts.text(self.source.failed_key(), lang),
        }
    }
}

/// Aggregated result of one fan-out.
#[derive(Debug, Clone, PartialEq)]
pub struct FanOutReport {
    pub query: String,
    /// One entry per source, in query order.
    pub outcomes: Vec<SourceOutcome>,
}

impl FanOutReport {
    pub fn outcome(&self, source: CatalogSource) -> Option<&SourceOutcome> {
        self.outcomes.iter().find(|o| o.source == source)
    }

    pub fn data(&self, source: CatalogSource) -> Option<&Value> {
        self.outcome(source).and_then(SourceOutcome::data)
    }

    /// Sum of the completed sources' times.
    pub fn total_elapsed(&self) -> Duration {
        self.outcomes.iter().map(SourceOutcome::elapsed).sum()
    }

    pub fn failed_sources(&self) -> Vec<CatalogSource> {
        self.outcomes
            .iter()
            .filter(|o| o.is_failed())
            .map(|o| o.source)
            .collect()
    }

    /// `true` when no source returned any record.
    pub fn is_empty(&self) -> bool {
        !self.outcomes.iter().any(SourceOutcome::has_records)
    }
}

// -----------------------------------------------------------------------
// FanOut
// -----------------------------------------------------------------------

/// Queries every [`CatalogSource`] for one object.
pub struct FanOut {
    transport: Arc<dyn JsonTransport>,
    api_base: String,
}

impl FanOut {
    pub fn new(transport: Arc<dyn JsonTransport>, api_base: impl Into<String>) -> Self {
        Self {
            transport,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Endpoint URL for `source`.
    pub fn source_url(&self, source: CatalogSource, query: &str) -> Result<String> {
        let base = format!("{}/search/{}", self.api_base, source.slug());
        reqwest::Url::parse_with_params(&base, [("object_name", query)])
            .map(String::from)
            .map_err(|e| GcError::Search(format!("invalid source URL {base}: {e}")))
    }

    /// Query all sources one after another.
    pub async fn run(&self, query: &str) -> FanOutReport {
        let mut outcomes = Vec::with_capacity(CatalogSource::ALL.len());
        for source in CatalogSource::ALL {
            outcomes.push(self.query_source(source, query).await);
        }

        let report = FanOutReport {
            query: query.to_string(),
            outcomes,
        };
        log::info!(
            "Fan-out for '{query}' finished in {:.2}s ({} failed)",
            report.total_elapsed().as_secs_f64(),
            report.failed_sources().len()
        );
        report
    }

    /// Query one source, timing it and capturing any failure.
    pub async fn query_source(&self, source: CatalogSource, query: &str) -> SourceOutcome {
        let started = Instant::now();
        let status = match self.fetch(source, query).await {
            Ok(data) => SourceStatus::Completed {
                data,
                elapsed: started.elapsed(),
            },
            Err(e) => {
                log::warn!("{} search for '{query}' failed: {e}", source.label());
                SourceStatus::Failed {
                    error: e.to_string(),
                }
            },
        };
        SourceOutcome { source, status }
    }

    async fn fetch(&self, source: CatalogSource, query: &str) -> Result<Value> {
        let url = self.source_url(source, query)?;
        let mut body = self.transport.get_json(&url).await?;
        Ok(body
            .get_mut(source.response_field())
            .map(Value::take)
            .unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use gclusters_i18n::SiteTexts;

    use crate::test_utils::MockTransport;

    fn fanout(transport: &Arc<MockTransport>) -> FanOut {
        FanOut::new(
            Arc::clone(transport) as Arc<dyn JsonTransport>,
            "http://localhost:8000/",
        )
    }

    fn assert_near(actual: Duration, expected_ms: u64) {
        let expected = Duration::from_millis(expected_ms);
        assert!(
            actual >= expected && actual < expected + Duration::from_millis(10),
            "{actual:?} not near {expected:?}"
        );
    }

    fn full_transport() -> MockTransport {
        MockTransport::new()
            .reply_after(
                "/search/simbad",
                Duration::from_millis(400),
                json!({ "simbad": [{ "main_id": "M 31" }] }),
            )
            .reply_after(
                "/search/vizier",
                Duration::from_millis(1200),
                json!({ "vizier": [{ "catalog": "VII/237", "rows": [] }] }),
            )
            .reply_after(
                "/search/ads",
                Duration::from_millis(300),
                json!({ "ads": [{ "bibcode": "2006AJ....131.1163S" }] }),
            )
            .reply_after(
                "/search/arxiv",
                Duration::from_millis(100),
                json!({ "articles": [{ "title": "Andromeda" }] }),
            )
    }

    #[test]
    fn api_base_selection() {
        assert_eq!(api_base_for("http", "localhost:8002"), LOCAL_API_BASE);
        assert_eq!(api_base_for("http", "127.0.0.1"), LOCAL_API_BASE);
        assert_eq!(
            api_base_for("https", "gclusters.example.org"),
            "https://gclusters.example.org/api"
        );
    }

    #[test]
    fn source_url_encodes_query() {
        let f = fanout(&Arc::new(MockTransport::new()));
        assert_eq!(
            f.source_url(CatalogSource::Vizier, "Abell 1656").unwrap(),
            "http://localhost:8000/search/vizier?object_name=Abell+1656"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn queries_sources_in_order_and_times_each() {
        let transport = Arc::new(full_transport());
        let report = fanout(&transport).run("M31").await;

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls.len(), 4);
        assert!(urls[0].contains("/search/simbad?object_name=M31"));
        assert!(urls[1].contains("/search/vizier"));
        assert!(urls[2].contains("/search/ads"));
        assert!(urls[3].contains("/search/arxiv"));

        let simbad = report.outcome(CatalogSource::Simbad).unwrap();
        assert_near(simbad.elapsed(), 400);
        assert_near(report.outcome(CatalogSource::Vizier).unwrap().elapsed(), 1200);
        assert!(report.total_elapsed() >= Duration::from_millis(2000));
        assert_eq!(report.data(CatalogSource::Arxiv).unwrap()[0]["title"], "Andromeda");
        assert!(!report.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn failing_source_does_not_block_others() {
        let transport = Arc::new(
            MockTransport::new()
                .reply("/search/simbad", json!({ "simbad": [] }))
                .fail("/search/vizier", "502 Bad Gateway")
                .reply("/search/ads", json!({ "ads": [{ "bibcode": "x" }] }))
                .reply("/search/arxiv", json!({ "articles": [] })),
        );
        let report = fanout(&transport).run("Abell 1656").await;

        assert_eq!(transport.request_count(), 4);
        assert_eq!(report.failed_sources(), vec![CatalogSource::Vizier]);
        assert!(report.data(CatalogSource::Vizier).is_none());
        assert!(report.outcome(CatalogSource::Ads).unwrap().has_records());
        assert!(!report.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn all_sources_empty_or_failed_is_empty() {
        let transport = Arc::new(
            MockTransport::new()
                .reply("/search/simbad", json!({ "simbad": [] }))
                .reply("/search/vizier", json!({}))
                .fail("/search/ads", "timeout"),
        );
        let report = fanout(&transport).run("nothing").await;
        assert!(report.is_empty());
        assert_eq!(
            report.failed_sources(),
            vec![CatalogSource::Ads, CatalogSource::Arxiv]
        );
        assert_eq!(report.data(CatalogSource::Vizier), Some(&Value::Null));
    }

    #[tokio::test(start_paused = true)]
    async fn progress_messages_are_localized() {
        let transport = Arc::new(MockTransport::new().reply_after(
            "/search/simbad",
            Duration::from_millis(400),
            json!({ "simbad": [{ "main_id": "M 31" }] }),
        ));
        let report = fanout(&transport).run("M31").await;
        let texts = SiteTexts::builtin().unwrap();
        let lang = Lang::en();

        let simbad = report.outcome(CatalogSource::Simbad).unwrap();
        assert_eq!(
            simbad.progress_message(&texts, &lang),
            "SIMBAD completed (0.40s)"
        );
        let arxiv = report.outcome(CatalogSource::Arxiv).unwrap();
        assert_eq!(arxiv.progress_message(&texts, &lang), "arXiv search failed");
    }
}
