//! NASA ADS search client.
//!
//! Requests go either through the site's `/ads-proxy` endpoint, which holds
//! the API token server-side, or straight to the ADS API with a token.
//! Every successful search is appended to the persisted search history
//! together with the sort order in effect.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};

use gclusters_store::{Preferences, SearchRecord, SortOrder, YearBounds};
use gclusters_types::error::{GcError, Result};

use crate::query::AdsQuery;
use crate::transport::JsonTransport;

/// ADS search API.
pub const ADS_API_URL: &str = "https://api.adsabs.harvard.edu/v1/search/query";

/// Path of the site's ADS proxy.
pub const ADS_PROXY_PATH: &str = "/ads-proxy";

/// Fields requested for result lists.
pub const RESULT_FIELDS: &str =
    "bibcode,title,author,year,abstract,doi,citation_count,read_count,pubdate,pub";

/// Fields requested for a single article.
pub const DETAIL_FIELDS: &str =
    "bibcode,title,author,year,abstract,doi,citation_count,read_count,pubdate,pub,keyword,aff";

/// Total the ADS has been seen to report for queries it could not scope.
pub const BOGUS_TOTAL: u64 = 27_148_879;

/// Largest reported total accepted as plausible.
pub const MAX_PLAUSIBLE_TOTAL: u64 = 1_000_000;

/// Totals at or above this are not shown; the returned count is shown
/// instead.
pub const DISPLAY_TOTAL_CAP: u64 = 100_000;

// -----------------------------------------------------------------------
// Response model
// -----------------------------------------------------------------------

/// A field the ADS returns either as a string or as a list of strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::One(s) => Some(s),
            Self::Many(v) => v.first().map(String::as_str),
        }
    }
}

/// One record as returned by the ADS.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AdsDoc {
    #[serde(default)]
    pub bibcode: String,
    pub title: Option<Vec<String>>,
    pub author: Option<Vec<String>>,
    pub year: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<OneOrMany>,
    pub doi: Option<Vec<String>>,
    pub citation_count: Option<u64>,
    pub read_count: Option<u64>,
    pub pubdate: Option<String>,
    #[serde(rename = "pub")]
    pub publication: Option<String>,
    pub keyword: Option<Vec<String>>,
    pub aff: Option<Vec<String>>,
}

impl AdsDoc {
    /// Publication year, when present and numeric.
    pub fn year_number(&self) -> Option<i32> {
        self.year.as_deref().and_then(|y| y.trim().parse().ok())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    docs: Vec<AdsDoc>,
    #[serde(rename = "numFound")]
    num_found: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    error: Option<Value>,
    message: Option<String>,
    response: Option<ResponseBody>,
}

impl Envelope {
    fn parse(value: Value) -> Result<ResponseBody> {
        let envelope: Envelope = serde_json::from_value(value)?;
        if let Some(error) = envelope.error {
            let detail = envelope.message.unwrap_or_else(|| match error {
                Value::String(s) => s,
                other => other.to_string(),
            });
            return Err(GcError::Search(format!("ADS API Error: {detail}")));
        }
        Ok(envelope.response.unwrap_or_default())
    }
}

/// Replace an implausible reported total with the number of documents
/// actually returned.
///
/// Zero or missing totals, totals above [`MAX_PLAUSIBLE_TOTAL`] and the
/// [`BOGUS_TOTAL`] sentinel are implausible.
pub fn sanitize_total(reported: Option<u64>, returned: usize) -> u64 {
    match reported {
        Some(n) if n != 0 && n != BOGUS_TOTAL && n <= MAX_PLAUSIBLE_TOTAL => n,
        _ => returned as u64,
    }
}

/// Total to show next to a result list.
pub fn display_total(total: u64, returned: usize) -> u64 {
    if total != 0 && total != BOGUS_TOTAL && total < DISPLAY_TOTAL_CAP {
        total
    } else {
        returned as u64
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct AdsResults {
    /// The `q` parameter that was sent.
    pub query: String,
    pub docs: Vec<AdsDoc>,
    /// Sanitized total, see [`sanitize_total`].
    pub total: u64,
    pub start: u32,
    pub rows: u32,
}

impl AdsResults {
    pub fn display_total(&self) -> u64 {
        display_total(self.total, self.docs.len())
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

// -----------------------------------------------------------------------
// Client
// -----------------------------------------------------------------------

/// Where ADS requests are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdsEndpoint {
    /// POST `{url, method: "GET"}` to the site's proxy at this URL.
    Proxy(String),
    /// GET the API directly; the transport must carry the token.
    Direct,
}

impl AdsEndpoint {
    /// The proxy mounted on the site at `site_base`.
    pub fn proxy_on(site_base: &str) -> Self {
        Self::Proxy(format!("{}{ADS_PROXY_PATH}", site_base.trim_end_matches('/')))
    }
}

/// ADS search client.
pub struct AdsClient {
    transport: Arc<dyn JsonTransport>,
    endpoint: AdsEndpoint,
    prefs: Preferences,
}

impl AdsClient {
    pub fn new(transport: Arc<dyn JsonTransport>, endpoint: AdsEndpoint, prefs: Preferences) -> Self {
        Self {
            transport,
            endpoint,
            prefs,
        }
    }

    pub fn sort_order(&self) -> SortOrder {
        self.prefs.sort_order()
    }

    pub fn set_sort_order(&self, order: SortOrder) -> Result<()> {
        self.prefs.set_sort_order(order)
    }

    /// Switch between citation and date ordering; returns the new order.
    pub fn toggle_sort_order(&self) -> Result<SortOrder> {
        let next = self.sort_order().toggled();
        self.set_sort_order(next)?;
        Ok(next)
    }

    /// Saved publication year filter.
    pub fn year_bounds(&self) -> YearBounds {
        self.prefs.year_bounds()
    }

    pub fn history(&self) -> Vec<SearchRecord> {
        self.prefs.search_history()
    }

    pub fn clear_history(&self) -> Result<()> {
        self.prefs.clear_search_history()
    }

    /// Run a search and record it in the history.
    pub async fn search(&self, query: &AdsQuery) -> Result<AdsResults> {
        let q = query.build();
        let sort = self.sort_order();
        let params = [
            ("q", q.clone()),
            ("fl", RESULT_FIELDS.to_string()),
            ("rows", query.rows.to_string()),
            ("start", query.start.to_string()),
            ("sort", sort.as_str().to_string()),
        ];

        let body = self.request(&params).await?;
        let total = sanitize_total(body.num_found, body.docs.len());
        log::info!(
            "ADS search '{q}' returned {} of {total} records",
            body.docs.len()
        );

        if let Err(e) = self
            .prefs
            .record_search(SearchRecord::now(q.clone(), total, sort))
        {
            log::warn!("Failed to save search history: {e}");
        }

        Ok(AdsResults {
            query: q,
            docs: body.docs,
            total,
            start: query.start,
            rows: query.rows,
        })
    }

    /// Fetch one article with keywords and affiliations.
    pub async fn article_details(&self, bibcode: &str) -> Result<Option<AdsDoc>> {
        let params = [
            ("q", format!("bibcode:{bibcode}")),
            ("fl", DETAIL_FIELDS.to_string()),
        ];
        let body = self.request(&params).await?;
        Ok(body.docs.into_iter().next())
    }

    async fn request(&self, params: &[(&str, String)]) -> Result<ResponseBody> {
        let url = reqwest::Url::parse_with_params(ADS_API_URL, params)
            .map_err(|e| GcError::Search(format!("invalid ADS URL: {e}")))?;

        let value = match &self.endpoint {
            AdsEndpoint::Proxy(proxy) => {
                let body = json!({ "url": url.as_str(), "method": "GET" });
                self.transport.post_json(proxy, &body).await?
            },
            AdsEndpoint::Direct => self.transport.get_json(url.as_str()).await?,
        };

        Envelope::parse(value)
    }
}
