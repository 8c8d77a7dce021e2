//! Literature and catalog search for gclusters.
//!
//! Two search surfaces share this crate:
//!
//! - the **ADS search** on the articles page: structured queries against
//!   the NASA Astrophysics Data System, result formatting, exports and
//!   statistics, with history and sort order persisted through
//!   [`gclusters_store::Preferences`];
//! - the **unified search box**: synonym normalization, coordinate parsing
//!   and a sequential fan-out to the backend's SIMBAD, VizieR, ADS and arXiv
//!   endpoints, followed by polling for a generated summary.
//!
//! All network access goes through the [`JsonTransport`] trait. The
//! [`hooks`] module registers both surfaces with the page navigator.

pub mod ads;
pub mod article;
pub mod coords;
pub mod fanout;
pub mod hooks;
pub mod query;
pub mod summary;
pub mod synonyms;
pub mod transport;
pub mod unified;

#[cfg(test)]
pub(crate) mod test_utils;

// -----------------------------------------------------------------------
// Public re-exports
// -----------------------------------------------------------------------

pub use ads::{AdsClient, AdsDoc, AdsEndpoint, AdsResults, display_total, sanitize_total};
pub use article::{Article, ArticleFormatter, ExportFormat, SearchStats};
pub use coords::{SearchInput, parse_input};
pub use fanout::{CatalogSource, FanOut, FanOutReport, SourceOutcome, SourceStatus};
pub use hooks::{
    ADS_FORM, AdsSearchHook, CHAT_FORM, FormBinding, SearchSetup, SearchSurface, SearchView,
    UNIFIED_FORM, UnifiedSearchHook, register_search_hooks,
};
pub use query::AdsQuery;
pub use summary::{SummaryOutcome, SummaryPoller, SummaryStatus};
pub use synonyms::normalize_query;
pub use transport::{HttpTransport, JsonTransport};
pub use unified::{PreparedSearch, UnifiedOutcome, UnifiedSearch};
