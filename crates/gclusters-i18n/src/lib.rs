//! Localization for gclusters.
//!
//! [`SiteTexts`] is the text catalog behind the [`TextLookup`] contract:
//! lookups never fail, unknown languages fall back to English and unknown
//! keys come back verbatim. [`ActiveLanguage`] holds the language the
//! site currently renders in and notifies subscribers when it changes.

pub mod active;
pub mod texts;

pub use active::{ActiveLanguage, LanguageWatcher};
pub use texts::{SiteTexts, TextLookup};
