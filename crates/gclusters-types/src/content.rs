//! Content generator contract.
//!
//! A generator maps a page and a language to an HTML fragment plus a
//! document title. Generators are local and side-effect free; returning
//! `Ok(None)` means "nothing for this page" and callers substitute their
//! own fallback.

use crate::error::Result;
use crate::lang::Lang;
use crate::page::PageId;

/// A generated page fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub title: String,
    pub content: String,
}

impl GeneratedPage {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Produces page fragments for the navigator.
pub trait ContentGenerator: Send + Sync {
    /// Generate the fragment for `page` in `lang`.
    fn generate(&self, page: PageId, lang: &Lang) -> Result<Option<GeneratedPage>>;
}
