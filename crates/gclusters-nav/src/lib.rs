//! Page navigator for gclusters.
//!
//! The [`Navigator`] owns the mapping from URL or click intent to the
//! content shown in the document's single mount point. It caches rendered
//! fragments per (page, language), swaps them in with a fade transition,
//! replays their scripts, runs widget lifecycle hooks and keeps browser
//! history in step.
//!
//! The document, history and widget integrations are traits so the
//! navigator runs unchanged against a real page host or a test double.

pub mod cache;
pub mod config;
pub mod content;
pub mod dom;
pub mod history;
pub mod hooks;
pub mod location;
pub mod navigator;
pub mod scripts;

#[cfg(test)]
pub(crate) mod test_utils;

// -----------------------------------------------------------------------
// Public re-exports
// -----------------------------------------------------------------------

pub use cache::{CacheKey, PageCache};
pub use config::NavigatorConfig;
pub use content::PageContent;
pub use dom::{BackAffordance, Document, MountLayout};
pub use history::{History, HistoryState, SessionHistory};
pub use hooks::{
    HookRegistry, LocalizationRefresh, PageContext, PageHook, PersistHook, SkyViewerHook,
    ViewportPersister, WidgetFactory, WidgetInstance,
};
pub use location::{page_from_href, resolve_location};
pub use navigator::{NavigationOutcome, Navigator, NavigatorDeps};
pub use scripts::{ScriptBlock, extract_scripts};
