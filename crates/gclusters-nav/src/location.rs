//! Location and link resolution.

use gclusters_types::page::{PageId, clean_html_path, page_from_path};

use crate::history::History;

/// Resolve the page for the current location.
///
/// A `/{name}.html` location is first rewritten in place to its
/// extensionless form, so the address bar always shows canonical URLs.
pub fn resolve_location(history: &dyn History) -> PageId {
    let mut path = history.location();
    if let Some(clean) = clean_html_path(&path) {
        log::debug!("Rewriting {path} to {clean}");
        history.replace(None, &clean);
        path = clean;
    }
    page_from_path(&path)
}

/// Page targeted by an in-app link, or `None` when the link should be left
/// to the browser (external, fragment-only or empty).
pub fn page_from_href(href: &str) -> Option<PageId> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with("http")
        || href.starts_with('#')
        || href.starts_with("//")
        || href.starts_with("mailto:")
    {
        return None;
    }
    if href.starts_with('/') {
        Some(page_from_path(href))
    } else {
        Some(page_from_path(&format!("/{href}")))
    }
}
