//! Page identifiers and the URL path mapping.
//!
//! Canonical URLs carry no file extension: `home` lives at `/`, every
//! other page at `/{slug}`. Paths outside the allow-list resolve to
//! [`PageId::NotFound`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Logical page shown in the site's single mount point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageId {
    Home,
    Method,
    AladinBot,
    Articles,
    Projects,
    Contact,
    NotFound,
}

impl PageId {
    /// Every page, home first.
    pub const ALL: [PageId; 7] = [
        PageId::Home,
        PageId::Method,
        PageId::AladinBot,
        PageId::Articles,
        PageId::Projects,
        PageId::Contact,
        PageId::NotFound,
    ];

    /// Pages reachable by a clean URL other than `/`.
    pub const ROUTED: [PageId; 5] = [
        PageId::Method,
        PageId::AladinBot,
        PageId::Articles,
        PageId::Projects,
        PageId::Contact,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            PageId::Home => "home",
            PageId::Method => "method",
            PageId::AladinBot => "aladin-bot",
            PageId::Articles => "articles",
            PageId::Projects => "projects",
            PageId::Contact => "contact",
            PageId::NotFound => "not-found",
        }
    }

    /// Look up a page by slug. Only exact slugs match.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.slug() == slug)
    }

    /// Canonical URL path for this page.
    pub fn url_path(self) -> String {
        match self {
            PageId::Home => "/".to_string(),
            other => format!("/{}", other.slug()),
        }
    }

    pub fn is_home(self) -> bool {
        self == PageId::Home
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for PageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| format!("unknown page: {s}"))
    }
}

/// Map a location path to a page identifier.
///
/// `/`, `/index.html` and the empty path are `home`. A single leading
/// `/` and a trailing `.html` are stripped before the allow-list check;
/// anything else is [`PageId::NotFound`].
pub fn page_from_path(path: &str) -> PageId {
    if path.is_empty() || path == "/" || path == "/index.html" {
        return PageId::Home;
    }
    let slug = path.strip_prefix('/').unwrap_or(path);
    let slug = slug.strip_suffix(".html").unwrap_or(slug);
    PageId::ROUTED
        .into_iter()
        .find(|p| p.slug() == slug)
        .unwrap_or(PageId::NotFound)
}

/// Extensionless form of a `/{name}.html` path.
///
/// Returns `None` when the path has no single-segment `.html` form.
/// `/index.html` maps to `/`.
pub fn clean_html_path(path: &str) -> Option<String> {
    let stem = path.strip_prefix('/')?.strip_suffix(".html")?;
    if stem.is_empty() || !stem.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return None;
    }
    if stem == "index" {
        return Some("/".to_string());
    }
    Some(format!("/{stem}"))
}
