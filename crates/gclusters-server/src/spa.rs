//! Request classification for the single-page site.
//!
//! Clean page URLs are answered with `index.html` so the client-side
//! navigator can render them; legacy `.html` page URLs are redirected to
//! their clean form; assets are served from the site root.

use gclusters_types::page::PageId;

const STATIC_PREFIXES: [&str; 5] = ["/static/", "/js/", "/css/", "/images/", "/fonts/"];

const STATIC_EXTENSIONS: [&str; 14] = [
    ".js", ".css", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".woff", ".woff2", ".ttf",
    ".eot", ".json", ".xml",
];

/// How a `GET` for a path is answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Serve `index.html`.
    SpaPage,
    /// `301` to the clean URL.
    Redirect(String),
    /// Serve the file at this path under the site root.
    Static,
}

/// Whether `path` is one of the clean page routes.
pub fn is_spa_route(path: &str) -> bool {
    PageId::ROUTED.iter().any(|p| p.url_path() == path)
}

/// Whether `path` looks like an asset rather than a page.
pub fn is_static_file(path: &str) -> bool {
    STATIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
        || STATIC_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

pub fn classify(path: &str) -> RouteDecision {
    if is_spa_route(path) {
        return RouteDecision::SpaPage;
    }

    if path != "/index.html"
        && let Some(clean) = path.strip_suffix(".html")
        && is_spa_route(clean)
    {
        return RouteDecision::Redirect(clean.to_string());
    }

    if !is_static_file(path) && path != "/" && path != "/index.html" {
        return RouteDecision::SpaPage;
    }

    RouteDecision::Static
}
