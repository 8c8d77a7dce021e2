//! Rendered page content and the navigator's own fragments.
//!
//! Besides generator output, the navigator renders three fragments itself:
//! the fallback shown when no generator produced a page, the error panel
//! shown when a navigation fails, and the placeholder shown during the
//! initial load of a non-home page.

use gclusters_i18n::TextLookup;
use gclusters_types::content::GeneratedPage;
use gclusters_types::html::escape_html;
use gclusters_types::lang::Lang;
use gclusters_types::page::PageId;

/// A page fragment ready to be installed in the mount point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub page: PageId,
    pub html: String,
    pub title: String,
}

impl PageContent {
    pub fn new(page: PageId, html: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            page,
            html: html.into(),
            title: title.into(),
        }
    }

    pub fn from_generated(page: PageId, generated: GeneratedPage) -> Self {
        Self {
            page,
            html: generated.content,
            title: generated.title,
        }
    }
}

/// Lookup used when no localization table is wired in: every key
/// resolves to itself.
pub(crate) struct KeyEcho;

impl TextLookup for KeyEcho {
    fn text(&self, key: &str, _lang: &Lang) -> String {
        key.to_string()
    }
}

/// Display name of a page: its slug with the first letter capitalized.
fn display_name(page: PageId) -> String {
    let slug = page.slug();
    let mut chars = slug.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Content synthesized when the generator has nothing for `page`.
///
/// Home gets its intro text; every other page gets a heading and a link
/// back to `/`.
pub fn fallback_content(page: PageId, texts: &dyn TextLookup, lang: &Lang) -> PageContent {
    let t = |key: &str| escape_html(&texts.text(key, lang));
    if page.is_home() {
        let html = format!(
            "<section class=\"home\">\n<h2>{}</h2>\n<p>{}</p>\n<p class=\"muted\">{}</p>\n</section>\n",
            t("homeMainQuestion"),
            t("homeMainDescription"),
            t("spaLoadingNavigation"),
        );
        return PageContent::new(page, html, texts.text("homePageTitle", lang));
    }
    let name = display_name(page);
    let html = format!(
        "<div class=\"fallback\">\n<h2>{}</h2>\n<p>{}</p>\n<a href=\"/\" class=\"button\">{}</a>\n</div>\n",
        escape_html(&name),
        t("spaPageLoading"),
        t("spaReturnHome"),
    );
    let title = format!("{} | {name}", texts.text("siteTitle", lang));
    PageContent::new(page, html, title)
}

/// Error panel with a close control, a reload button and a link home.
pub fn error_panel(message: &str, texts: &dyn TextLookup, lang: &Lang) -> String {
    let t = |key: &str| escape_html(&texts.text(key, lang));
    format!(
        "<div class=\"error-panel\" role=\"alert\">\n\
         <button class=\"error-dismiss\" aria-label=\"{dismiss}\" \
         onclick=\"this.parentElement.remove()\">&times;</button>\n\
         <h2>{title}</h2>\n<p>{message}</p>\n\
         <button onclick=\"location.reload()\">{reload}</button>\n\
         <a href=\"/\" class=\"button\">{home}</a>\n</div>\n",
        dismiss = t("spaDismiss"),
        title = t("spaErrorTitle"),
        message = escape_html(message),
        reload = t("spaReloadPage"),
        home = t("spaReturnHome"),
    )
}

/// Placeholder shown while the first page loads.
pub fn loading_placeholder(texts: &dyn TextLookup, lang: &Lang) -> String {
    format!(
        "<div class=\"loading\">{}</div>\n",
        escape_html(&texts.text("spaLoadingGeneric", lang))
    )
}
