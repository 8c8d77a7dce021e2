//! Site page fragments.

use std::sync::Arc;

use gclusters_i18n::TextLookup;
use gclusters_types::content::{ContentGenerator, GeneratedPage};
use gclusters_types::error::Result;
use gclusters_types::html::push_escaped;
use gclusters_types::lang::Lang;
use gclusters_types::page::PageId;

/// Sky viewer script loaded by the `aladin-bot` page.
pub const ALADIN_SCRIPT_URL: &str = "https://aladin.cds.unistra.fr/AladinLite/api/v3/latest/aladin.js";

/// Pages advertised as navigation cards, with their title and description keys.
const PAGE_CARDS: [(PageId, &str, &str); 5] = [
    (PageId::Method, "method", "methodDescription"),
    (PageId::AladinBot, "aladinBot", "aladinDescription"),
    (PageId::Articles, "articlesFullTitle", "articlesDescription"),
    (PageId::Projects, "projectsFullTitle", "projectsDescription"),
    (PageId::Contact, "contactUs", "contactDescription"),
];

/// Text key of a page's document title.
pub fn title_key(page: PageId) -> &'static str {
    match page {
        PageId::Home => "homePageTitle",
        PageId::Method => "methodPageTitle",
        PageId::AladinBot => "aladinPageTitle",
        PageId::Articles => "articlesPageTitle",
        PageId::Projects => "projectsPageTitle",
        PageId::Contact => "contactPageTitle",
        PageId::NotFound => "notFoundPageTitle",
    }
}

/// Content generator for every site page.
pub struct SitePages {
    texts: Arc<dyn TextLookup>,
    script_base: String,
}

impl SitePages {
    pub fn new(texts: Arc<dyn TextLookup>) -> Self {
        Self {
            texts,
            script_base: "/js".to_string(),
        }
    }

    /// Base URL of the site's own page scripts (default `/js`).
    pub fn with_script_base(mut self, base: impl Into<String>) -> Self {
        self.script_base = base.into().trim_end_matches('/').to_string();
        self
    }

    fn render(&self, page: PageId, lang: &Lang) -> GeneratedPage {
        let mut w = Writer {
            texts: self.texts.as_ref(),
            lang,
            scripts: &self.script_base,
            html: String::with_capacity(2048),
        };
        match page {
            PageId::Home => w.home(),
            PageId::Method => w.method(),
            PageId::AladinBot => w.aladin_bot(),
            PageId::Articles => w.articles(),
            PageId::Projects => w.projects(),
            PageId::Contact => w.contact(),
            PageId::NotFound => w.not_found(),
        }
        let title = self.texts.text(title_key(page), lang);
        GeneratedPage::new(title, w.html)
    }
}

impl ContentGenerator for SitePages {
    fn generate(&self, page: PageId, lang: &Lang) -> Result<Option<GeneratedPage>> {
        log::debug!("Generating '{page}' in '{lang}'");
        Ok(Some(self.render(page, lang)))
    }
}

// ---------------------------------------------------------------------------
// Fragment writer
// ---------------------------------------------------------------------------

struct Writer<'a> {
    texts: &'a dyn TextLookup,
    lang: &'a Lang,
    scripts: &'a str,
    html: String,
}

impl Writer<'_> {
    fn raw(&mut self, s: &str) {
        self.html.push_str(s);
    }

    /// Escaped localized text.
    fn text(&mut self, key: &str) {
        let value = self.texts.text(key, self.lang);
        push_escaped(&mut self.html, &value);
    }

    /// `<tag class="...">text</tag>`
    fn element(&mut self, tag: &str, class: &str, key: &str) {
        if class.is_empty() {
            self.raw(&format!("<{tag}>"));
        } else {
            self.raw(&format!("<{tag} class=\"{class}\">"));
        }
        self.text(key);
        self.raw(&format!("</{tag}>\n"));
    }

    fn script(&mut self, name: &str) {
        let src = format!("{}/{name}", self.scripts);
        self.raw("<script src=\"");
        push_escaped(&mut self.html, &src);
        self.raw("\" charset=\"utf-8\"></script>\n");
    }

    fn page_cards(&mut self, class: &str) {
        self.raw(&format!("<nav class=\"{class}\">\n"));
        for (page, title, description) in PAGE_CARDS {
            self.raw(&format!("<a href=\"{}\" class=\"page-card\">", page.url_path()));
            self.element("div", "page-card-title", title);
            self.element("div", "page-card-description", description);
            self.raw("</a>\n");
        }
        self.raw("</nav>\n");
    }

    fn input(&mut self, id: &str, kind: &str, placeholder_key: &str) {
        self.raw(&format!("<input id=\"{id}\" type=\"{kind}\" placeholder=\""));
        self.text(placeholder_key);
        self.raw("\">\n");
    }

    // -- Pages -------------------------------------------------------------

    fn home(&mut self) {
        self.raw("<section class=\"home\">\n");
        self.element("h2", "page-heading", "homeMainQuestion");
        self.element("p", "lead", "homeMainDescription");
        self.page_cards("page-cards");
        self.raw("</section>\n");
    }

    fn method(&mut self) {
        self.raw("<section class=\"method\">\n");
        self.element("h2", "page-heading", "methodMainTitle");
        self.element("h3", "section-heading", "chatBotTitle");
        self.element("p", "", "chatBotDescription");
        self.element("h3", "section-heading", "inputFormats");
        self.raw("<ul class=\"input-formats\">\n");
        for key in ["inputObjectNames", "inputCoordinatesDeg", "inputCoordinatesHMS"] {
            self.element("li", "", key);
        }
        self.raw("</ul>\n");
        self.element("h3", "section-heading", "dataSources");
        self.raw("<dl class=\"data-sources\">\n");
        for (name, key) in [
            ("SIMBAD", "simbadDescription"),
            ("VizieR", "vizierDescription"),
            ("NASA ADS", "adsDescription"),
            ("arXiv", "arxivDescription"),
        ] {
            self.raw(&format!("<dt>{name}</dt><dd>"));
            self.text(key);
            self.raw("</dd>\n");
        }
        self.raw("</dl>\n</section>\n");
    }

    fn aladin_bot(&mut self) {
        self.raw("<div class=\"warning-banner\"><p>");
        self.text("chatBotWarning");
        self.raw("</p></div>\n<section class=\"aladin-bot\">\n<div class=\"sky-panel\">\n");
        self.element("h3", "section-heading", "skyAtlas");
        self.element("p", "", "skyAtlasDescription");
        self.raw("<div id=\"aladin-lite-div\" class=\"sky-viewer\"></div>\n</div>\n");

        self.raw("<div class=\"chat-panel\">\n<div class=\"chat-header\">\n");
        self.element("h3", "chat-title", "astronomicalSearchBot");
        self.element("p", "chat-subtitle", "astronomicalSearchBotSubtitle");
        self.raw("</div>\n<div id=\"chat-messages\" class=\"chat-messages\">\n");
        self.raw("<div class=\"message bot\"><p>");
        self.text("welcomeMessage");
        self.raw("</p></div>\n</div>\n<div class=\"chat-input\">\n");
        self.input("chat-input", "text", "searchPlaceholder");
        self.raw("<button id=\"chat-send\">");
        self.text("send");
        self.raw("</button>\n</div>\n</div>\n");

        self.raw("<div class=\"unified-search\">\n");
        self.input("universal-search", "text", "unifiedSearchPlaceholder");
        self.raw("<button id=\"search-button\">");
        self.text("search");
        self.raw("</button>\n</div>\n</section>\n");

        self.raw(&format!(
            "<script src=\"{ALADIN_SCRIPT_URL}\" charset=\"utf-8\"></script>\n"
        ));
        self.script("unified-search.js");
        self.script("chat-bot.js");
    }

    fn articles(&mut self) {
        self.raw("<section class=\"articles\">\n");
        self.element("h2", "page-heading", "researchArticles");
        self.raw("<form id=\"ads-search-form\" class=\"ads-form\">\n");
        for (id, key) in [
            ("ads-query", "adsQuery"),
            ("ads-author", "adsAuthor"),
            ("ads-object", "adsObject"),
        ] {
            self.raw(&format!("<label for=\"{id}\">"));
            self.text(key);
            self.raw("</label>\n");
            self.input(id, "text", key);
        }
        for (id, key) in [("ads-year-min", "adsYearFrom"), ("ads-year-max", "adsYearTo")] {
            self.raw(&format!("<label for=\"{id}\">"));
            self.text(key);
            self.raw("</label>\n");
            self.input(id, "number", key);
        }
        self.raw("<label for=\"ads-sort\">");
        self.text("adsSortBy");
        self.raw("</label>\n<select id=\"ads-sort\">\n");
        for (value, key) in [
            ("citation_count desc", "adsByCitations"),
            ("date desc", "adsByDate"),
        ] {
            self.raw(&format!("<option value=\"{value}\">"));
            self.text(key);
            self.raw("</option>\n");
        }
        self.raw("</select>\n<button id=\"ads-search-button\" type=\"submit\">");
        self.text("adsSearchButton");
        self.raw("</button>\n</form>\n<div id=\"ads-results\" class=\"ads-results\">\n");
        self.element("p", "placeholder", "adsEnterSearchTerms");
        self.raw("</div>\n</section>\n");
        self.script("ads-search.js");
    }

    fn projects(&mut self) {
        self.raw("<section class=\"projects\">\n");
        self.element("h2", "page-heading", "teamProjects");
        self.raw("<div class=\"project-card\">\n");
        self.element("h3", "section-heading", "galaxyHackersTitle");
        self.element("p", "", "galaxyHackersDescription");
        self.raw("</div>\n");
        self.element("h3", "section-heading", "catalogDescriptions");
        self.raw("<ul class=\"catalogs\">\n");
        for catalog in ["Abell", "ACT", "Planck SZ", "ROSAT", "SPT"] {
            self.raw(&format!("<li>{catalog}</li>\n"));
        }
        self.raw("</ul>\n</section>\n");
    }

    fn contact(&mut self) {
        self.raw("<section class=\"contact\">\n");
        self.element("h2", "page-heading", "contactHeading");
        self.element("p", "lead", "contactIntro");
        self.raw("<form id=\"contact-form\" class=\"contact-form\">\n");
        self.input("contact-name", "text", "contactName");
        self.input("contact-email", "email", "contactEmail");
        self.raw("<textarea id=\"contact-message\" placeholder=\"");
        self.text("contactMessage");
        self.raw("\"></textarea>\n<button type=\"submit\">");
        self.text("contactSend");
        self.raw("</button>\n</form>\n</section>\n");
        self.raw(
            "<script>\ndocument.getElementById('contact-form')?.addEventListener('submit', \
             (e) => { e.preventDefault(); e.target.reset(); });\n</script>\n",
        );
    }

    fn not_found(&mut self) {
        self.raw("<section class=\"not-found\">\n<div class=\"error-code\">404</div>\n");
        self.element("h2", "page-heading", "notFoundHeading");
        self.element("p", "", "notFoundMessage");
        self.element("p", "muted", "notFoundDescription");
        self.raw("<a href=\"/\" class=\"button\">");
        self.text("backToHome");
        self.raw("</a>\n");
        self.element("h3", "section-heading", "explorePages");
        self.page_cards("page-cards compact");
        self.raw("</section>\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gclusters_i18n::SiteTexts;

    fn pages() -> SitePages {
        SitePages::new(Arc::new(SiteTexts::builtin().unwrap()))
    }

    fn generate(page: PageId) -> GeneratedPage {
        pages().generate(page, &Lang::en()).unwrap().unwrap()
    }

    #[test]
    fn every_page_generates() {
        for page in PageId::ALL {
            let generated = generate(page);
            assert!(!generated.title.is_empty(), "{page} has no title");
            assert!(!generated.content.is_empty(), "{page} has no content");
        }
    }

    #[test]
    fn titles_come_from_catalog() {
        assert_eq!(generate(PageId::Home).title, "Galaxy Clusters | Intro");
        assert_eq!(generate(PageId::NotFound).title, "Galaxy Clusters | Page Not Found");
    }

    #[test]
    fn home_links_every_routed_page() {
        let home = generate(PageId::Home);
        for page in PageId::ROUTED {
            assert!(home.content.contains(&format!("href=\"{}\"", page.url_path())));
        }
    }

    #[test]
    fn not_found_links_home_and_pages() {
        let page = generate(PageId::NotFound);
        assert!(page.content.contains("404"));
        assert!(page.content.contains("href=\"/\""));
        assert!(page.content.contains("href=\"/aladin-bot\""));
    }

    #[test]
    fn aladin_page_has_viewer_mount_and_scripts() {
        let page = generate(PageId::AladinBot);
        assert!(page.content.contains("id=\"aladin-lite-div\""));
        assert!(page.content.contains("id=\"chat-input\""));
        assert!(page.content.contains(ALADIN_SCRIPT_URL));
        assert!(page.content.contains("src=\"/js/chat-bot.js\""));
    }

    #[test]
    fn articles_page_has_search_form() {
        let page = generate(PageId::Articles);
        for id in ["ads-query", "ads-author", "ads-year-min", "ads-year-max", "ads-object"] {
            assert!(page.content.contains(&format!("id=\"{id}\"")), "missing {id}");
        }
        assert!(page.content.contains("value=\"citation_count desc\""));
    }

    #[test]
    fn script_base_is_configurable() {
        let pages = pages().with_script_base("/static/js/");
        let page = pages.generate(PageId::Articles, &Lang::en()).unwrap().unwrap();
        assert!(page.content.contains("src=\"/static/js/ads-search.js\""));
    }

    #[test]
    fn interpolated_text_is_escaped() {
        let mut texts = SiteTexts::builtin().unwrap();
        texts
            .add_catalog("xx", "homeMainQuestion = \"<b>bold</b>\"")
            .unwrap();
        let pages = SitePages::new(Arc::new(texts));
        let page = pages.generate(PageId::Home, &Lang::new("xx")).unwrap().unwrap();
        assert!(page.content.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!page.content.contains("<b>bold</b>"));
    }

    #[test]
    fn other_language_uses_overlay() {
        let mut texts = SiteTexts::builtin().unwrap();
        texts
            .add_catalog("ru", "homePageTitle = \"Скопления галактик\"")
            .unwrap();
        let pages = SitePages::new(Arc::new(texts));
        let page = pages.generate(PageId::Home, &Lang::new("ru")).unwrap().unwrap();
        assert_eq!(page.title, "Скопления галактик");
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        /// Answers every key with the same text.
        struct Fixed(String);

        impl TextLookup for Fixed {
            fn text(&self, _key: &str, _lang: &Lang) -> String {
                self.0.clone()
            }
        }

        proptest! {
            #[test]
            fn catalog_text_never_injects_markup(text in "[a-z ]{0,8}<script>[a-z ]{0,8}") {
                let pages = SitePages::new(Arc::new(Fixed(text)));
                for page in PageId::ALL {
                    let generated = pages.generate(page, &Lang::en()).unwrap().unwrap();
                    prop_assert!(!generated.content.contains("<script>"));
                }
            }
        }
    }
}
