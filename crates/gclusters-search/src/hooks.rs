//! Page hooks that bring the search forms to life.
//!
//! The navigator installs the articles and aladin-bot pages as plain markup.
//! After each render these hooks hand the page host a [`SearchSetup`]: the
//! element ids to bind, the active language, and the search engine together
//! with its persisted state.

use std::sync::Arc;

use gclusters_nav::{HookRegistry, PageContext, PageHook};
use gclusters_store::{SearchRecord, SortOrder, YearBounds};
use gclusters_types::error::Result;
use gclusters_types::lang::Lang;
use gclusters_types::page::PageId;

use crate::ads::AdsClient;
use crate::unified::UnifiedSearch;

// -----------------------------------------------------------------------
// Bindings
// -----------------------------------------------------------------------

/// Element ids a search form is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormBinding {
    pub input: &'static str,
    pub button: &'static str,
    pub results: &'static str,
}

/// The ADS form on the articles page.
pub const ADS_FORM: FormBinding = FormBinding {
    input: "ads-query",
    button: "ads-search-button",
    results: "ads-results",
};

/// The search box on the aladin-bot page. Results are posted to the chat log.
pub const UNIFIED_FORM: FormBinding = FormBinding {
    input: "universal-search",
    button: "search-button",
    results: "chat-messages",
};

/// The chat input on the aladin-bot page.
pub const CHAT_FORM: FormBinding = FormBinding {
    input: "chat-input",
    button: "chat-send",
    results: "chat-messages",
};

// -----------------------------------------------------------------------
// Setup handed to the page host
// -----------------------------------------------------------------------

/// The engine behind a form and the state it starts from.
pub enum SearchSurface {
    Ads {
        client: Arc<AdsClient>,
        sort_order: SortOrder,
        year_bounds: YearBounds,
        history: Vec<SearchRecord>,
    },
    Unified {
        search: Arc<UnifiedSearch>,
        chat: FormBinding,
    },
}

/// Everything needed to make a rendered search form live.
pub struct SearchSetup {
    pub page: PageId,
    pub lang: Lang,
    pub form: FormBinding,
    pub surface: SearchSurface,
}

/// The page host's side of a search form.
pub trait SearchView: Send + Sync {
    /// Bind `setup.form` on the current page to `setup.surface`.
    fn attach(&self, setup: SearchSetup) -> Result<()>;
}

// -----------------------------------------------------------------------
// Hooks
// -----------------------------------------------------------------------

/// Attaches the ADS search form, restoring sort order, year filter and
/// history from preferences.
pub struct AdsSearchHook {
    client: Arc<AdsClient>,
    view: Arc<dyn SearchView>,
}

impl AdsSearchHook {
    pub fn new(client: Arc<AdsClient>, view: Arc<dyn SearchView>) -> Self {
        Self { client, view }
    }
}

impl PageHook for AdsSearchHook {
    fn name(&self) -> &str {
        "ads-search"
    }

    fn on_page_ready(&self, ctx: &mut PageContext<'_>) -> Result<()> {
        let history = self.client.history();
        log::debug!(
            "Attaching ADS search on '{}' ({} saved searches)",
            ctx.page,
            history.len()
        );
        self.view.attach(SearchSetup {
            page: ctx.page,
            lang: ctx.lang.clone(),
            form: ADS_FORM,
            surface: SearchSurface::Ads {
                client: Arc::clone(&self.client),
                sort_order: self.client.sort_order(),
                year_bounds: self.client.year_bounds(),
                history,
            },
        })
    }
}

/// Attaches the unified search box and the chat input.
pub struct UnifiedSearchHook {
    search: Arc<UnifiedSearch>,
    view: Arc<dyn SearchView>,
}

impl UnifiedSearchHook {
    pub fn new(search: Arc<UnifiedSearch>, view: Arc<dyn SearchView>) -> Self {
        Self { search, view }
    }
}

impl PageHook for UnifiedSearchHook {
    fn name(&self) -> &str {
        "unified-search"
    }

    fn on_page_ready(&self, ctx: &mut PageContext<'_>) -> Result<()> {
        log::debug!("Attaching unified search on '{}'", ctx.page);
        self.view.attach(SearchSetup {
            page: ctx.page,
            lang: ctx.lang.clone(),
            form: UNIFIED_FORM,
            surface: SearchSurface::Unified {
                search: Arc::clone(&self.search),
                chat: CHAT_FORM,
            },
        })
    }
}

/// Register the ADS hook on `articles` and the unified search hook on
/// `aladin-bot`.
pub fn register_search_hooks(
    hooks: &mut HookRegistry,
    client: Arc<AdsClient>,
    search: Arc<UnifiedSearch>,
    view: Arc<dyn SearchView>,
) {
    hooks.register_page_hook(
        PageId::Articles,
        Box::new(AdsSearchHook::new(client, Arc::clone(&view))),
    );
    hooks.register_page_hook(
        PageId::AladinBot,
        Box::new(UnifiedSearchHook::new(search, view)),
    );
}
