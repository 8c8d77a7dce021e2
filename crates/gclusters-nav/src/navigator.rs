//! The page navigator.
//!
//! One [`Navigator`] exists per document load. It is constructed from a
//! [`NavigatorDeps`] bundle and shared through an `Arc` between the click,
//! pop-state and language-change handlers.
//!
//! At most one load runs at a time. Every load holds the navigation lock for
//! its whole duration: [`Navigator::navigate_to`] drops requests that find it
//! taken, while pop-state and language reloads wait for it. The state
//! mutexes are never held across a suspension point.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gclusters_i18n::{ActiveLanguage, TextLookup};
use gclusters_types::content::ContentGenerator;
use gclusters_types::error::Result;
use gclusters_types::lang::Lang;
use gclusters_types::page::PageId;

use crate::cache::{CacheKey, PageCache};
use crate::config::NavigatorConfig;
use crate::content::{KeyEcho, PageContent, error_panel, fallback_content, loading_placeholder};
use crate::dom::{BackAffordance, Document, MountLayout};
use crate::history::{History, HistoryState};
use crate::hooks::{HookRegistry, LocalizationRefresh, PageContext, PersistHook, WidgetInstance};
use crate::location::{page_from_href, resolve_location};
use crate::scripts::extract_scripts;

// -----------------------------------------------------------------------
// Dependencies
// -----------------------------------------------------------------------

/// Collaborators a navigator is built from.
///
/// Only the document, the history and the active language are required;
/// every other collaborator degrades gracefully when absent.
pub struct NavigatorDeps {
    pub document: Arc<dyn Document>,
    pub history: Arc<dyn History>,
    pub language: Arc<ActiveLanguage>,
    pub generator: Option<Arc<dyn ContentGenerator>>,
    pub texts: Option<Arc<dyn TextLookup>>,
    pub hooks: HookRegistry,
    pub persist: Option<Box<dyn PersistHook>>,
    pub localization: Option<Box<dyn LocalizationRefresh>>,
    pub config: NavigatorConfig,
}

impl NavigatorDeps {
    pub fn new(
        document: Arc<dyn Document>,
        history: Arc<dyn History>,
        language: Arc<ActiveLanguage>,
    ) -> Self {
        Self {
            document,
            history,
            language,
            generator: None,
            texts: None,
            hooks: HookRegistry::new(),
            persist: None,
            localization: None,
            config: NavigatorConfig::default(),
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn ContentGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_texts(mut self, texts: Arc<dyn TextLookup>) -> Self {
        self.texts = Some(texts);
        self
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_persist_hook(mut self, hook: Box<dyn PersistHook>) -> Self {
        self.persist = Some(hook);
        self
    }

    pub fn with_localization(mut self, hook: Box<dyn LocalizationRefresh>) -> Self {
        self.localization = Some(hook);
        self
    }

    pub fn with_config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }
}

// -----------------------------------------------------------------------
// Navigator
// -----------------------------------------------------------------------

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The target page is now current and a history entry was pushed.
    Navigated,
    /// The target was already current; nothing happened.
    AlreadyCurrent,
    /// Another navigation was in flight; the request was dropped.
    Busy,
    /// Loading failed; the error panel is shown and state is unchanged.
    Failed,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Page navigator bound to one document.
pub struct Navigator {
    document: Arc<dyn Document>,
    history: Arc<dyn History>,
    language: Arc<ActiveLanguage>,
    generator: Option<Arc<dyn ContentGenerator>>,
    texts: Arc<dyn TextLookup>,
    hooks: HookRegistry,
    persist: Option<Box<dyn PersistHook>>,
    localization: Option<Box<dyn LocalizationRefresh>>,
    config: NavigatorConfig,

    current: Mutex<PageId>,
    cache: Mutex<PageCache>,
    /// Held by whichever load is rendering.
    navigation: tokio::sync::Mutex<()>,
    observed_lang: Mutex<Lang>,
    widget: Mutex<Option<Box<dyn WidgetInstance>>>,
}

impl Navigator {
    pub fn new(deps: NavigatorDeps) -> Self {
        let observed = deps.language.get();
        let texts = deps.texts.unwrap_or_else(|| Arc::new(KeyEcho));
        Self {
            document: deps.document,
            history: deps.history,
            language: deps.language,
            generator: deps.generator,
            texts,
            hooks: deps.hooks,
            persist: deps.persist,
            localization: deps.localization,
            config: deps.config,
            current: Mutex::new(PageId::Home),
            cache: Mutex::new(PageCache::new()),
            navigation: tokio::sync::Mutex::new(()),
            observed_lang: Mutex::new(observed),
            widget: Mutex::new(None),
        }
    }

    // -- Accessors ---------------------------------------------------------

    pub fn current_page(&self) -> PageId {
        *lock(&self.current)
    }

    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.navigation.try_lock().is_err()
    }

    pub fn is_cached(&self, page: PageId, lang: &Lang) -> bool {
        lock(&self.cache).contains(&CacheKey::new(page, lang.clone()))
    }

    pub fn cache_len(&self) -> usize {
        lock(&self.cache).len()
    }

    pub fn clear_cache(&self) {
        lock(&self.cache).clear();
    }

    pub fn has_widget(&self) -> bool {
        lock(&self.widget).is_some()
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    // -- Entry points ------------------------------------------------------

    /// Initial load for the current location.
    ///
    /// Canonicalizes the URL, shows a loading placeholder for non-home
    /// pages and renders the page without pushing history.
    pub async fn start(&self) -> Result<()> {
        let _loading = self.navigation.lock().await;
        let page = resolve_location(self.history.as_ref());
        *lock(&self.current) = page;
        *lock(&self.observed_lang) = self.language.get();
        log::info!("Navigator starting on '{page}'");

        if !page.is_home() && self.document.has_mount() {
            let lang = self.language.get();
            self.document
                .set_mount_html(&loading_placeholder(self.texts.as_ref(), &lang));
        }
        let expected = page.url_path();
        if self.history.location() != expected {
            self.history
                .replace(Some(HistoryState::new(page)), &expected);
        }

        self.load_or_show_error(page, false).await
    }

    /// Navigate to `target`, pushing a history entry on success.
    ///
    /// A language change that lands while the page loads is applied before
    /// the lock is released, so the page, URL and content always agree.
    pub async fn navigate_to(&self, target: PageId) -> NavigationOutcome {
        let Ok(_loading) = self.navigation.try_lock() else {
            log::debug!("Dropping navigation to '{target}': busy");
            return NavigationOutcome::Busy;
        };
        if target == self.current_page() {
            return NavigationOutcome::AlreadyCurrent;
        }

        if self.document.has_mount() {
            self.document
                .set_mount_opacity(self.config.loading_opacity);
        }

        match self.load_content(target, true).await {
            Ok(()) => {
                if let Err(e) = self.reload_on_language_change().await {
                    log::warn!("Language reload after navigating to '{target}' failed: {e}");
                }
                NavigationOutcome::Navigated
            },
            Err(e) => {
                log::error!("Navigation to '{target}' failed: {e}");
                self.show_error();
                NavigationOutcome::Failed
            },
        }
    }

    /// Handle a click on an in-app link.
    ///
    /// Returns `None` when the link is not intercepted and should be
    /// followed by the browser.
    pub async fn handle_link_click(&self, href: &str) -> Option<NavigationOutcome> {
        let page = page_from_href(href)?;
        Some(self.navigate_to(page).await)
    }

    /// Handle a click on the back affordance or the header title.
    pub async fn click_back(&self) -> NavigationOutcome {
        self.navigate_to(PageId::Home).await
    }

    /// Handle a browser back/forward event.
    ///
    /// Entries carrying a page are rendered without pushing history, after
    /// any in-flight navigation finishes; entries without state are
    /// ignored. Returns whether a page was loaded.
    pub async fn handle_pop_state(&self, state: Option<HistoryState>) -> Result<bool> {
        let Some(state) = state else {
            return Ok(false);
        };
        let _loading = self.navigation.lock().await;
        log::debug!("Pop state to '{}'", state.page);
        self.load_or_show_error(state.page, false).await?;
        Ok(true)
    }

    /// Check the active language once. On a change, drop every cached page
    /// and re-render the current one without touching history. Waits for
    /// any in-flight navigation first.
    ///
    /// Returns whether the language had changed.
    pub async fn sync_language(&self) -> Result<bool> {
        let _loading = self.navigation.lock().await;
        self.reload_on_language_change().await
    }

    /// Body of [`Self::sync_language`]; the caller holds the navigation lock.
    async fn reload_on_language_change(&self) -> Result<bool> {
        let lang = self.language.get();
        {
            let mut observed = lock(&self.observed_lang);
            if *observed == lang {
                return Ok(false);
            }
            *observed = lang.clone();
        }
        log::info!("Language changed to '{lang}', reloading");
        self.clear_cache();
        let page = self.current_page();
        self.load_or_show_error(page, false).await?;
        Ok(true)
    }

    /// Follow language changes until the publisher goes away.
    pub async fn watch_language(self: Arc<Self>) {
        let mut watcher = self.language.subscribe();
        if let Err(e) = self.sync_language().await {
            log::warn!("Language reload failed: {e}");
        }
        while watcher.changed().await.is_some() {
            if let Err(e) = self.sync_language().await {
                log::warn!("Language reload failed: {e}");
            }
        }
        log::debug!("Language watcher stopped");
    }

    // -- Loading -----------------------------------------------------------

    /// Load `page` for the active language and render it.
    ///
    /// On success `page` becomes current and, when `update_history` is
    /// set, a history entry is pushed.
    pub async fn load_content(&self, page: PageId, update_history: bool) -> Result<()> {
        let lang = self.language.get();
        let content = self.content_for(page, &lang)?;
        self.apply_content(&content).await;
        *lock(&self.current) = page;
        if update_history {
            self.history
                .push(HistoryState::new(page), &page.url_path());
        }
        Ok(())
    }

    async fn load_or_show_error(&self, page: PageId, update_history: bool) -> Result<()> {
        let result = self.load_content(page, update_history).await;
        if let Err(e) = &result {
            log::error!("Loading '{page}' failed: {e}");
            self.show_error();
        }
        result
    }

    /// Cached content for (page, lang), generating and storing it on a miss.
    fn content_for(&self, page: PageId, lang: &Lang) -> Result<Arc<PageContent>> {
        let key = CacheKey::new(page, lang.clone());
        if let Some(hit) = lock(&self.cache).get(&key) {
            log::debug!("Cache hit for '{page}' ({lang})");
            return Ok(hit);
        }

        let generated = match &self.generator {
            Some(generator) => generator.generate(page, lang)?,
            None => None,
        };
        let content = match generated {
            Some(generated) => PageContent::from_generated(page, generated),
            None => {
                log::warn!("No content for '{page}', using fallback");
                fallback_content(page, self.texts.as_ref(), lang)
            },
        };
        Ok(lock(&self.cache).insert(key, content))
    }

    // -- Rendering ---------------------------------------------------------

    /// Install `content` in the mount point.
    ///
    /// Order: persist widget state, tear the widget down, fade out, swap
    /// HTML, replay scripts, set title, update the back affordance,
    /// refresh localization, run page hooks, fade in.
    async fn apply_content(&self, content: &PageContent) {
        if !self.document.has_mount() {
            log::debug!("No mount point; skipping render of '{}'", content.page);
            return;
        }

        self.persist_widget();
        self.teardown_widget();

        self.document.set_mount_opacity(0.0);
        tokio::time::sleep(self.config.fade_out()).await;

        self.document.set_mount_html(&content.html);
        for script in extract_scripts(&content.html) {
            if let Err(e) = self.document.run_script(&script) {
                log::warn!("Script in '{}' failed: {e}", content.page);
            }
        }
        self.document.set_title(&content.title);
        self.update_back_affordance(content.page);

        let lang = self.language.get();
        if let Some(localization) = &self.localization
            && let Err(e) = localization.refresh(&lang)
        {
            log::warn!("Localization refresh failed: {e}");
        }
        self.run_page_hooks(content.page, &lang);

        tokio::time::sleep(self.config.fade_in()).await;
        self.document.set_mount_opacity(1.0);
    }

    fn persist_widget(&self) {
        let Some(persist) = &self.persist else {
            return;
        };
        let widget = lock(&self.widget);
        if let Err(e) = persist.persist(widget.as_deref()) {
            log::warn!("Saving widget state failed: {e}");
        }
    }

    fn teardown_widget(&self) {
        let taken = lock(&self.widget).take();
        if let Some(mut widget) = taken {
            log::debug!("Tearing down widget '{}'", widget.name());
            if let Err(e) = widget.teardown() {
                log::warn!("Teardown of '{}' failed: {e}", widget.name());
            }
        }
    }

    fn update_back_affordance(&self, page: PageId) {
        if page.is_home() {
            self.document.set_back_affordance(BackAffordance::Hidden);
            self.document.set_mount_layout(MountLayout::Centered);
        } else {
            self.document.set_back_affordance(BackAffordance::Visible);
            self.document.set_mount_layout(MountLayout::TopAligned);
        }
    }

    fn run_page_hooks(&self, page: PageId, lang: &Lang) {
        let mut slot = lock(&self.widget);
        let mut ctx = PageContext::new(page, lang, &mut *slot);
        let failures = self.hooks.run(&mut ctx);
        if failures > 0 {
            log::warn!("{failures} hook(s) failed on '{page}'");
        }
    }

    fn show_error(&self) {
        if !self.document.has_mount() {
            return;
        }
        let lang = self.language.get();
        let message = self.texts.text("spaPageLoadingError", &lang);
        self.document
            .set_mount_html(&error_panel(&message, self.texts.as_ref(), &lang));
        self.document.set_mount_opacity(1.0);
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
