//! Widget lifecycle hooks.
//!
//! Pages can host a stateful third-party widget (the sky viewer). The
//! navigator owns the single widget slot and drives it through these
//! extension points:
//!
//! - **[`PersistHook`]** -- saves widget state before the page is swapped.
//! - **[`WidgetInstance`]** -- the live widget; torn down before the swap.
//! - **[`LocalizationRefresh`]** -- re-applies localized text after the swap.
//! - **[`PageHook`]** -- per-page initializers and generic post-render hooks,
//!   collected in a [`HookRegistry`].
//!
//! Hook failures are logged and never abort a navigation.

use gclusters_store::{Preferences, ViewportState};
use gclusters_types::error::Result;
use gclusters_types::lang::Lang;
use gclusters_types::page::PageId;

// -----------------------------------------------------------------------
// Widget instance
// -----------------------------------------------------------------------

/// A live widget registered by a page hook.
pub trait WidgetInstance: Send {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Current viewport, for persistence across page swaps.
    fn viewport(&self) -> Result<ViewportState>;

    /// Release the widget's resources. Called at most once.
    fn teardown(&mut self) -> Result<()>;
}

/// Builds a widget, optionally restoring a saved viewport.
pub type WidgetFactory =
    Box<dyn Fn(Option<ViewportState>) -> Result<Box<dyn WidgetInstance>> + Send + Sync>;

// -----------------------------------------------------------------------
// Persist / localization hooks
// -----------------------------------------------------------------------

/// Saves widget state before the mount point is replaced.
pub trait PersistHook: Send + Sync {
    fn persist(&self, widget: Option<&dyn WidgetInstance>) -> Result<()>;
}

/// Persists the registered widget's viewport to the preference store.
pub struct ViewportPersister {
    prefs: Preferences,
}

impl ViewportPersister {
    pub fn new(prefs: Preferences) -> Self {
        Self { prefs }
    }
}

impl PersistHook for ViewportPersister {
    fn persist(&self, widget: Option<&dyn WidgetInstance>) -> Result<()> {
        let Some(widget) = widget else {
            return Ok(());
        };
        let state = widget.viewport()?;
        self.prefs.save_viewport(&state)
    }
}

/// Re-applies localized strings to the freshly installed content.
pub trait LocalizationRefresh: Send + Sync {
    fn refresh(&self, lang: &Lang) -> Result<()>;
}

// -----------------------------------------------------------------------
// Page hooks
// -----------------------------------------------------------------------

/// Context handed to page hooks after content is installed.
pub struct PageContext<'a> {
    pub page: PageId,
    pub lang: &'a Lang,
    widget: &'a mut Option<Box<dyn WidgetInstance>>,
}

impl<'a> PageContext<'a> {
    pub fn new(
        page: PageId,
        lang: &'a Lang,
        widget: &'a mut Option<Box<dyn WidgetInstance>>,
    ) -> Self {
        Self { page, lang, widget }
    }

    /// Register the page's widget with the navigator. A widget registered
    /// earlier in the same render is torn down first.
    pub fn register_widget(&mut self, widget: Box<dyn WidgetInstance>) {
        if let Some(mut previous) = self.widget.take() {
            log::warn!(
                "Widget '{}' replaced by '{}'",
                previous.name(),
                widget.name()
            );
            if let Err(e) = previous.teardown() {
                log::warn!("Teardown of '{}' failed: {e}", previous.name());
            }
        }
        log::debug!("Registered widget '{}'", widget.name());
        *self.widget = Some(widget);
    }

    pub fn has_widget(&self) -> bool {
        self.widget.is_some()
    }
}

/// Initializer run after a page's content is installed.
pub trait PageHook: Send + Sync {
    /// A unique human-readable name for this hook (used for logging).
    fn name(&self) -> &str;

    fn on_page_ready(&self, ctx: &mut PageContext<'_>) -> Result<()>;
}

/// Creates the sky viewer on pages that host it, restoring the last saved
/// viewport when it is still fresh.
pub struct SkyViewerHook {
    prefs: Preferences,
    factory: WidgetFactory,
}

impl SkyViewerHook {
    pub fn new(prefs: Preferences, factory: WidgetFactory) -> Self {
        Self { prefs, factory }
    }
}

impl PageHook for SkyViewerHook {
    fn name(&self) -> &str {
        "sky-viewer"
    }

    fn on_page_ready(&self, ctx: &mut PageContext<'_>) -> Result<()> {
        let saved = self.prefs.restore_viewport();
        if saved.is_some() {
            log::debug!("Restoring saved viewport");
        }
        let widget = (self.factory)(saved)?;
        ctx.register_widget(widget);
        Ok(())
    }
}

// -----------------------------------------------------------------------
// HookRegistry
// -----------------------------------------------------------------------

/// Per-page initializers plus hooks run after every render.
#[derive(Default)]
pub struct HookRegistry {
    page_hooks: Vec<(PageId, Box<dyn PageHook>)>,
    post_render: Vec<Box<dyn PageHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook run whenever `page` is rendered.
    ///
    /// Hooks for the same page run in registration order.
    pub fn register_page_hook(&mut self, page: PageId, hook: Box<dyn PageHook>) {
        self.page_hooks.push((page, hook));
    }

    /// Register a hook run after every render, after the page hooks.
    pub fn register_post_render(&mut self, hook: Box<dyn PageHook>) {
        self.post_render.push(hook);
    }

    pub fn page_hook_count(&self, page: PageId) -> usize {
        self.page_hooks.iter().filter(|(p, _)| *p == page).count()
    }

    /// Run the hooks for `ctx.page`, then the post-render hooks.
    ///
    /// Each hook is guarded on its own; returns the number that failed.
    pub fn run(&self, ctx: &mut PageContext<'_>) -> usize {
        let page = ctx.page;
        let hooks = self
            .page_hooks
            .iter()
            .filter(|(p, _)| *p == page)
            .map(|(_, h)| h)
            .chain(self.post_render.iter());

        let mut failures = 0;
        for hook in hooks {
            if let Err(e) = hook.on_page_ready(ctx) {
                log::warn!("Hook '{}' failed on '{page}': {e}", hook.name());
                failures += 1;
            }
        }
        failures
    }
}
