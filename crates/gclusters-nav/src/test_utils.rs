//! Shared test utilities for the navigator.
//!
//! Provides a [`RecordingDocument`] and hook doubles that append to one
//! shared [`Timeline`], so tests can assert the relative order of DOM
//! updates and widget lifecycle calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use gclusters_store::ViewportState;
use gclusters_types::content::{ContentGenerator, GeneratedPage};
use gclusters_types::error::{GcError, Result};
use gclusters_types::lang::Lang;
use gclusters_types::page::PageId;

use crate::dom::{BackAffordance, Document, MountLayout};
use crate::hooks::{LocalizationRefresh, PersistHook, WidgetInstance};
use crate::scripts::ScriptBlock;

// -----------------------------------------------------------------------
// Timeline
// -----------------------------------------------------------------------

/// Ordered log of events shared between test doubles.
#[derive(Debug, Clone, Default)]
pub struct Timeline(Arc<Mutex<Vec<String>>>);

/// Widgets log their teardown into a timeline as well.
pub type WidgetLog = Timeline;

impl Timeline {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    /// Position of the first event equal to `event`.
    pub fn position(&self, event: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == event)
    }

    /// Names of torn-down widgets, in order.
    pub fn teardowns(&self) -> Vec<String> {
        self.entries()
            .iter()
            .filter_map(|e| e.strip_prefix("teardown:").map(str::to_string))
            .collect()
    }
}

// -----------------------------------------------------------------------
// RecordingDocument
// -----------------------------------------------------------------------

/// A document that records every call.
pub struct RecordingDocument {
    pub timeline: Timeline,
    mount: bool,
    html: Mutex<String>,
    title: Mutex<String>,
    scripts: Mutex<Vec<ScriptBlock>>,
}

impl RecordingDocument {
    pub fn new(timeline: &Timeline) -> Self {
        Self {
            timeline: timeline.clone(),
            mount: true,
            html: Mutex::new(String::new()),
            title: Mutex::new(String::new()),
            scripts: Mutex::new(Vec::new()),
        }
    }

    /// A document without a mount point.
    pub fn without_mount(timeline: &Timeline) -> Self {
        Self {
            mount: false,
            ..Self::new(timeline)
        }
    }

    pub fn html(&self) -> String {
        self.html.lock().unwrap().clone()
    }

    pub fn title(&self) -> String {
        self.title.lock().unwrap().clone()
    }

    pub fn scripts(&self) -> Vec<ScriptBlock> {
        self.scripts.lock().unwrap().clone()
    }
}

impl Document for RecordingDocument {
    fn has_mount(&self) -> bool {
        self.mount
    }

    fn set_mount_opacity(&self, opacity: f32) {
        self.timeline.push(format!("opacity:{opacity}"));
    }

    fn set_mount_html(&self, html: &str) {
        self.timeline.push("html");
        *self.html.lock().unwrap() = html.to_string();
    }

    fn set_mount_layout(&self, layout: MountLayout) {
        self.timeline.push(format!("layout:{layout:?}"));
    }

    fn run_script(&self, script: &ScriptBlock) -> Result<()> {
        let label = script.src().unwrap_or("inline").to_string();
        self.timeline.push(format!("script:{label}"));
        self.scripts.lock().unwrap().push(script.clone());
        if script.attribute("data-fail").is_some() {
            return Err(GcError::Widget(format!("script {label} failed")));
        }
        Ok(())
    }

    fn set_title(&self, title: &str) {
        self.timeline.push(format!("title:{title}"));
        *self.title.lock().unwrap() = title.to_string();
    }

    fn set_back_affordance(&self, affordance: BackAffordance) {
        self.timeline.push(format!("back:{affordance:?}"));
    }
}

// -----------------------------------------------------------------------
// StubGenerator
// -----------------------------------------------------------------------

/// Content generator with per-page overrides and call counting.
///
/// By default every page renders `<p>{page} in {lang}</p>`.
#[derive(Default)]
pub struct StubGenerator {
    calls: AtomicUsize,
    html: HashMap<PageId, String>,
    missing: Vec<PageId>,
    failing: Vec<PageId>,
}

impl StubGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_html(mut self, page: PageId, html: &str) -> Self {
        self.html.insert(page, html.to_string());
        self
    }

    /// Generate nothing for `page`.
    pub fn missing(mut self, page: PageId) -> Self {
        self.missing.push(page);
        self
    }

    /// Fail to generate `page`.
    pub fn failing(mut self, page: PageId) -> Self {
        self.failing.push(page);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ContentGenerator for StubGenerator {
    fn generate(&self, page: PageId, lang: &Lang) -> Result<Option<GeneratedPage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&page) {
            return Err(GcError::Content(format!("cannot render {page}")));
        }
        if self.missing.contains(&page) {
            return Ok(None);
        }
        let html = self
            .html
            .get(&page)
            .cloned()
            .unwrap_or_else(|| format!("<p>{page} in {lang}</p>"));
        Ok(Some(GeneratedPage::new(format!("{page} | {lang}"), html)))
    }
}

// -----------------------------------------------------------------------
// Widget and hook doubles
// -----------------------------------------------------------------------

pub struct FakeWidget {
    name: String,
    pub state: ViewportState,
    timeline: Timeline,
    fail_teardown: bool,
}

impl FakeWidget {
    pub fn new(name: &str, timeline: &Timeline) -> Self {
        Self {
            name: name.to_string(),
            state: ViewportState::new(10.6847, 41.269, 1.5),
            timeline: timeline.clone(),
            fail_teardown: false,
        }
    }

    pub fn failing_teardown(mut self) -> Self {
        self.fail_teardown = true;
        self
    }
}

impl WidgetInstance for FakeWidget {
    fn name(&self) -> &str {
        &self.name
    }

    fn viewport(&self) -> Result<ViewportState> {
        Ok(self.state.clone())
    }

    fn teardown(&mut self) -> Result<()> {
        self.timeline.push(format!("teardown:{}", self.name));
        if self.fail_teardown {
            return Err(GcError::Widget("teardown failed".into()));
        }
        Ok(())
    }
}

/// Persist hook that records which widget it saw.
pub struct PersistRecorder {
    pub timeline: Timeline,
    pub fail: bool,
}

impl PersistHook for PersistRecorder {
    fn persist(&self, widget: Option<&dyn WidgetInstance>) -> Result<()> {
        let name = widget.map_or("none", |w| w.name());
        self.timeline.push(format!("persist:{name}"));
        if self.fail {
            return Err(GcError::Store("quota exceeded".into()));
        }
        Ok(())
    }
}

/// Localization hook that records the language it was asked to apply.
pub struct RefreshRecorder {
    pub timeline: Timeline,
}

impl LocalizationRefresh for RefreshRecorder {
    fn refresh(&self, lang: &Lang) -> Result<()> {
        self.timeline.push(format!("refresh:{lang}"));
        Ok(())
    }
}
