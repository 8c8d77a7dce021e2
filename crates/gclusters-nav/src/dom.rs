//! Document integration.
//!
//! The navigator never touches a concrete DOM. It drives a [`Document`],
//! which owns the single mount point (the page's `<main>`), the document
//! title and the back affordance in the header.

use gclusters_types::error::Result;

use crate::scripts::ScriptBlock;

/// Layout class of the mount point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountLayout {
    /// Content centered vertically (home).
    Centered,
    /// Content flowing from the top (every other page).
    TopAligned,
}

/// State of the header's "back to home" control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAffordance {
    /// Hidden, header title not clickable.
    Hidden,
    /// Visible; activating it or the header title navigates home.
    Visible,
}

/// The host document the navigator renders into.
///
/// Implementations are expected to be cheap and synchronous; the navigator
/// performs its own pacing between calls.
pub trait Document: Send + Sync {
    /// Whether the mount point exists. When it does not, every content
    /// swap is skipped.
    fn has_mount(&self) -> bool;

    /// Set the mount point's opacity (0.0 to 1.0).
    fn set_mount_opacity(&self, opacity: f32);

    /// Replace the mount point's inner HTML.
    fn set_mount_html(&self, html: &str);

    fn set_mount_layout(&self, layout: MountLayout);

    /// Execute one script extracted from the installed fragment.
    fn run_script(&self, script: &ScriptBlock) -> Result<()>;

    fn set_title(&self, title: &str);

    fn set_back_affordance(&self, affordance: BackAffordance);
}
