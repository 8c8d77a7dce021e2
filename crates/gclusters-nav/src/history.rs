//! Browser history integration.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use gclusters_types::page::PageId;

/// State attached to a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub page: PageId,
}

impl HistoryState {
    pub fn new(page: PageId) -> Self {
        Self { page }
    }
}

/// Session history the navigator pushes to and rewrites.
pub trait History: Send + Sync {
    /// Current location path.
    fn location(&self) -> String;

    /// Push a new entry.
    fn push(&self, state: HistoryState, url: &str);

    /// Rewrite the current entry in place without loading anything.
    fn replace(&self, state: Option<HistoryState>, url: &str);
}

/// A single entry in the session history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    pub url: String,
    pub state: Option<HistoryState>,
}

#[derive(Debug)]
struct Stacks {
    back: Vec<SessionEntry>,
    forward: Vec<SessionEntry>,
    current: SessionEntry,
    pushes: usize,
}

/// In-memory session history with back/forward stacks.
///
/// Stands in for the browser's history object when the navigator runs
/// outside a browser.
#[derive(Debug)]
pub struct SessionHistory {
    inner: Mutex<Stacks>,
}

impl SessionHistory {
    /// History with a single entry at `url` and no state.
    pub fn new(url: &str) -> Self {
        Self {
            inner: Mutex::new(Stacks {
                back: Vec::new(),
                forward: Vec::new(),
                current: SessionEntry {
                    url: url.to_string(),
                    state: None,
                },
                pushes: 0,
            }),
        }
    }

    fn stacks(&self) -> std::sync::MutexGuard<'_, Stacks> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Step back. Returns the state of the entry moved to, as a browser
    /// delivers it with a pop event, or `None` at the start of history.
    pub fn go_back(&self) -> Option<Option<HistoryState>> {
        let mut s = self.stacks();
        let prev = s.back.pop()?;
        let current = std::mem::replace(&mut s.current, prev);
        s.forward.push(current);
        Some(s.current.state)
    }

    /// Step forward. See [`SessionHistory::go_back`].
    pub fn go_forward(&self) -> Option<Option<HistoryState>> {
        let mut s = self.stacks();
        let next = s.forward.pop()?;
        let current = std::mem::replace(&mut s.current, next);
        s.back.push(current);
        Some(s.current.state)
    }

    pub fn current(&self) -> SessionEntry {
        self.stacks().current.clone()
    }

    pub fn can_go_back(&self) -> bool {
        !self.stacks().back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.stacks().forward.is_empty()
    }

    /// Number of entries (back stack, current, forward stack).
    pub fn len(&self) -> usize {
        let s = self.stacks();
        s.back.len() + 1 + s.forward.len()
    }

    /// Always `false`: a session has at least its current entry.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Total pushes since creation.
    pub fn push_count(&self) -> usize {
        self.stacks().pushes
    }
}

impl History for SessionHistory {
    fn location(&self) -> String {
        self.stacks().current.url.clone()
    }

    fn push(&self, state: HistoryState, url: &str) {
        let mut s = self.stacks();
        let entry = SessionEntry {
            url: url.to_string(),
            state: Some(state),
        };
        let previous = std::mem::replace(&mut s.current, entry);
        s.back.push(previous);
        s.forward.clear();
        s.pushes += 1;
    }

    fn replace(&self, state: Option<HistoryState>, url: &str) {
        let mut s = self.stacks();
        s.current = SessionEntry {
            url: url.to_string(),
            state,
        };
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_moves_current_to_back_stack() {
        let h = SessionHistory::new("/");
        h.push(HistoryState::new(PageId::Method), "/method");
        assert_eq!(h.location(), "/method");
        assert!(h.can_go_back());
        assert!(!h.can_go_forward());
        assert_eq!(h.len(), 2);
        assert_eq!(h.push_count(), 1);
    }

    #[test]
    fn back_and_forward_return_states() {
        let h = SessionHistory::new("/");
        h.replace(Some(HistoryState::new(PageId::Home)), "/");
        h.push(HistoryState::new(PageId::Articles), "/articles");

        assert_eq!(h.go_back(), Some(Some(HistoryState::new(PageId::Home))));
        assert_eq!(h.location(), "/");
        assert_eq!(
            h.go_forward(),
            Some(Some(HistoryState::new(PageId::Articles)))
        );
        assert_eq!(h.go_forward(), None);
    }

    #[test]
    fn back_at_start_is_none() {
        let h = SessionHistory::new("/");
        assert_eq!(h.go_back(), None);
    }

    #[test]
    fn entry_without_state_pops_none() {
        let h = SessionHistory::new("/");
        h.push(HistoryState::new(PageId::Contact), "/contact");
        assert_eq!(h.go_back(), Some(None));
    }

    #[test]
    fn push_clears_forward_stack() {
        let h = SessionHistory::new("/");
        h.push(HistoryState::new(PageId::Method), "/method");
        h.go_back();
        h.push(HistoryState::new(PageId::Projects), "/projects");
        assert!(!h.can_go_forward());
    }

    #[test]
    fn replace_does_not_grow_history() {
        let h = SessionHistory::new("/method.html");
        h.replace(Some(HistoryState::new(PageId::Method)), "/method");
        assert_eq!(h.len(), 1);
        assert_eq!(h.push_count(), 0);
        assert_eq!(h.current().url, "/method");
    }

    #[test]
    fn state_serializes_as_page_slug() {
        let json = serde_json::to_string(&HistoryState::new(PageId::AladinBot)).unwrap();
        assert_eq!(json, r#"{"page":"aladin-bot"}"#);
    }
}
