//! Typed preferences over a [`KvStore`].
//!
//! Keys and value formats match what the site has always written, so a
//! store populated by earlier sessions keeps loading. Unreadable values are
//! treated as absent; they never surface as errors on read.

use std::sync::Arc;

use chrono::{Datelike, Utc};

use gclusters_types::error::Result;
use gclusters_types::lang::Lang;

use crate::kv::KvStore;
use crate::records::{SEARCH_HISTORY_LIMIT, SearchRecord, SortOrder, ViewportState};

pub const KEY_LANG: &str = "lang";
pub const KEY_SEARCH_HISTORY: &str = "ads_search_history";
pub const KEY_SORT_ORDER: &str = "ads_sort_order";
pub const KEY_YEAR_MIN: &str = "ads_year_min";
pub const KEY_YEAR_MAX: &str = "ads_year_max";
pub const KEY_VIEWPORT: &str = "aladinState";

/// Lower year bound used when none is stored.
pub const DEFAULT_YEAR_MIN: i32 = 1905;

// ---------------------------------------------------------------------------
// Year bounds
// ---------------------------------------------------------------------------

/// Which bound of a year range the user was editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearEdit {
    Min,
    Max,
}

/// Publication year filter range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

impl YearBounds {
    /// Build bounds, resolving `min > max` by moving the bound that was not
    /// being edited onto the edited one.
    pub fn reconciled(min: i32, max: i32, edited: YearEdit) -> Self {
        if min <= max {
            return Self { min, max };
        }
        match edited {
            YearEdit::Min => Self { min, max: min },
            YearEdit::Max => Self { min: max, max },
        }
    }

    /// `min-max` form accepted by the literature query builder.
    pub fn as_range(&self) -> String {
        format!("{}-{}", self.min, self.max)
    }
}

impl Default for YearBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_YEAR_MIN,
            max: current_year(),
        }
    }
}

fn current_year() -> i32 {
    Utc::now().year()
}

/// Stored year, or `None` for missing, unparsable or zero values.
fn parse_year(raw: Option<String>) -> Option<i32> {
    raw?.trim().parse::<i32>().ok().filter(|y| *y != 0)
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// Typed view over the persisted store.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KvStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    // -- Language ----------------------------------------------------------

    /// Saved language, `en` when none is stored.
    pub fn language(&self) -> Lang {
        self.store
            .get(KEY_LANG)
            .map(Lang::from)
            .unwrap_or_default()
    }

    pub fn set_language(&self, lang: &Lang) -> Result<()> {
        self.store.set(KEY_LANG, lang.as_str())
    }

    // -- Search history ----------------------------------------------------

    /// Saved searches, most recent first. Corrupt data reads as empty.
    pub fn search_history(&self) -> Vec<SearchRecord> {
        let Some(raw) = self.store.get(KEY_SEARCH_HISTORY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(history) => history,
            Err(e) => {
                log::warn!("Discarding unreadable search history: {e}");
                Vec::new()
            },
        }
    }

    /// Prepend a search, keeping at most [`SEARCH_HISTORY_LIMIT`] entries.
    pub fn record_search(&self, record: SearchRecord) -> Result<()> {
        let mut history = self.search_history();
        history.insert(0, record);
        history.truncate(SEARCH_HISTORY_LIMIT);
        let json = serde_json::to_string(&history)?;
        self.store.set(KEY_SEARCH_HISTORY, &json)
    }

    pub fn clear_search_history(&self) -> Result<()> {
        self.store.remove(KEY_SEARCH_HISTORY)
    }

    // -- Sort order --------------------------------------------------------

    /// Saved sort order; unknown stored values fall back to the default.
    pub fn sort_order(&self) -> SortOrder {
        match self.store.get(KEY_SORT_ORDER) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                log::debug!("Ignoring stored sort order: {e}");
                SortOrder::default()
            }),
            None => SortOrder::default(),
        }
    }

    pub fn set_sort_order(&self, order: SortOrder) -> Result<()> {
        self.store.set(KEY_SORT_ORDER, order.as_str())
    }

    // -- Year bounds -------------------------------------------------------

    /// Saved year bounds with defaults for missing values.
    pub fn year_bounds(&self) -> YearBounds {
        let defaults = YearBounds::default();
        YearBounds {
            min: parse_year(self.store.get(KEY_YEAR_MIN)).unwrap_or(defaults.min),
            max: parse_year(self.store.get(KEY_YEAR_MAX)).unwrap_or(defaults.max),
        }
    }

    /// Reconcile and store a year range. Returns the stored bounds.
    pub fn set_year_bounds(&self, min: i32, max: i32, edited: YearEdit) -> Result<YearBounds> {
        let bounds = YearBounds::reconciled(min, max, edited);
        self.store.set(KEY_YEAR_MIN, &bounds.min.to_string())?;
        self.store.set(KEY_YEAR_MAX, &bounds.max.to_string())?;
        Ok(bounds)
    }

    // -- Sky viewer viewport -----------------------------------------------

    pub fn save_viewport(&self, state: &ViewportState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.store.set(KEY_VIEWPORT, &json)?;
        log::debug!(
            "Saved viewport ra={} dec={} fov={}",
            state.ra,
            state.dec,
            state.fov
        );
        Ok(())
    }

    /// Saved viewport if it is younger than one hour.
    pub fn restore_viewport(&self) -> Option<ViewportState> {
        self.restore_viewport_at(Utc::now().timestamp_millis())
    }

    /// Saved viewport as of `now_ms`. Expired or malformed records are
    /// removed from the store.
    pub fn restore_viewport_at(&self, now_ms: i64) -> Option<ViewportState> {
        let raw = self.store.get(KEY_VIEWPORT)?;
        let state = match serde_json::from_str::<ViewportState>(&raw) {
            Ok(state) if state.is_valid() => state,
            Ok(_) | Err(_) => {
                log::warn!("Discarding malformed viewport state");
                self.forget_viewport();
                return None;
            },
        };
        if state.is_expired_at(now_ms) {
            log::debug!("Saved viewport expired");
            self.forget_viewport();
            return None;
        }
        Some(state)
    }

    fn forget_viewport(&self) {
        if let Err(e) = self.store.remove(KEY_VIEWPORT) {
            log::warn!("Failed to remove viewport state: {e}");
        }
    }
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::records::VIEWPORT_MAX_AGE_MS;

    fn prefs() -> (Arc<MemoryStore>, Preferences) {
        let store = Arc::new(MemoryStore::new());
        let prefs = Preferences::new(Arc::clone(&store) as Arc<dyn KvStore>);
        (store, prefs)
    }

    #[test]
    fn language_defaults_to_english() {
        let (_, prefs) = prefs();
        assert_eq!(prefs.language(), Lang::en());
        prefs.set_language(&Lang::new("ru")).unwrap();
        assert_eq!(prefs.language().as_str(), "ru");
    }

    #[test]
    fn history_is_most_recent_first() {
        let (_, prefs) = prefs();
        prefs
            .record_search(SearchRecord::now("first", 1, SortOrder::default()))
            .unwrap();
        prefs
            .record_search(SearchRecord::now("second", 2, SortOrder::default()))
            .unwrap();
        let history = prefs.search_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].query, "second");
        assert_eq!(history[1].query, "first");
    }

    #[test]
    fn history_is_capped() {
        let (_, prefs) = prefs();
        for i in 0..SEARCH_HISTORY_LIMIT + 5 {
            prefs
                .record_search(SearchRecord::now(format!("q{i}"), i as u64, SortOrder::DateDesc))
                .unwrap();
        }
        let history = prefs.search_history();
        assert_eq!(history.len(), SEARCH_HISTORY_LIMIT);
        assert_eq!(history[0].query, format!("q{}", SEARCH_HISTORY_LIMIT + 4));
    }

    #[test]
    fn corrupt_history_reads_empty_and_recovers() {
        let (store, prefs) = prefs();
        store.set(KEY_SEARCH_HISTORY, "[{broken").unwrap();
        assert!(prefs.search_history().is_empty());
        prefs
            .record_search(SearchRecord::now("m31", 4, SortOrder::default()))
            .unwrap();
        assert_eq!(prefs.search_history().len(), 1);
    }

    #[test]
    fn clear_history_removes_key() {
        let (store, prefs) = prefs();
        prefs
            .record_search(SearchRecord::now("x", 0, SortOrder::default()))
            .unwrap();
        prefs.clear_search_history().unwrap();
        assert!(!store.contains(KEY_SEARCH_HISTORY));
    }

    #[test]
    fn sort_order_round_trips_and_rejects_garbage() {
        let (store, prefs) = prefs();
        assert_eq!(prefs.sort_order(), SortOrder::CitationCountDesc);
        prefs.set_sort_order(SortOrder::DateDesc).unwrap();
        assert_eq!(store.get(KEY_SORT_ORDER).as_deref(), Some("date desc"));
        assert_eq!(prefs.sort_order(), SortOrder::DateDesc);
        store.set(KEY_SORT_ORDER, "bogus").unwrap();
        assert_eq!(prefs.sort_order(), SortOrder::CitationCountDesc);
    }

    #[test]
    fn year_bounds_default() {
        let (store, prefs) = prefs();
        let bounds = prefs.year_bounds();
        assert_eq!(bounds.min, DEFAULT_YEAR_MIN);
        assert_eq!(bounds.max, current_year());
        store.set(KEY_YEAR_MIN, "0").unwrap();
        store.set(KEY_YEAR_MAX, "abc").unwrap();
        assert_eq!(prefs.year_bounds(), YearBounds::default());
    }

    #[test]
    fn year_bounds_reconcile_moves_other_bound() {
        let (_, prefs) = prefs();
        let b = prefs.set_year_bounds(2010, 2000, YearEdit::Min).unwrap();
        assert_eq!(b, YearBounds { min: 2010, max: 2010 });
        let b = prefs.set_year_bounds(2010, 2000, YearEdit::Max).unwrap();
        assert_eq!(b, YearBounds { min: 2000, max: 2000 });
        assert_eq!(prefs.year_bounds(), b);
        assert_eq!(b.as_range(), "2000-2000");
    }

    #[test]
    fn viewport_restores_when_fresh() {
        let (_, prefs) = prefs();
        let state = ViewportState::new(10.68, 41.27, 2.0).with_timestamp(1_000);
        prefs.save_viewport(&state).unwrap();
        assert_eq!(prefs.restore_viewport_at(1_000 + 60_000), Some(state));
    }

    #[test]
    fn viewport_expires_after_one_hour() {
        let (store, prefs) = prefs();
        let state = ViewportState::new(10.68, 41.27, 2.0).with_timestamp(0);
        prefs.save_viewport(&state).unwrap();
        assert_eq!(prefs.restore_viewport_at(VIEWPORT_MAX_AGE_MS + 1), None);
        assert!(!store.contains(KEY_VIEWPORT));
    }

    #[test]
    fn malformed_viewport_is_removed() {
        let (store, prefs) = prefs();
        store.set(KEY_VIEWPORT, "{\"ra\":\"x\"}").unwrap();
        assert_eq!(prefs.restore_viewport_at(0), None);
        assert!(!store.contains(KEY_VIEWPORT));
    }

    #[test]
    fn corrupt_viewport_timestamp_is_removed() {
        let (store, prefs) = prefs();
        store
            .set(
                KEY_VIEWPORT,
                r#"{"ra":1,"dec":2,"fov":3,"timestamp":-9223372036854775808}"#,
            )
            .unwrap();
        assert_eq!(prefs.restore_viewport_at(1_700_000_000_000), None);
        assert!(!store.contains(KEY_VIEWPORT));
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn reconciled_bounds_are_ordered(
                min in 1800i32..2100,
                max in 1800i32..2100,
                edit_min in any::<bool>(),
            ) {
                let edited = if edit_min { YearEdit::Min } else { YearEdit::Max };
                let b = YearBounds::reconciled(min, max, edited);
                prop_assert!(b.min <= b.max);
                match edited {
                    YearEdit::Min => prop_assert_eq!(b.min, min),
                    YearEdit::Max => prop_assert_eq!(b.max, max),
                }
            }

            #[test]
            fn restoring_any_timestamp_never_panics(saved in any::<i64>(), now in any::<i64>()) {
                let (_, prefs) = prefs();
                let state = ViewportState::new(10.0, 20.0, 1.0).with_timestamp(saved);
                prefs.save_viewport(&state).unwrap();
                let restored = prefs.restore_viewport_at(now);
                let fresh = now.checked_sub(saved).is_some_and(|age| age <= VIEWPORT_MAX_AGE_MS);
                prop_assert_eq!(restored.is_some(), fresh);
            }
        }
    }
}
