//! Persisted client state for gclusters.
//!
//! A [`KvStore`] holds plain string values under string keys, the way a
//! browser's local storage does. [`Preferences`] layers the typed records
//! the site keeps on top of it: language, ADS search history, sort order,
//! year bounds and the sky viewer's last viewport.

pub mod file;
pub mod kv;
pub mod memory;
pub mod prefs;
pub mod records;

pub use file::FileStore;
pub use kv::KvStore;
pub use memory::MemoryStore;
pub use prefs::{Preferences, YearBounds, YearEdit};
pub use records::{
    SEARCH_HISTORY_LIMIT, SearchRecord, SortOrder, VIEWPORT_MAX_AGE_MS, ViewportState,
};
