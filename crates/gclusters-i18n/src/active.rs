//! The active display language.
//!
//! Setting the language notifies every subscriber once per actual change;
//! re-setting the current language is silent.

use gclusters_types::lang::Lang;
use tokio::sync::watch;

/// Shared handle to the active language.
#[derive(Debug)]
pub struct ActiveLanguage {
    tx: watch::Sender<Lang>,
}

impl ActiveLanguage {
    pub fn new(initial: Lang) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Current language.
    pub fn get(&self) -> Lang {
        self.tx.borrow().clone()
    }

    /// Switch the language. Returns `true` if it changed.
    pub fn set(&self, lang: Lang) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == lang {
                false
            } else {
                *current = lang;
                true
            }
        });
        if changed {
            log::info!("Active language is now '{}'", self.tx.borrow().as_str());
        }
        changed
    }

    /// Subscribe to language changes.
    pub fn subscribe(&self) -> LanguageWatcher {
        LanguageWatcher {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for ActiveLanguage {
    fn default() -> Self {
        Self::new(Lang::en())
    }
}

/// Receives language change notifications.
#[derive(Debug, Clone)]
pub struct LanguageWatcher {
    rx: watch::Receiver<Lang>,
}

impl LanguageWatcher {
    /// Wait for the next change and return the new language.
    ///
    /// Returns `None` once the [`ActiveLanguage`] is dropped.
    pub async fn changed(&mut self) -> Option<Lang> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Language as last observed.
    pub fn current(&self) -> Lang {
        self.rx.borrow().clone()
    }
}
