//! Text catalog and lookup.

use std::collections::HashMap;
use std::path::Path;

use gclusters_types::error::Result;
use gclusters_types::lang::{DEFAULT_LANG, Lang};

/// Localization lookup contract.
///
/// Lookups never fail: an unresolved key is returned as-is so missing
/// translations stay visible instead of breaking the page.
pub trait TextLookup: Send + Sync {
    fn text(&self, key: &str, lang: &Lang) -> String;
}

/// Catalog of display strings per language.
#[derive(Debug, Clone, Default)]
pub struct SiteTexts {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl SiteTexts {
    /// Catalog with the embedded English table only.
    pub fn builtin() -> Result<Self> {
        let mut texts = Self::default();
        texts.add_catalog(DEFAULT_LANG, include_str!("../texts/en.toml"))?;
        Ok(texts)
    }

    /// Merge a TOML table of `key = "text"` pairs into `lang`.
    ///
    /// Later catalogs override keys of earlier ones for the same language.
    pub fn add_catalog(&mut self, lang: &str, source: &str) -> Result<()> {
        let table: HashMap<String, String> = toml::from_str(source)?;
        let lang = Lang::new(lang);
        log::debug!("Loaded {} texts for '{lang}'", table.len());
        self.catalogs
            .entry(lang.as_str().to_string())
            .or_default()
            .extend(table);
        Ok(())
    }

    /// Load a catalog overlay from a TOML file.
    pub fn load_catalog_file(&mut self, lang: &str, path: &Path) -> Result<()> {
        let source = std::fs::read_to_string(path)?;
        self.add_catalog(lang, &source)
    }

    /// Languages with at least one catalog, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = self.catalogs.keys().map(String::as_str).collect();
        langs.sort_unstable();
        langs
    }

    fn lookup(&self, key: &str, lang: &Lang) -> Option<&str> {
        self.catalogs
            .get(lang.as_str())
            .and_then(|c| c.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(key)))
            .map(String::as_str)
    }
}

impl TextLookup for SiteTexts {
    fn text(&self, key: &str, lang: &Lang) -> String {
        match self.lookup(key, lang) {
            Some(text) => text.to_string(),
            None => {
                log::debug!("Missing text '{key}' for '{lang}'");
                key.to_string()
            },
        }
    }
}
