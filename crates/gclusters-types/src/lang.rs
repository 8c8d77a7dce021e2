//! Language codes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Language every lookup falls back to.
pub const DEFAULT_LANG: &str = "en";

/// A normalized language code (`"en"`, `"ru"`, ...).
///
/// Codes are trimmed and lowercased; an empty code becomes
/// [`DEFAULT_LANG`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Lang(String);

impl Lang {
    pub fn new(code: &str) -> Self {
        let code = code.trim().to_ascii_lowercase();
        if code.is_empty() {
            Self(DEFAULT_LANG.to_string())
        } else {
            Self(code)
        }
    }

    /// The default language.
    pub fn en() -> Self {
        Self(DEFAULT_LANG.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_LANG
    }
}

impl Default for Lang {
    fn default() -> Self {
        Self::en()
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Lang {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for Lang {
    fn from(code: String) -> Self {
        Self::new(&code)
    }
}

impl From<Lang> for String {
    fn from(lang: Lang) -> Self {
        lang.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(Lang::new("  RU ").as_str(), "ru");
    }

    #[test]
    fn empty_code_is_default() {
        assert_eq!(Lang::new(""), Lang::en());
        assert!(Lang::new("   ").is_default());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Lang::new("ru")).unwrap();
        assert_eq!(json, "\"ru\"");
        let back: Lang = serde_json::from_str("\"EN\"").unwrap();
        assert_eq!(back, Lang::en());
    }
}
