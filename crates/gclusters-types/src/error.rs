//! Error types for gclusters.

use std::io;

/// Errors produced by the gclusters crates.
#[derive(Debug, thiserror::Error)]
pub enum GcError {
    #[error("content error: {0}")]
    Content(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("search error: {0}")]
    Search(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("widget error: {0}")]
    Widget(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, GcError>;
