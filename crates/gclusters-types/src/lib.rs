//! Foundation types for gclusters.
//!
//! This crate contains the types shared by every gclusters crate: page
//! identifiers and their URL mapping, language codes, the content
//! generator contract, HTML escaping, and the common error type.

pub mod content;
pub mod error;
pub mod html;
pub mod lang;
pub mod page;

pub use content::{ContentGenerator, GeneratedPage};
pub use error::{GcError, Result};
pub use html::escape_html;
pub use lang::Lang;
pub use page::PageId;
