//! Page content for gclusters.
//!
//! [`SitePages`] is the site's [`ContentGenerator`]: it renders the HTML
//! fragment and document title of every page in the requested language.
//!
//! [`ContentGenerator`]: gclusters_types::ContentGenerator

pub mod pages;

pub use pages::SitePages;
