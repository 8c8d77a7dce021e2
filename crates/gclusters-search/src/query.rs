//! ADS query construction.

/// Default number of rows per page of results.
pub const DEFAULT_ROWS: u32 = 20;

/// Default cone radius in degrees for coordinate searches.
pub const DEFAULT_RADIUS_DEG: f64 = 0.1;

/// Query matching every record.
pub const MATCH_ALL: &str = "*:*";

/// A literature search against the ADS.
///
/// Structured fields are combined with `AND`. A coordinate search carries
/// a ready-made `pos()` clause instead.
#[derive(Debug, Clone, PartialEq)]
pub struct AdsQuery {
    pub text: String,
    pub author: String,
    /// A single year (`2019`) or an inclusive range (`2000-2010`).
    pub year: String,
    pub object: String,
    pub rows: u32,
    pub start: u32,
    raw: Option<String>,
}

impl Default for AdsQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            author: String::new(),
            year: String::new(),
            object: String::new(),
            rows: DEFAULT_ROWS,
            start: 0,
            raw: None,
        }
    }
}

impl AdsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.year = year.into();
        self
    }

    pub fn object(mut self, object: impl Into<String>) -> Self {
        self.object = object.into();
        self
    }

    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = rows;
        self
    }

    pub fn start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    /// Cone search around a position, optionally restricted to an object
    /// type.
    pub fn coordinates(ra: f64, dec: f64, radius: f64, object_type: Option<&str>) -> Self {
        let mut q = format!("pos({ra},{dec},{radius})");
        if let Some(kind) = object_type.filter(|k| !k.trim().is_empty()) {
            q.push_str(&format!(" AND object:\"{}\"", kind.trim()));
        }
        Self {
            raw: Some(q),
            ..Self::default()
        }
    }

    pub fn is_coordinate_search(&self) -> bool {
        self.raw.is_some()
    }

    /// The `q` parameter sent to the ADS.
    pub fn build(&self) -> String {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }

        let mut parts = Vec::new();

        let text = self.text.trim();
        if !text.is_empty() {
            parts.push(format!("\"{text}\""));
        }

        let author = self.author.trim();
        if !author.is_empty() {
            parts.push(format!("author:\"{author}\""));
        }

        let year = self.year.trim();
        if !year.is_empty() {
            parts.push(year_clause(year));
        }

        let object = self.object.trim();
        if !object.is_empty() {
            parts.push(format!("object:\"{object}\""));
        }

        if parts.is_empty() {
            return MATCH_ALL.to_string();
        }
        parts.join(" AND ")
    }
}

fn year_clause(year: &str) -> String {
    if year.contains('-') {
        let mut bounds = year.split('-').map(str::trim);
        let from = bounds.next().unwrap_or_default();
        let to = bounds.next().unwrap_or_default();
        format!("year:[{from} TO {to}]")
    } else {
        format!("year:{year}")
    }
}
