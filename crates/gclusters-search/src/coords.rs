//! Search box input classification.
//!
//! The unified search box accepts either equatorial coordinates (decimal
//! degrees or sexagesimal) or an object name.

use std::sync::LazyLock;

use regex::Regex;

static DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?\d+\.?\d*)\s+([+-]?\d+\.?\d*)$").expect("decimal pattern is valid")
});

static SEXAGESIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2}(?:\.\d+)?)\s*([+-])(\d{1,2}):(\d{2}):(\d{2}(?:\.\d+)?)$")
        .expect("sexagesimal pattern is valid")
});

/// What the visitor typed.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchInput {
    /// Equatorial position in degrees.
    Coordinates { ra: f64, dec: f64 },
    /// Anything else, trimmed.
    Object { name: String },
}

impl SearchInput {
    pub fn is_coordinates(&self) -> bool {
        matches!(self, Self::Coordinates { .. })
    }

    /// Object name, if the input was not a position.
    pub fn object_name(&self) -> Option<&str> {
        match self {
            Self::Object { name } => Some(name),
            Self::Coordinates { .. } => None,
        }
    }
}

/// Classify search box input.
///
/// Accepts `"ra dec"` in decimal degrees, or `HH:MM:SS(.s) ±DD:MM:SS(.s)`
/// where right ascension is in hours and is converted to degrees.
pub fn parse_input(input: &str) -> SearchInput {
    let trimmed = input.trim();

    if let Some(caps) = DECIMAL.captures(trimmed)
        && let (Ok(ra), Ok(dec)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>())
    {
        return SearchInput::Coordinates { ra, dec };
    }

    if let Some(caps) = SEXAGESIMAL.captures(trimmed)
        && let Some((ra, dec)) = sexagesimal_to_degrees(&caps)
    {
        return SearchInput::Coordinates { ra, dec };
    }

    SearchInput::Object {
        name: trimmed.to_string(),
    }
}

fn sexagesimal_to_degrees(caps: &regex::Captures<'_>) -> Option<(f64, f64)> {
    let field = |i: usize| caps[i].parse::<f64>().ok();

    let hours = field(1)? + field(2)? / 60.0 + field(3)? / 3600.0;
    let sign = if &caps[4] == "-" { -1.0 } else { 1.0 };
    let degrees = field(5)? + field(6)? / 60.0 + field(7)? / 3600.0;

    Some((hours * 15.0, sign * degrees))
}
