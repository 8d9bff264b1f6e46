//! Text helpers for the semi-structured fields found in the raw datasets.

use std::sync::LazyLock;

use regex::Regex;

static LANDUSE_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<th>LU_DESC</th>\s*<td>([^<]+)</td>").expect("land-use pattern is valid")
});

static BRACKET_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)_to_(\d+)$").expect("bracket range pattern is valid")
});

static BRACKET_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)_and_over$").expect("bracket open-ended pattern is valid")
});

/// Extract the land-use label from the HTML attribute table in a `Description` field.
pub fn extract_landuse(description: &str) -> Option<String> {
    LANDUSE_CELL.captures(description)
        .map(|caps| caps[1].trim().to_string())
        .filter(|label| !label.is_empty())
}

/// Lower bound of an age bracket (`"40_to_44"` or `"90_and_over"`), if the format is recognized.
pub fn parse_age_lower_bound(bracket: &str) -> Option<u32> {
    let bracket = bracket.trim();
    BRACKET_RANGE.captures(bracket)
        .or_else(|| BRACKET_OPEN.captures(bracket))
        .and_then(|caps| caps[1].parse().ok())
}

/// Lower bound of an age bracket, with unrecognized formats read as age zero.
pub fn parse_age_range(bracket: &str) -> u32 {
    parse_age_lower_bound(bracket).unwrap_or(0)
}

/// Coerce a raw `building:levels` value to a number; `None` for anything non-numeric.
pub fn parse_levels(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|levels| levels.is_finite())
}
