mod fs;
mod parse;

pub(crate) use fs::*;
pub use parse::{extract_landuse, parse_age_lower_bound, parse_age_range, parse_levels};
