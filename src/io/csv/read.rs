//! CSV reading operations.

use std::{fs::File, path::Path, sync::Arc};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, DataType, Field, Schema, SchemaRef}};

/// Reads a census CSV file from `path` into a Polars DataFrame.
pub(crate) fn read_census_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;
    CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(census_csv_schema()))
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read CSV from {:?}", path))
}

/// Reads a census CSV from a string.
#[cfg(test)]
pub(crate) fn read_census_csv_string(csv: &str) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(census_csv_schema()))
        .into_reader_with_file_handle(std::io::Cursor::new(csv.as_bytes()))
        .finish()
        .context("[io::csv::read] Failed to read CSV from string")
}

/// Schema overwrite for census CSV files: keys stay text even when they look numeric.
fn census_csv_schema() -> SchemaRef {
    Arc::new(Schema::from_iter([
        Field::new("PA".into(), DataType::String),
        Field::new("SZ".into(), DataType::String),
        Field::new("AG".into(), DataType::String),
    ]))
}
