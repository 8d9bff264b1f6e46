//! IO module for format-specific reading and writing operations.
//!
//! These adapters sit at the edge of the pipeline: stages exchange typed
//! collections, and only the driver touches files.
//!
//! # Format Modules
//!
//! - `geojson` - GeoJSON FeatureCollections for building and land-use layers
//! - `csv` - CSV for census tables

pub(crate) mod csv;
pub(crate) mod geojson;
