//! GeoJSON FeatureCollection reading and writing.

use std::{fs::File, io::{BufReader, BufWriter, Write}, path::Path};

use anyhow::{Context, Result, anyhow};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use log::debug;
use serde_json::{Map, Value, json};

use crate::common::ensure_parent_dir_exists;

/// A feature with an optional (Multi)Polygon geometry and free-form properties.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Feature {
    pub(crate) geometry: Option<MultiPolygon<f64>>,
    pub(crate) properties: Map<String, Value>,
}

impl Feature {
    pub(crate) fn new(geometry: MultiPolygon<f64>) -> Self {
        Self { geometry: Some(geometry), properties: Map::new() }
    }

    /// Builder-style property insert.
    pub(crate) fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// A property as a string, if present and non-null. Numbers are rendered as text.
    pub(crate) fn text(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// A property as a number, if present and numeric.
    pub(crate) fn number(&self, key: &str) -> Option<f64> {
        self.properties.get(key)?.as_f64()
    }
}

/// Read all features from a GeoJSON file.
pub(crate) fn read_geojson(path: &Path) -> Result<Vec<Feature>> {
    let file = File::open(path)
        .with_context(|| format!("[io::geojson::read] Failed to open GeoJSON file: {}", path.display()))?;
    let value: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("[io::geojson::read] Failed to parse GeoJSON from {:?}", path))?;
    features_from_value(&value)
        .with_context(|| format!("[io::geojson::read] Invalid FeatureCollection in {:?}", path))
}

/// Write features to a GeoJSON file, creating the parent directory if needed.
pub(crate) fn write_geojson(features: &[Feature], path: &Path) -> Result<()> {
    ensure_parent_dir_exists(path)?;
    let file = File::create(path)
        .with_context(|| format!("[io::geojson::write] Failed to create GeoJSON file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &features_to_value(features))
        .with_context(|| format!("[io::geojson::write] Failed to write GeoJSON to {:?}", path))?;
    writer.flush()?;
    Ok(())
}

/// Convert a FeatureCollection value into features.
/// Geometries that are malformed, or other than Polygon or MultiPolygon, are read as missing.
pub(crate) fn features_from_value(value: &Value) -> Result<Vec<Feature>> {
    let features = value["features"].as_array()
        .ok_or_else(|| anyhow!("missing \"features\" array"))?;

    Ok(features.iter()
        .enumerate()
        .map(|(idx, feature)| {
            let geometry = match feature.get("geometry") {
                Some(Value::Object(geometry)) => parse_geometry(geometry).unwrap_or_else(|e| {
                    debug!("[io::geojson::read] feature {idx}: {e}");
                    None
                }),
                _ => None,
            };
            let properties = feature.get("properties")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();
            Feature { geometry, properties }
        })
        .collect())
}

/// Convert features into a FeatureCollection value.
pub(crate) fn features_to_value(features: &[Feature]) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": features.iter()
            .map(|feature| json!({
                "type": "Feature",
                "geometry": feature.geometry.as_ref()
                    .map(multipolygon_to_geojson)
                    .unwrap_or(Value::Null),
                "properties": feature.properties,
            }))
            .collect::<Vec<_>>(),
    })
}

fn parse_geometry(geometry: &Map<String, Value>) -> Result<Option<MultiPolygon<f64>>> {
    let coords = match geometry.get("coordinates").and_then(Value::as_array) {
        Some(coords) => coords,
        None => return Ok(None),
    };
    match geometry.get("type").and_then(Value::as_str) {
        Some("Polygon") => Ok(Some(MultiPolygon(vec![parse_polygon_coords(coords)?]))),
        Some("MultiPolygon") => Ok(Some(MultiPolygon(
            coords.iter()
                .map(|polygon| {
                    let rings = polygon.as_array()
                        .ok_or_else(|| anyhow!("Invalid MultiPolygon: polygon must be an array of rings"))?;
                    parse_polygon_coords(rings)
                })
                .collect::<Result<Vec<_>>>()?
        ))),
        _ => Ok(None),
    }
}

/// Parse GeoJSON polygon rings: `[exterior, hole, hole, ...]`.
fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter()
        .map(|ring| {
            let ring = ring.as_array()
                .ok_or_else(|| anyhow!("Invalid Polygon: ring must be an array of positions"))?;
            parse_ring_coords(ring)
        })
        .collect::<Result<Vec<_>>>()?
        .into_iter();

    let exterior = rings.next()
        .ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))?;
    Ok(Polygon::new(exterior, rings.collect()))
}

/// Parse a ring (exterior or interior) from GeoJSON positions `[[x, y], ...]`.
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = coords.iter()
        .map(|position| {
            let x = position.get(0).and_then(Value::as_f64)
                .ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
            let y = position.get(1).and_then(Value::as_f64)
                .ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;

    // Ensure ring is closed (first point == last point)
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }

    Ok(LineString(points))
}

/// Helper to convert a MultiPolygon to a serde_json::Value representing GeoJSON Geometry.
fn multipolygon_to_geojson(mp: &MultiPolygon<f64>) -> Value {
    let polygons = mp.0.iter()
        .map(|polygon| std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(|ring| ring.coords().map(|c| vec![c.x, c.y]).collect::<Vec<_>>())
            .collect::<Vec<_>>())
        .collect::<Vec<_>>();
    json!({
        "type": "MultiPolygon",
        "coordinates": polygons,
    })
}
