use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use serde_json::Value;

use crate::{
    buildings::{Building, Footprint, LandUse, Subzone},
    common::{extract_landuse, require_file_exists},
    io::geojson::{Feature, read_geojson, write_geojson},
};

impl Footprint {
    fn from_feature(feature: Feature, levels_field: &str) -> Self {
        Self { levels: feature.text(levels_field), geometry: feature.geometry }
    }
}

impl LandUse {
    fn from_feature(feature: Feature, description_field: &str) -> Option<Self> {
        let landuse = feature.text(description_field).and_then(|text| extract_landuse(&text));
        Some(Self { geometry: feature.geometry?, landuse })
    }
}

impl Subzone {
    fn from_feature(feature: Feature, name_field: &str) -> Option<Self> {
        let name = feature.text(name_field)?;
        Some(Self { geometry: feature.geometry?, name })
    }
}

impl Building {
    pub(crate) fn to_feature(&self) -> Feature {
        Feature::new(self.geometry.clone())
            .with("building_type", self.building_type.clone().map_or(Value::Null, Value::from))
            .with("building_levels", self.building_levels)
            .with("floor_area", self.floor_area)
            .with("subzone", self.subzone.clone())
    }

    pub(crate) fn from_feature(feature: Feature) -> Option<Self> {
        Some(Self {
            building_type: feature.text("building_type"),
            building_levels: feature.number("building_levels")?,
            floor_area: feature.number("floor_area")?,
            subzone: feature.text("subzone")?,
            geometry: feature.geometry?,
        })
    }
}

pub(crate) fn read_footprints(path: &Path, levels_field: &str) -> Result<Vec<Footprint>> {
    require_file_exists(path)?;
    Ok(read_geojson(path)?.into_iter()
        .map(|feature| Footprint::from_feature(feature, levels_field))
        .collect())
}

pub(crate) fn read_landuse(path: &Path, description_field: &str) -> Result<Vec<LandUse>> {
    require_file_exists(path)?;
    let features = read_geojson(path)?;
    let total = features.len();
    let landuse = features.into_iter()
        .filter_map(|feature| LandUse::from_feature(feature, description_field))
        .collect::<Vec<_>>();
    debug!("[buildings::io] {} of {total} land-use features have no geometry", total - landuse.len());
    Ok(landuse)
}

pub(crate) fn read_subzones(path: &Path, name_field: &str) -> Result<Vec<Subzone>> {
    require_file_exists(path)?;
    let features = read_geojson(path)?;
    let total = features.len();
    let subzones = features.into_iter()
        .filter_map(|feature| Subzone::from_feature(feature, name_field))
        .collect::<Vec<_>>();
    debug!("[buildings::io] {} of {total} subzone features lack geometry or {name_field:?}", total - subzones.len());
    Ok(subzones)
}

pub(crate) fn read_buildings(path: &Path) -> Result<Vec<Building>> {
    require_file_exists(path)?;
    let features = read_geojson(path)
        .with_context(|| format!("[buildings::io] Failed to load classified buildings from {}", path.display()))?;
    let total = features.len();
    let buildings = features.into_iter()
        .filter_map(Building::from_feature)
        .collect::<Vec<_>>();
    debug!("[buildings::io] skipped {} incomplete classified buildings", total - buildings.len());
    Ok(buildings)
}

pub(crate) fn write_buildings(buildings: &[Building], path: &Path) -> Result<()> {
    write_geojson(&buildings.iter().map(Building::to_feature).collect::<Vec<_>>(), path)
}
