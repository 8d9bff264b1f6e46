//! Pipeline configuration: dataset locations, reference systems and field names.

use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::geom::Crs;

/// How age brackets whose label cannot be parsed are treated by the age-range reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnparsedBracket {
    /// Read the bracket as starting at age zero (it then falls in every window starting at 0).
    #[default]
    AgeZero,
    /// Leave the bracket out of every window.
    Exclude,
}

/// Everything a pipeline run needs to know about its inputs and outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Raw building footprints (GeoJSON).
    pub buildings_path: PathBuf,
    /// Land-use polygons with an HTML `Description` field (GeoJSON).
    pub landuse_path: PathBuf,
    /// Subzone boundaries (GeoJSON).
    pub subzone_path: PathBuf,
    /// Census counts with columns PA, SZ, AG, Pop (CSV).
    pub census_path: PathBuf,

    /// Classified buildings, the output of the classification stage.
    pub classified_path: PathBuf,
    /// Where to persist the aggregated census table, if anywhere.
    pub aggregated_census_path: Option<PathBuf>,
    pub allocation_path: PathBuf,
    pub elderly_path: PathBuf,
    pub combined_path: PathBuf,
    pub elderly_rate_path: PathBuf,

    /// CRS of the raw GeoJSON inputs.
    pub input_crs: Crs,
    /// Planar CRS used for area and intersection tests.
    pub calculation_crs: Crs,
    /// CRS of every persisted output.
    pub output_crs: Crs,

    pub levels_field: String,
    pub description_field: String,
    pub subzone_name_field: String,
    pub residential_label: String,

    /// Youngest age counted as elderly.
    pub elderly_min_age: u32,
    pub unparsed_bracket: UnparsedBracket,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            buildings_path: "./raw/osm_buildings.geojson".into(),
            landuse_path: "./raw/landuse_layer.geojson".into(),
            subzone_path: "./raw/subzone.geojson".into(),
            census_path: "./raw/population_by_age_and_subzone_2024.csv".into(),
            classified_path: "./processed/buildings_with_floor_area.geojson".into(),
            aggregated_census_path: Some("./processed/aggregated_population.csv".into()),
            allocation_path: "./processed/population_all_age_brackets_interpolated.geojson".into(),
            elderly_path: "./processed/population_elderly_interpolated.geojson".into(),
            combined_path: "./processed/population_combined_interpolated.geojson".into(),
            elderly_rate_path: "./processed/population_elderly_rate_interpolated.geojson".into(),
            input_crs: Crs::wgs84(),
            calculation_crs: Crs::svy21(),
            output_crs: Crs::wgs84(),
            levels_field: "building:levels".into(),
            description_field: "Description".into(),
            subzone_name_field: "name".into(),
            residential_label: "RESIDENTIAL".into(),
            elderly_min_age: 65,
            unparsed_bracket: UnparsedBracket::AgeZero,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file; omitted keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("[config] Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("[config] Invalid config in {}", path.display()))
    }

    /// Resolve every relative dataset path against `root`.
    pub fn with_root(mut self, root: &Path) -> Self {
        let rebase = |path: &mut PathBuf| if path.is_relative() { *path = root.join(&*path) };
        rebase(&mut self.buildings_path);
        rebase(&mut self.landuse_path);
        rebase(&mut self.subzone_path);
        rebase(&mut self.census_path);
        rebase(&mut self.classified_path);
        if let Some(path) = self.aggregated_census_path.as_mut() { rebase(path) }
        rebase(&mut self.allocation_path);
        rebase(&mut self.elderly_path);
        rebase(&mut self.combined_path);
        rebase(&mut self.elderly_rate_path);
        self
    }
}
