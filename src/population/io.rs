use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use crate::{
    buildings::Building,
    common::require_file_exists,
    io::{csv::write_csv, geojson::{Feature, read_geojson, write_geojson}},
    population::{AllocatedPopulation, CensusRow, ElderlyRate, ReducedPopulation, census_to_dataframe},
};

impl AllocatedPopulation {
    fn to_feature(&self) -> Feature {
        self.building.to_feature()
            .with("planning_area", self.planning_area.clone())
            .with("age_bracket", self.age_bracket.clone())
            .with("allocated_population", self.allocated_population)
    }

    /// A missing bracket reads as the empty string, which never parses as an age.
    fn from_feature(feature: Feature) -> Option<Self> {
        let planning_area = feature.text("planning_area")?;
        let age_bracket = feature.text("age_bracket")
            .or_else(|| feature.text("age_range"))
            .unwrap_or_default();
        let allocated_population = feature.number("allocated_population")?;
        Some(Self { building: Building::from_feature(feature)?, planning_area, age_bracket, allocated_population })
    }
}

impl ReducedPopulation {
    fn to_feature(&self) -> Feature {
        Feature::new(self.geometry.clone())
            .with("building_levels", self.building_levels)
            .with("floor_area", self.floor_area)
            .with("planning_area", self.planning_area.clone())
            .with("subzone", self.subzone.clone())
            .with("allocated_population", self.allocated_population)
    }

    fn from_feature(feature: Feature) -> Option<Self> {
        Some(Self {
            building_levels: feature.number("building_levels")?,
            floor_area: feature.number("floor_area")?,
            planning_area: feature.text("planning_area")?,
            subzone: feature.text("subzone")?,
            allocated_population: feature.number("allocated_population").unwrap_or(0.0),
            geometry: feature.geometry?,
        })
    }
}

impl ElderlyRate {
    fn to_feature(&self) -> Feature {
        self.population.to_feature().with("elderly_rate", self.elderly_rate)
    }
}

fn read_features<T>(path: &Path, what: &str, parse: impl Fn(Feature) -> Option<T>) -> Result<Vec<T>> {
    require_file_exists(path)?;
    let features = read_geojson(path)
        .with_context(|| format!("[population::io] Failed to load {what} from {}", path.display()))?;
    let total = features.len();
    let records = features.into_iter().filter_map(parse).collect::<Vec<_>>();
    debug!("[population::io] skipped {} incomplete {what} features", total - records.len());
    Ok(records)
}

pub(crate) fn read_allocation(path: &Path) -> Result<Vec<AllocatedPopulation>> {
    read_features(path, "allocated population", AllocatedPopulation::from_feature)
}

pub(crate) fn write_allocation(records: &[AllocatedPopulation], path: &Path) -> Result<()> {
    write_geojson(&records.iter().map(AllocatedPopulation::to_feature).collect::<Vec<_>>(), path)
}

pub(crate) fn read_reduction(path: &Path) -> Result<Vec<ReducedPopulation>> {
    read_features(path, "age-range reduction", ReducedPopulation::from_feature)
}

pub(crate) fn write_reduction(records: &[ReducedPopulation], path: &Path) -> Result<()> {
    write_geojson(&records.iter().map(ReducedPopulation::to_feature).collect::<Vec<_>>(), path)
}

pub(crate) fn write_elderly_rates(records: &[ElderlyRate], path: &Path) -> Result<()> {
    write_geojson(&records.iter().map(ElderlyRate::to_feature).collect::<Vec<_>>(), path)
}

pub(crate) fn write_census(rows: &[CensusRow], path: &Path) -> Result<()> {
    write_csv(&mut census_to_dataframe(rows)?, path)
}
