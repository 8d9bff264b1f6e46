//! File-backed driver for the pipeline stages.
//!
//! Every stage is a pure function over typed collections; this module only
//! reads each stage's inputs from the configured paths and persists its output.

use std::path::Path;

use anyhow::Result;
use log::info;

use crate::{
    buildings::{self, Building, Classifier, filter_residential},
    config::PipelineConfig,
    io::csv::read_census_csv,
    population::{self, AgeWindow, AllocatedPopulation, ElderlyRate, ReducedPopulation,
        aggregate_census, allocate_population, elderly_rates, reduce_by_age},
};

/// Runs pipeline stages against the datasets named in a [`PipelineConfig`].
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self { Self { config } }

    #[inline] pub fn config(&self) -> &PipelineConfig { &self.config }

    /// Classify raw footprints and write the classified buildings.
    pub fn classify(&self) -> Result<Vec<Building>> {
        let config = &self.config;
        info!("[pipeline] classifying buildings from {}", config.buildings_path.display());

        let footprints = buildings::read_footprints(&config.buildings_path, &config.levels_field)?;
        let landuse = buildings::read_landuse(&config.landuse_path, &config.description_field)?;
        let subzones = buildings::read_subzones(&config.subzone_path, &config.subzone_name_field)?;

        let classifier = Classifier::new(&config.input_crs, &config.calculation_crs, &config.output_crs)?;
        let classified = classifier.classify(&footprints, &landuse, &subzones)?;

        buildings::write_buildings(&classified, &config.classified_path)?;
        info!("[pipeline] wrote {} classified buildings to {}", classified.len(), config.classified_path.display());
        Ok(classified)
    }

    /// Allocate census population to residential buildings for every age bracket.
    pub fn allocate(&self) -> Result<Vec<AllocatedPopulation>> {
        let config = &self.config;
        info!("[pipeline] allocating population from {}", config.census_path.display());

        let classified = buildings::read_buildings(&config.classified_path)?;
        let residential = filter_residential(&classified, &config.residential_label);

        let census = aggregate_census(&read_census_csv(&config.census_path)?)?;
        if let Some(path) = &config.aggregated_census_path {
            population::write_census(&census, path)?;
            info!("[pipeline] wrote aggregated census to {}", path.display());
        }

        let allocated = allocate_population(&residential, &census);
        population::write_allocation(&allocated, &config.allocation_path)?;
        info!("[pipeline] wrote {} allocation records to {}", allocated.len(), config.allocation_path.display());
        Ok(allocated)
    }

    /// Reduce the allocation to one record per building over `window`, written to `output`.
    pub fn reduce(&self, window: AgeWindow, output: &Path) -> Result<Vec<ReducedPopulation>> {
        let allocated = population::read_allocation(&self.config.allocation_path)?;
        let reduced = reduce_by_age(&allocated, window, self.config.unparsed_bracket);

        population::write_reduction(&reduced, output)?;
        info!("[pipeline] wrote {} reduced buildings to {}", reduced.len(), output.display());
        Ok(reduced)
    }

    /// Reduction over the elderly ages, written to the elderly path.
    pub fn reduce_elderly(&self) -> Result<Vec<ReducedPopulation>> {
        self.reduce(AgeWindow::from_age(self.config.elderly_min_age), &self.config.elderly_path)
    }

    /// Reduction over every age, written to the combined path.
    pub fn reduce_combined(&self) -> Result<Vec<ReducedPopulation>> {
        self.reduce(AgeWindow::all(), &self.config.combined_path)
    }

    /// Pair the elderly and combined reductions and write the elderly rates.
    /// A [`ConsistencyError`](crate::ConsistencyError) aborts before anything is written.
    pub fn elderly_rate(&self) -> Result<Vec<ElderlyRate>> {
        let config = &self.config;
        let elderly = population::read_reduction(&config.elderly_path)?;
        let combined = population::read_reduction(&config.combined_path)?;

        let rates = elderly_rates(&elderly, &combined)?;
        population::write_elderly_rates(&rates, &config.elderly_rate_path)?;
        info!("[pipeline] wrote elderly rates to {}", config.elderly_rate_path.display());
        Ok(rates)
    }

    /// Allocation, elderly reduction, combined reduction and rates, in that order.
    /// Classification runs first only when asked, since its output is usually already on disk.
    pub fn run(&self, classify: bool) -> Result<Vec<ElderlyRate>> {
        if classify {
            self.classify()?;
        }
        self.allocate()?;
        self.reduce_elderly()?;
        self.reduce_combined()?;
        self.elderly_rate()
    }
}
