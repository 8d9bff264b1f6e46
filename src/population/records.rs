use geo::MultiPolygon;

use crate::buildings::Building;

/// Census count for one (planning area, subzone, age bracket) key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CensusRow {
    pub planning_area: String,
    pub subzone: String,
    /// `"<N>_to_<M>"` or `"<N>_and_over"` in well-formed tables.
    pub age_bracket: String,
    pub population_count: u64,
}

/// Share of one age bracket's subzone population assigned to one building.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocatedPopulation {
    /// The residential building, with its subzone name uppercased.
    pub building: Building,
    /// Uppercased planning area.
    pub planning_area: String,
    pub age_bracket: String,
    pub allocated_population: f64,
}

/// Population of one building summed over the brackets of an age window.
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedPopulation {
    pub geometry: MultiPolygon<f64>,
    pub building_levels: f64,
    pub floor_area: f64,
    pub planning_area: String,
    pub subzone: String,
    pub allocated_population: f64,
}

/// An elderly reduction with its share of the building's total population.
#[derive(Debug, Clone, PartialEq)]
pub struct ElderlyRate {
    pub population: ReducedPopulation,
    /// In [0, 1] when the building has any population, otherwise 0.
    pub elderly_rate: f64,
}
