#![doc = "GeoPop public API"]
mod buildings;
mod common;
mod config;
mod error;
mod geom;
mod io;
mod pipeline;
mod population;

#[doc(inline)]
pub use buildings::{Building, Classifier, Footprint, LandUse, Subzone, filter_residential};

#[doc(inline)]
pub use common::{extract_landuse, parse_age_lower_bound, parse_age_range, parse_levels};

#[doc(inline)]
pub use config::{PipelineConfig, UnparsedBracket};

#[doc(inline)]
pub use error::ConsistencyError;

#[doc(inline)]
pub use geom::{Crs, Reprojector};

#[doc(inline)]
pub use pipeline::Pipeline;

#[doc(inline)]
pub use population::{
    AgeWindow, AllocatedPopulation, CensusRow, ElderlyRate, ReducedPopulation,
    aggregate_census, allocate_population, elderly_rates, reduce_by_age,
};
