mod allocate;
mod census;
mod io;
mod rate;
mod records;
mod reduce;

pub use allocate::allocate_population;
pub use census::aggregate_census;
pub(crate) use census::census_to_dataframe;
pub(crate) use io::*;
pub use rate::elderly_rates;
pub use records::{AllocatedPopulation, CensusRow, ElderlyRate, ReducedPopulation};
pub use reduce::{AgeWindow, reduce_by_age};
