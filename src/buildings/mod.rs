mod building;
mod classify;
mod filter;
mod io;

pub use building::{Building, Footprint, LandUse, Subzone};
pub use classify::Classifier;
pub use filter::filter_residential;
pub(crate) use io::*;
