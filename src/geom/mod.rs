mod bbox;
mod geom;
mod proj;

use bbox::BoundingBox;
pub(crate) use geom::Geometries;
pub use proj::{Crs, Reprojector};
