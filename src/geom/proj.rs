use std::fmt;

use anyhow::{Context, Result, anyhow};
use geo::{Coord, MapCoords, MultiPolygon};
use proj4rs::{proj::Proj as Proj4, transform::transform};
use serde::{Deserialize, Serialize};

/// A coordinate reference system, as written by the user and as a PROJ.4 definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Crs {
    name: String,
    proj4: String,
}

impl Crs {
    /// Parse `"EPSG:<code>"` for the supported codes, or a raw `+proj=...` definition.
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if spec.starts_with("+proj=") {
            return Ok(Self { name: spec.to_string(), proj4: spec.to_string() })
        }

        let code = spec.strip_prefix("EPSG:")
            .or_else(|| spec.strip_prefix("epsg:"))
            .ok_or_else(|| anyhow!("[geom::proj] Unrecognized CRS {spec:?}; expected EPSG:<code> or a PROJ.4 string"))?
            .parse::<u32>()
            .with_context(|| format!("[geom::proj] Invalid EPSG code in {spec:?}"))?;

        Self::from_epsg(code)
    }

    /// Look up the PROJ.4 definition of a supported EPSG code.
    pub fn from_epsg(code: u32) -> Result<Self> {
        let proj4 = epsg_proj4(code)
            .ok_or_else(|| anyhow!("[geom::proj] EPSG:{code} is not supported; pass a PROJ.4 string instead"))?;
        Ok(Self { name: format!("EPSG:{code}"), proj4: proj4.to_string() })
    }

    /// WGS84 longitude/latitude.
    pub fn wgs84() -> Self { Self::known(4326) }

    /// SVY21 / Singapore TM, in metres.
    pub fn svy21() -> Self { Self::known(3414) }

    fn known(code: u32) -> Self {
        Self {
            name: format!("EPSG:{code}"),
            proj4: epsg_proj4(code).unwrap_or_default().to_string(),
        }
    }

    #[inline] pub fn name(&self) -> &str { &self.name }

    #[inline] pub fn proj4(&self) -> &str { &self.proj4 }

    /// Geographic frames take and return angles rather than planar metres.
    #[inline]
    pub fn is_geographic(&self) -> bool {
        self.proj4.contains("+proj=longlat") || self.proj4.contains("+proj=latlong")
    }
}

/// PROJ.4 definitions of the EPSG codes this crate knows about.
fn epsg_proj4(code: u32) -> Option<&'static str> {
    match code {
        4326 => Some("+proj=longlat +datum=WGS84 +no_defs +type=crs"),
        4269 => Some("+proj=longlat +datum=NAD83 +no_defs +type=crs"),
        3414 => Some("+proj=tmerc +lat_0=1.36666666666667 +lon_0=103.833333333333 +k=1 \
                      +x_0=28001.642 +y_0=38744.572 +ellps=WGS84 +units=m +no_defs +type=crs"),
        3857 => Some("+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 \
                      +units=m +no_defs +type=crs"),
        _ => None,
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl TryFrom<String> for Crs {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> { Self::parse(&value) }
}

impl From<Crs> for String {
    fn from(crs: Crs) -> Self { crs.name }
}

/// Maps geometries from one CRS into another.
pub struct Reprojector {
    from: Proj4,
    to: Proj4,
    from_geographic: bool,
    to_geographic: bool,
    identity: bool,
}

impl Reprojector {
    pub fn new(from: &Crs, to: &Crs) -> Result<Self> {
        Ok(Self {
            from: Proj4::from_proj_string(from.proj4())
                .with_context(|| anyhow!("failed to build source PROJ.4: {}", from.proj4()))?,
            to: Proj4::from_proj_string(to.proj4())
                .with_context(|| anyhow!("failed to build target PROJ.4: {}", to.proj4()))?,
            from_geographic: from.is_geographic(),
            to_geographic: to.is_geographic(),
            identity: from.proj4() == to.proj4(),
        })
    }

    /// Reproject a single coordinate; geographic frames are in degrees on both ends.
    pub fn coord(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        if self.identity { return Ok(coord) }

        let mut point = if self.from_geographic {
            (coord.x.to_radians(), coord.y.to_radians(), 0.0)
        } else {
            (coord.x, coord.y, 0.0)
        };
        transform(&self.from, &self.to, &mut point)
            .map_err(|e| anyhow!("[geom::proj] CRS transform failed at ({}, {}): {e:?}", coord.x, coord.y))?;

        Ok(if self.to_geographic {
            Coord { x: point.0.to_degrees(), y: point.1.to_degrees() }
        } else {
            Coord { x: point.0, y: point.1 }
        })
    }

    /// Reproject every vertex of a MultiPolygon.
    pub fn multipolygon(&self, shape: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        if self.identity { return Ok(shape.clone()) }
        shape.try_map_coords(|coord| self.coord(coord))
    }
}

#[cfg(test)]
mod tests {
    use geo::{coord, polygon, Area, MultiPolygon};

    use super::*;

    #[test]
    fn parses_epsg_codes_and_proj_strings() {
        let svy21 = Crs::parse("EPSG:3414").unwrap();
        assert_eq!(svy21.name(), "EPSG:3414");
        assert!(!svy21.is_geographic());
        assert!(Crs::parse("epsg:4326").unwrap().is_geographic());

        let raw = Crs::parse("+proj=utm +zone=48 +datum=WGS84 +units=m +no_defs").unwrap();
        assert_eq!(raw.proj4(), raw.name());

        assert!(Crs::parse("EPSG:99999").is_err());
        assert!(Crs::parse("mercator").is_err());
    }

    #[test]
    fn deserializes_from_string() {
        let crs: Crs = serde_json::from_str("\"EPSG:4326\"").unwrap();
        assert_eq!(crs, Crs::wgs84());
        assert_eq!(serde_json::to_string(&crs).unwrap(), "\"EPSG:4326\"");
    }

    #[test]
    fn identity_leaves_geometry_untouched() {
        let crs = Crs::parse("EPSG:3414").unwrap();
        let reproject = Reprojector::new(&crs, &crs).unwrap();
        let shape = MultiPolygon(vec![polygon![(x: 1.0, y: 2.0), (x: 3.0, y: 2.0), (x: 3.0, y: 4.0), (x: 1.0, y: 2.0)]]);
        assert_eq!(reproject.multipolygon(&shape).unwrap(), shape);
    }

    #[test]
    fn svy21_false_origin_maps_to_projection_center() {
        let wgs84 = Crs::wgs84();
        let svy21 = Crs::parse("EPSG:3414").unwrap();
        let forward = Reprojector::new(&wgs84, &svy21).unwrap();

        let projected = forward.coord(coord! { x: 103.833333333333, y: 1.36666666666667 }).unwrap();
        assert!((projected.x - 28001.642).abs() < 0.01, "x = {}", projected.x);
        assert!((projected.y - 38744.572).abs() < 0.01, "y = {}", projected.y);

        let back = Reprojector::new(&svy21, &wgs84).unwrap().coord(projected).unwrap();
        assert!((back.x - 103.833333333333).abs() < 1e-9);
        assert!((back.y - 1.36666666666667).abs() < 1e-9);
    }

    #[test]
    fn projected_area_is_in_square_metres() {
        // Roughly 0.001° square near the equator: about 111 m on a side.
        let shape = MultiPolygon(vec![polygon![
            (x: 103.800, y: 1.300),
            (x: 103.801, y: 1.300),
            (x: 103.801, y: 1.301),
            (x: 103.800, y: 1.301),
            (x: 103.800, y: 1.300),
        ]]);
        let forward = Reprojector::new(&Crs::wgs84(), &Crs::parse("EPSG:3414").unwrap()).unwrap();
        let area = forward.multipolygon(&shape).unwrap().unsigned_area();
        assert!((12_000.0..13_000.0).contains(&area), "area = {area}");
    }
}
