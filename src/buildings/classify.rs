use anyhow::{Context, Result};
use geo::{Area, MultiPolygon};
use log::{debug, info, warn};

use crate::{buildings::{Building, Footprint, LandUse, Subzone}, common::parse_levels, geom::{Crs, Geometries, Reprojector}};

/// Tags building footprints with land use, floor area and subzone.
///
/// Inputs share one CRS. Areas and intersections are computed in a planar
/// calculation CRS, and classified buildings come out in the output CRS.
pub struct Classifier {
    to_calculation: Reprojector,
    to_output: Reprojector,
}

/// A footprint that survived cleaning, in the calculation CRS.
struct CleanFootprint {
    geometry: MultiPolygon<f64>,
    levels: f64,
}

impl Classifier {
    pub fn new(input: &Crs, calculation: &Crs, output: &Crs) -> Result<Self> {
        Ok(Self {
            to_calculation: Reprojector::new(input, calculation)
                .with_context(|| format!("[classify] Cannot project {input} into {calculation}"))?,
            to_output: Reprojector::new(calculation, output)
                .with_context(|| format!("[classify] Cannot project {calculation} into {output}"))?,
        })
    }

    /// Classify footprints against land-use polygons and subzones.
    ///
    /// Footprints without geometry, with non-numeric levels, or with fewer than
    /// one level are dropped. Land use is a left join on "intersects": a
    /// building crossing several land-use polygons appears once per polygon,
    /// and one crossing none keeps an absent `building_type`. Subzones are an
    /// inner join on "intersects", so buildings outside every subzone are dropped.
    pub fn classify(&self, footprints: &[Footprint], landuse: &[LandUse], subzones: &[Subzone]) -> Result<Vec<Building>> {
        let cleaned = self.clean(footprints);
        debug!("[classify] dropped {} of {} footprints during cleaning", footprints.len() - cleaned.len(), footprints.len());

        let (landuse, landuse_geoms) = self.project_all(landuse, |polygon| &polygon.geometry);
        let (subzones, subzone_geoms) = self.project_all(subzones, |subzone| &subzone.geometry);
        debug!("[classify] indexed {} land-use polygons and {} subzones", landuse_geoms.len(), subzone_geoms.len());

        let mut buildings = Vec::with_capacity(cleaned.len());
        let mut unmatched_landuse = 0;
        let mut multi_landuse = 0;
        let mut outside_subzones = 0;
        let mut unprojectable = 0;

        for footprint in &cleaned {
            let floor_area = footprint.geometry.unsigned_area() * footprint.levels;

            let landuse_hits = landuse_geoms.intersecting(&footprint.geometry);
            let building_types = match landuse_hits.len() {
                0 => { unmatched_landuse += 1; vec![None] },
                1 => vec![landuse[landuse_hits[0]].landuse.clone()],
                _ => {
                    multi_landuse += 1;
                    landuse_hits.iter().map(|&i| landuse[i].landuse.clone()).collect()
                },
            };

            let subzone_hits = subzone_geoms.intersecting(&footprint.geometry);
            if subzone_hits.is_empty() {
                outside_subzones += 1;
                continue;
            }

            let Ok(geometry) = self.to_output.multipolygon(&footprint.geometry) else {
                unprojectable += 1;
                continue;
            };
            for building_type in &building_types {
                for &i in &subzone_hits {
                    buildings.push(Building {
                        geometry: geometry.clone(),
                        building_type: building_type.clone(),
                        building_levels: footprint.levels,
                        floor_area,
                        subzone: subzones[i].name.clone(),
                    });
                }
            }
        }

        debug!("[classify] {unmatched_landuse} buildings matched no land-use polygon");
        debug!("[classify] dropped {outside_subzones} buildings outside every subzone");
        debug!("[classify] dropped {unprojectable} buildings that cannot be projected into the output CRS");
        if multi_landuse > 0 {
            warn!("[classify] {multi_landuse} buildings intersect several land-use polygons and are duplicated");
        }
        info!("[classify] classified {} buildings from {} footprints", buildings.len(), footprints.len());

        Ok(buildings)
    }

    /// Drop unusable footprints and move the rest into the calculation CRS.
    ///
    /// Footprints whose coordinates fall outside the calculation projection's
    /// domain are dropped with the rest.
    fn clean(&self, footprints: &[Footprint]) -> Vec<CleanFootprint> {
        footprints.iter()
            .filter_map(|footprint| {
                let geometry = footprint.geometry.as_ref()?;
                let levels = parse_levels(footprint.levels.as_deref()?)?;
                if levels < 1.0 { return None }
                let geometry = self.to_calculation.multipolygon(geometry).ok()?;
                Some(CleanFootprint { geometry, levels })
            })
            .collect()
    }

    /// Project reference polygons into the calculation CRS, keeping only those
    /// that project. Returns the surviving items alongside their index.
    fn project_all<'a, T>(&self, items: &'a [T], geometry: impl Fn(&T) -> &MultiPolygon<f64>) -> (Vec<&'a T>, Geometries) {
        let (kept, projected): (Vec<_>, Vec<_>) = items.iter()
            .filter_map(|item| Some((item, self.to_calculation.multipolygon(geometry(item)).ok()?)))
            .unzip();
        if kept.len() < items.len() {
            debug!("[classify] dropped {} reference polygons that cannot be projected", items.len() - kept.len());
        }
        (kept, Geometries::new(projected))
    }
}
