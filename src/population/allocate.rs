use ahash::AHashMap;
use log::{debug, info, warn};

use crate::{buildings::Building, population::{AllocatedPopulation, CensusRow}};

/// Distribute each subzone's census counts over its residential buildings by floor area.
///
/// Buildings and census rows are joined on the uppercased subzone name. Each
/// building fans out into one record per age bracket of its subzone, with
/// `floor_area / S * population_count` where `S` is the total floor area of
/// the subzone's residential buildings. The same `S` is used for every
/// bracket. When `S` is zero every building in the subzone gets zero.
///
/// Census subzones without any residential building produce no records, so
/// their population is absent from every later stage.
pub fn allocate_population(residential: &[Building], census: &[CensusRow]) -> Vec<AllocatedPopulation> {
    let buildings = residential.iter()
        .map(Building::with_uppercase_subzone)
        .collect::<Vec<_>>();

    let mut brackets: AHashMap<String, Vec<&CensusRow>> = AHashMap::new();
    for row in census {
        brackets.entry(row.subzone.to_uppercase()).or_default().push(row);
    }

    let mut subzone_areas: AHashMap<&str, f64> = AHashMap::new();
    for building in &buildings {
        *subzone_areas.entry(building.subzone.as_str()).or_default() += building.floor_area;
    }

    let mut allocated = Vec::with_capacity(buildings.len());
    let mut without_census = 0;
    for building in &buildings {
        let Some(rows) = brackets.get(&building.subzone) else {
            without_census += 1;
            continue;
        };
        let total_area = subzone_areas.get(building.subzone.as_str()).copied().unwrap_or(0.0);

        for row in rows {
            let share = building.floor_area / total_area * row.population_count as f64;
            allocated.push(AllocatedPopulation {
                building: building.clone(),
                planning_area: row.planning_area.to_uppercase(),
                age_bracket: row.age_bracket.clone(),
                allocated_population: if share.is_finite() { share } else { 0.0 },
            });
        }
    }

    debug!("[allocate] dropped {without_census} residential buildings whose subzone has no census rows");

    let mut unserved = brackets.keys()
        .filter(|subzone| !subzone_areas.contains_key(subzone.as_str()))
        .collect::<Vec<_>>();
    if !unserved.is_empty() {
        unserved.sort();
        let lost = unserved.iter()
            .flat_map(|subzone| brackets.get(subzone.as_str()).into_iter().flatten())
            .map(|row| row.population_count)
            .sum::<u64>();
        warn!("[allocate] {} census subzones have no residential buildings; {lost} people are not allocated: {unserved:?}", unserved.len());
    }
    info!("[allocate] allocated population to {} building-bracket records", allocated.len());

    allocated
}
