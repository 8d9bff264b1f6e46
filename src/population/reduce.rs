use ahash::AHashMap;
use geo::MultiPolygon;
use log::info;

use crate::{common::parse_age_lower_bound, config::UnparsedBracket, population::{AllocatedPopulation, ReducedPopulation}};

/// Inclusive range of ages; `max_age: None` leaves it open above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeWindow {
    pub min_age: u32,
    pub max_age: Option<u32>,
}

impl AgeWindow {
    pub fn new(min_age: u32, max_age: Option<u32>) -> Self { Self { min_age, max_age } }

    /// Every age from `min_age` upwards.
    pub fn from_age(min_age: u32) -> Self { Self::new(min_age, None) }

    /// Every age.
    pub fn all() -> Self { Self::from_age(0) }

    #[inline]
    pub fn contains(&self, age: u32) -> bool {
        age >= self.min_age && self.max_age.is_none_or(|max_age| age <= max_age)
    }
}

/// Identity of a building across its bracket records.
/// Floats and coordinates are compared by bit pattern.
#[derive(PartialEq, Eq, Hash)]
struct BuildingKey<'a> {
    building_levels: u64,
    floor_area: u64,
    planning_area: &'a str,
    subzone: &'a str,
    geometry: Vec<u64>,
}

impl<'a> BuildingKey<'a> {
    fn of(record: &'a AllocatedPopulation) -> Self {
        Self {
            building_levels: record.building.building_levels.to_bits(),
            floor_area: record.building.floor_area.to_bits(),
            planning_area: &record.planning_area,
            subzone: &record.building.subzone,
            geometry: geometry_bits(&record.building.geometry),
        }
    }
}

/// Flatten a MultiPolygon into coordinate bits, with ring lengths as separators.
fn geometry_bits(shape: &MultiPolygon<f64>) -> Vec<u64> {
    let mut bits = Vec::new();
    for polygon in &shape.0 {
        bits.push(polygon.interiors().len() as u64);
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            bits.push(ring.0.len() as u64);
            bits.extend(ring.coords().flat_map(|c| [c.x.to_bits(), c.y.to_bits()]));
        }
    }
    bits
}

/// Sum allocated population per building over the brackets whose lower bound falls in `window`.
///
/// Buildings are grouped by levels, floor area, planning area, subzone and
/// geometry, and come out in the order they first appear. Brackets that do
/// not parse are handled according to `unparsed`.
pub fn reduce_by_age(records: &[AllocatedPopulation], window: AgeWindow, unparsed: UnparsedBracket) -> Vec<ReducedPopulation> {
    let mut index: AHashMap<BuildingKey, usize> = AHashMap::new();
    let mut reduced: Vec<ReducedPopulation> = Vec::new();

    let retained = records.iter().filter(|record| {
        let lower_bound = match (parse_age_lower_bound(&record.age_bracket), unparsed) {
            (Some(age), _) => age,
            (None, UnparsedBracket::AgeZero) => 0,
            (None, UnparsedBracket::Exclude) => return false,
        };
        window.contains(lower_bound)
    });

    let mut kept = 0;
    for record in retained {
        kept += 1;
        let i = *index.entry(BuildingKey::of(record)).or_insert_with(|| {
            reduced.push(ReducedPopulation {
                geometry: record.building.geometry.clone(),
                building_levels: record.building.building_levels,
                floor_area: record.building.floor_area,
                planning_area: record.planning_area.clone(),
                subzone: record.building.subzone.clone(),
                allocated_population: 0.0,
            });
            reduced.len() - 1
        });
        reduced[i].allocated_population += record.allocated_population;
    }

    info!(
        "[reduce] ages {}..{}: kept {kept} of {} records, {} buildings",
        window.min_age,
        window.max_age.map_or("".to_string(), |max_age| format!("={max_age}")),
        records.len(),
        reduced.len(),
    );
    reduced
}
