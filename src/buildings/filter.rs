use log::info;

use crate::buildings::Building;

/// Keep only buildings whose land-use classification is exactly `label` (case-sensitive).
pub fn filter_residential(buildings: &[Building], label: &str) -> Vec<Building> {
    let residential = buildings.iter()
        .filter(|building| building.building_type.as_deref() == Some(label))
        .cloned()
        .collect::<Vec<_>>();

    info!("[filter] kept {} of {} buildings labelled {label:?}", residential.len(), buildings.len());
    residential
}

#[cfg(test)]
mod tests {
    use geo::MultiPolygon;

    use super::*;

    fn building(building_type: Option<&str>) -> Building {
        Building {
            geometry: MultiPolygon(vec![]),
            building_type: building_type.map(str::to_string),
            building_levels: 1.0,
            floor_area: 10.0,
            subzone: "Bedok North".into(),
        }
    }

    #[test]
    fn exact_label_match_only() {
        let buildings = vec![
            building(Some("RESIDENTIAL")),
            building(Some("Residential")),
            building(Some("COMMERCIAL")),
            building(None),
            building(Some("RESIDENTIAL")),
        ];
        let residential = filter_residential(&buildings, "RESIDENTIAL");
        assert_eq!(residential.len(), 2);
        assert!(residential.iter().all(|b| b.building_type.as_deref() == Some("RESIDENTIAL")));
        assert_eq!(buildings.len(), 5, "input is left untouched");
    }
}
