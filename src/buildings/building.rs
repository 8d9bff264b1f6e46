use geo::MultiPolygon;

/// A raw building outline as it arrives from the footprint layer.
/// Both fields may be missing; `levels` is the untyped attribute text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Footprint {
    pub geometry: Option<MultiPolygon<f64>>,
    pub levels: Option<String>,
}

/// A land-use polygon with the label pulled out of its description.
#[derive(Debug, Clone, PartialEq)]
pub struct LandUse {
    pub geometry: MultiPolygon<f64>,
    pub landuse: Option<String>,
}

/// An administrative subzone boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Subzone {
    pub geometry: MultiPolygon<f64>,
    pub name: String,
}

/// A building after classification: land-use label, levels, floor area and subzone.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub geometry: MultiPolygon<f64>,
    /// Land-use label of an intersecting polygon, absent when none matched.
    pub building_type: Option<String>,
    /// Always at least 1.
    pub building_levels: f64,
    /// Planar footprint area times levels, in square units of the calculation CRS.
    pub floor_area: f64,
    pub subzone: String,
}

impl Building {
    /// Copy of this building with its subzone name uppercased.
    pub(crate) fn with_uppercase_subzone(&self) -> Self {
        Self { subzone: self.subzone.to_uppercase(), ..self.clone() }
    }
}
