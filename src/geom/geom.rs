use geo::{BoundingRect, Intersects, MultiPolygon};
use rstar::RTree;

use crate::geom::BoundingBox;

/// An indexed collection of MultiPolygons supporting "intersects" lookups.
#[derive(Debug, Clone)]
pub(crate) struct Geometries {
    shapes: Vec<MultiPolygon<f64>>,
    rtree: RTree<BoundingBox>,
}

impl Geometries {
    /// Construct a Geometries object from a vector of MultiPolygons.
    /// Empty shapes have no bounding rectangle and are never matched.
    pub(crate) fn new(shapes: Vec<MultiPolygon<f64>>) -> Self {
        Self {
            rtree: RTree::bulk_load(
                shapes.iter().enumerate()
                    .filter_map(|(i, shape)| shape.bounding_rect().map(|rect| BoundingBox::new(i, rect)))
                    .collect()
            ),
            shapes,
        }
    }

    /// Get the number of MultiPolygons.
    #[inline] pub(crate) fn len(&self) -> usize { self.shapes.len() }

    /// Indices of all shapes intersecting `shape`, in ascending order.
    /// Bounding boxes prefilter the candidates; the exact predicate decides.
    pub(crate) fn intersecting(&self, shape: &MultiPolygon<f64>) -> Vec<usize> {
        let Some(rect) = shape.bounding_rect() else { return Vec::new() };

        let mut hits = self.rtree
            .locate_in_envelope_intersecting(&BoundingBox::envelope_of(&rect))
            .map(|bbox| bbox.idx())
            .filter(|&i| self.shapes[i].intersects(shape))
            .collect::<Vec<_>>();
        hits.sort_unstable();
        hits
    }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::Geometries;

    fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
            (x: x, y: y),
        ]])
    }

    #[test]
    fn finds_overlapping_shapes_in_order() {
        let geoms = Geometries::new(vec![
            square(10.0, 10.0, 5.0),
            square(0.0, 0.0, 4.0),
            square(3.0, 3.0, 4.0),
        ]);
        assert_eq!(geoms.len(), 3);
        assert_eq!(geoms.intersecting(&square(2.0, 2.0, 2.0)), vec![1, 2]);
    }

    #[test]
    fn bounding_box_overlap_alone_is_not_a_match() {
        // L-shaped neighbour: bounding boxes overlap, polygons do not.
        let ell = MultiPolygon(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 1.0),
            (x: 1.0, y: 1.0),
            (x: 1.0, y: 10.0),
            (x: 0.0, y: 10.0),
            (x: 0.0, y: 0.0),
        ]]);
        let geoms = Geometries::new(vec![ell]);
        assert!(geoms.intersecting(&square(5.0, 5.0, 2.0)).is_empty());
    }

    #[test]
    fn touching_edges_intersect() {
        let geoms = Geometries::new(vec![square(0.0, 0.0, 1.0)]);
        assert_eq!(geoms.intersecting(&square(1.0, 0.0, 1.0)), vec![0]);
    }

    #[test]
    fn empty_shapes_are_skipped() {
        let geoms = Geometries::new(vec![MultiPolygon(vec![])]);
        assert_eq!(geoms.len(), 1);
        assert!(geoms.intersecting(&square(0.0, 0.0, 1.0)).is_empty());
        assert!(Geometries::new(vec![square(0.0, 0.0, 1.0)]).intersecting(&MultiPolygon(vec![])).is_empty());
    }
}
