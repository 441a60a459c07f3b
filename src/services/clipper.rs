//! Cell clipping against the neighborhood boundary
//!
//! The primary filter is centroid containment: a cell survives only if
//! its centroid lies inside the boundary. This is a point test, not an
//! area test - a cell barely overlapping the boundary passes or fails
//! depending on where its centroid falls. That matches the shipped zone
//! layout and is intentional; do not replace it with area-weighted
//! inclusion.

use geo::{Area, BooleanOps, Centroid, Contains, LineString, MultiPolygon, Polygon};

/// Clip `cell` to `boundary`, returning the zone's closed ring.
///
/// None means the cell was discarded (centroid outside the boundary).
pub fn clip(cell: &Polygon<f64>, boundary: &MultiPolygon<f64>) -> Option<LineString<f64>> {
    let centroid = cell.centroid()?;
    if !boundary.contains(&centroid) {
        return None;
    }

    let pieces = boundary.intersection(&MultiPolygon::new(vec![cell.clone()]));
    let ring = pieces
        .0
        .iter()
        .filter(|piece| piece.unsigned_area() > 0.0)
        .max_by(|a, b| {
            a.unsigned_area()
                .partial_cmp(&b.unsigned_area())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|piece| piece.exterior().clone());

    // A degenerate overlay result falls back to the untouched cell ring
    // rather than dropping the zone
    Some(ring.unwrap_or_else(|| cell.exterior().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: (f64, f64), side: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (min.0, min.1),
                (min.0 + side, min.1),
                (min.0 + side, min.1 + side),
                (min.0, min.1 + side),
                (min.0, min.1),
            ]),
            vec![],
        )
    }

    fn ring_area(ring: &LineString<f64>) -> f64 {
        Polygon::new(ring.clone(), vec![]).unsigned_area()
    }

    #[test]
    fn test_cell_with_centroid_outside_is_discarded() {
        let boundary = MultiPolygon::new(vec![square((0.0, 0.0), 1.0)]);
        // Overlaps the boundary by a sliver, centroid well outside
        let cell = square((0.9, 0.0), 1.0);
        assert!(clip(&cell, &boundary).is_none());
    }

    #[test]
    fn test_cell_fully_inside_keeps_its_ring() {
        let boundary = MultiPolygon::new(vec![square((0.0, 0.0), 10.0)]);
        let cell = square((1.0, 1.0), 2.0);

        let ring = clip(&cell, &boundary).unwrap();
        assert!((ring_area(&ring) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_straddling_cell_is_clipped_to_boundary() {
        let boundary = MultiPolygon::new(vec![square((0.0, 0.0), 1.0)]);
        // Centroid at (0.65, 0.5), inside; 30% of the cell hangs outside
        let cell = square((0.3, 0.3), 0.7);

        let ring = clip(&cell, &boundary).unwrap();
        let area = ring_area(&ring);
        assert!(area > 0.0);
        assert!(area < cell.unsigned_area());
        // Clipped extent never exceeds the boundary
        for coord in ring.coords() {
            assert!(coord.x <= 1.0 + 1e-9 && coord.y <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn test_small_boundary_inside_one_cell_yields_positive_area() {
        // Boundary entirely inside a single cell, covering its centroid
        let boundary = MultiPolygon::new(vec![square((0.1, 0.1), 0.8)]);
        let cell = square((0.0, 0.0), 1.0);

        let ring = clip(&cell, &boundary).unwrap();
        assert!(ring_area(&ring) > 0.0);
        assert!(ring.0.first() == ring.0.last());
    }
}
