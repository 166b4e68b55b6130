//! Coordinate validation and the ray-casting containment test.

use geo::Coord;
use serde::Deserialize;

/// Check that a longitude/latitude pair is a usable WGS84 coordinate
pub fn validate_coordinate(lon: f64, lat: f64) -> bool {
    !lon.is_nan()
        && !lat.is_nan()
        && (-180.0..=180.0).contains(&lon)
        && (-90.0..=90.0).contains(&lat)
}

/// Validate an optional coordinate pair, as read from a record
pub fn checked_coordinate(lon: Option<f64>, lat: Option<f64>) -> Option<Coord<f64>> {
    match (lon, lat) {
        (Some(x), Some(y)) if validate_coordinate(x, y) => Some(Coord { x, y }),
        _ => None,
    }
}

/// Even-odd ray casting test against a single ring.
///
/// The ring is implicitly closed (last vertex connects back to the first).
/// Points lying exactly on an edge or vertex get whatever the crossing rule
/// yields; the comparison operators below must not change, since existing
/// assignments of borderline points depend on them.
pub fn point_in_ring(point: Coord<f64>, ring: &[Coord<f64>]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let Coord { x, y } = point;
    let mut inside = false;
    let mut j = ring.len() - 1;

    for i in 0..ring.len() {
        let Coord { x: xi, y: yi } = ring[i];
        let Coord { x: xj, y: yj } = ring[j];

        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Coarse lat/lon envelope of the operating area.
///
/// Used to skip polygon testing for points that are clearly elsewhere. Being
/// inside the envelope says nothing about being inside any region.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ServiceArea {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl ServiceArea {
    /// Rough New York City bounds
    pub const NEW_YORK: ServiceArea = ServiceArea {
        min_lon: -74.3,
        max_lon: -73.7,
        min_lat: 40.4,
        max_lat: 40.9,
    };

    /// Inclusive bounding-box test
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }
}

impl Default for ServiceArea {
    fn default() -> Self {
        Self::NEW_YORK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f64, f64)]) -> Vec<Coord<f64>> {
        points.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    #[test]
    fn test_square_containment() {
        let square = ring(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        assert!(point_in_ring(Coord { x: 5.0, y: 5.0 }, &square));
        assert!(!point_in_ring(Coord { x: 15.0, y: 15.0 }, &square));
        assert!(!point_in_ring(Coord { x: -1.0, y: 5.0 }, &square));
        assert!(!point_in_ring(Coord { x: 5.0, y: -0.5 }, &square));
    }

    #[test]
    fn test_explicitly_closed_ring_matches_open_ring() {
        let open = ring(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        let closed = ring(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)]);
        for p in [(5.0, 5.0), (9.9, 0.1), (11.0, 5.0), (5.0, 10.5)] {
            let point = Coord { x: p.0, y: p.1 };
            assert_eq!(point_in_ring(point, &open), point_in_ring(point, &closed));
        }
    }

    #[test]
    fn test_concave_ring() {
        // U shape opening upwards
        let u = ring(&[
            (0.0, 0.0),
            (6.0, 0.0),
            (6.0, 6.0),
            (4.0, 6.0),
            (4.0, 2.0),
            (2.0, 2.0),
            (2.0, 6.0),
            (0.0, 6.0),
        ]);
        assert!(point_in_ring(Coord { x: 1.0, y: 4.0 }, &u));
        assert!(point_in_ring(Coord { x: 5.0, y: 4.0 }, &u));
        assert!(point_in_ring(Coord { x: 3.0, y: 1.0 }, &u));
        assert!(!point_in_ring(Coord { x: 3.0, y: 4.0 }, &u));
    }

    #[test]
    fn test_bowtie_follows_even_odd_rule() {
        // Self-intersecting ring; the two lobes are inside, nothing is validated
        let bowtie = ring(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0)]);
        assert!(point_in_ring(Coord { x: 0.5, y: 2.0 }, &bowtie));
        assert!(point_in_ring(Coord { x: 3.5, y: 2.0 }, &bowtie));
        assert!(!point_in_ring(Coord { x: 2.0, y: 3.5 }, &bowtie));
    }

    #[test]
    fn test_boundary_points_follow_crossing_rule() {
        let square = ring(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        // Left edge counts as inside, right edge and top edge do not
        assert!(point_in_ring(Coord { x: 0.0, y: 5.0 }, &square));
        assert!(!point_in_ring(Coord { x: 10.0, y: 5.0 }, &square));
        assert!(!point_in_ring(Coord { x: 5.0, y: 10.0 }, &square));
        assert!(point_in_ring(Coord { x: 5.0, y: 0.0 }, &square));
    }

    #[test]
    fn test_degenerate_rings_contain_nothing() {
        let origin = Coord { x: 0.0, y: 0.0 };
        assert!(!point_in_ring(origin, &[]));
        assert!(!point_in_ring(origin, &ring(&[(0.0, 0.0)])));
        assert!(!point_in_ring(origin, &ring(&[(-1.0, -1.0), (1.0, 1.0)])));
    }

    #[test]
    fn test_validate_coordinate() {
        assert!(!validate_coordinate(200.0, 45.0));
        assert!(!validate_coordinate(-74.0, 95.0));
        assert!(validate_coordinate(-74.0, 40.0));
        assert!(!validate_coordinate(f64::NAN, 40.0));
        assert!(!validate_coordinate(-74.0, f64::NAN));
        assert!(!validate_coordinate(f64::INFINITY, 40.0));
        assert!(validate_coordinate(180.0, -90.0));
    }

    #[test]
    fn test_checked_coordinate() {
        assert_eq!(
            checked_coordinate(Some(-74.0), Some(40.0)),
            Some(Coord { x: -74.0, y: 40.0 })
        );
        assert_eq!(checked_coordinate(None, Some(40.0)), None);
        assert_eq!(checked_coordinate(Some(-74.0), Some(91.0)), None);
    }

    #[test]
    fn test_service_area_bounds_are_inclusive() {
        let area = ServiceArea::default();
        assert!(area.contains(-74.3, 40.4));
        assert!(area.contains(-73.7, 40.9));
        assert!(area.contains(-74.005, 40.745));
        assert!(!area.contains(-71.0589, 42.3601));
        assert!(!area.contains(0.0, 0.0));
    }
}
