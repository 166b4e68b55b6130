//! PIP service for resolving the neighborhood of a point.

use geo::Coord;
use tracing::debug;

use super::geometry::{point_in_ring, validate_coordinate};
use super::RegionIndex;
use crate::models::{Lookup, NeighborhoodMatch, RegionSet};

/// Resolve a point against a region set by scanning it in order.
///
/// Returns the first region whose ring contains the point, or `None` for an
/// invalid coordinate or when no region matches.
pub fn resolve(lon: f64, lat: f64, regions: &RegionSet) -> Option<NeighborhoodMatch> {
    if !validate_coordinate(lon, lat) {
        return None;
    }

    let point = Coord { x: lon, y: lat };
    regions
        .iter()
        .find(|region| point_in_ring(point, region.vertices()))
        .map(|region| region.to_match())
}

/// Neighborhood lookup service over a fixed, read-only region set.
///
/// Safe to share across threads; lookups never mutate anything.
pub struct NeighborhoodResolver {
    regions: RegionSet,
    index: RegionIndex,
}

impl NeighborhoodResolver {
    pub fn new(regions: RegionSet) -> Self {
        let index = RegionIndex::build(&regions);
        Self { regions, index }
    }

    /// Resolve a coordinate pair, keeping invalid input distinct from a miss
    pub fn lookup(&self, lon: f64, lat: f64) -> Lookup {
        if !validate_coordinate(lon, lat) {
            return Lookup::InvalidCoordinate;
        }

        let point = Coord { x: lon, y: lat };
        let candidates = self.index.candidates(lon, lat);

        let found = candidates
            .iter()
            .filter_map(|&position| self.regions.get(position))
            .find(|region| point_in_ring(point, region.vertices()));

        debug!(
            "PIP lookup at ({}, {}): {} candidates, matched {:?}",
            lon,
            lat,
            candidates.len(),
            found.map(|r| r.name.as_str())
        );

        match found {
            Some(region) => Lookup::Matched(region.to_match()),
            None => Lookup::NoMatch,
        }
    }

    /// Same as [`resolve`], via the index
    pub fn resolve(&self, lon: f64, lat: f64) -> Option<NeighborhoodMatch> {
        self.lookup(lon, lat).into_match()
    }

    pub fn regions(&self) -> &RegionSet {
        &self.regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Region;

    fn region(name: &str, group: &str, ring: &[[f64; 2]]) -> Region {
        Region::new(name, group, ring.iter().map(|&[x, y]| Coord { x, y }).collect())
    }

    fn nyc() -> RegionSet {
        vec![
            region(
                "Chelsea",
                "Manhattan",
                &[[-74.01, 40.74], [-74.01, 40.75], [-74.00, 40.75], [-74.00, 40.74]],
            ),
            region(
                "Williamsburg",
                "Brooklyn",
                &[[-73.96, 40.71], [-73.96, 40.72], [-73.95, 40.72], [-73.95, 40.71]],
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let resolver = NeighborhoodResolver::new(nyc());

        let chelsea = resolver.lookup(-74.005, 40.745);
        let m = chelsea.matched().unwrap();
        assert_eq!(m.name, "Chelsea");
        assert_eq!(m.group, "Manhattan");

        assert_eq!(resolver.lookup(-73.955, 40.715).matched().unwrap().name, "Williamsburg");
        assert_eq!(resolver.lookup(-73.5, 40.5), Lookup::NoMatch);
        assert_eq!(resolver.lookup(f64::NAN, 40.5), Lookup::InvalidCoordinate);
        assert_ne!(resolver.lookup(f64::NAN, 40.5), resolver.lookup(-73.5, 40.5));
    }

    #[test]
    fn test_linear_resolve_matches_scenario() {
        let regions = nyc();
        assert_eq!(resolve(-74.005, 40.745, &regions).unwrap().name, "Chelsea");
        assert_eq!(resolve(-73.5, 40.5, &regions), None);
        assert_eq!(resolve(f64::NAN, 40.5, &regions), None);
    }

    #[test]
    fn test_square_region() {
        let square = region("Square", "G", &[[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]);
        let regions: RegionSet = vec![square].into_iter().collect();
        assert!(resolve(5.0, 5.0, &regions).is_some());
        assert!(resolve(15.0, 15.0, &regions).is_none());
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        let regions: RegionSet = vec![
            region("A", "G1", &[[0.0, 0.0], [0.0, 10.0], [10.0, 10.0], [10.0, 0.0]]),
            region("B", "G2", &[[4.0, 4.0], [4.0, 6.0], [6.0, 6.0], [6.0, 4.0]]),
        ]
        .into_iter()
        .collect();

        assert_eq!(resolve(5.0, 5.0, &regions).unwrap().name, "A");
        let resolver = NeighborhoodResolver::new(regions);
        assert_eq!(resolver.resolve(5.0, 5.0).unwrap().name, "A");

        // Reverse the order and precedence flips
        let reversed: RegionSet = resolver.regions().iter().rev().cloned().collect();
        assert_eq!(resolve(5.0, 5.0, &reversed).unwrap().name, "B");
        assert_eq!(NeighborhoodResolver::new(reversed).resolve(5.0, 5.0).unwrap().name, "B");
    }

    #[test]
    fn test_lookup_is_deterministic() {
        let resolver = NeighborhoodResolver::new(nyc());
        for (lon, lat) in [(-74.005, 40.745), (-73.5, 40.5), (-73.955, 40.715)] {
            assert_eq!(resolver.lookup(lon, lat), resolver.lookup(lon, lat));
        }
    }

    #[test]
    fn test_degenerate_region_never_matches() {
        let regions: RegionSet = vec![
            region("Line", "G", &[[0.0, 0.0], [10.0, 10.0]]),
            region("Dot", "G", &[[5.0, 5.0]]),
            region("Empty", "G", &[]),
        ]
        .into_iter()
        .collect();

        let resolver = NeighborhoodResolver::new(regions.clone());
        for (lon, lat) in [(5.0, 5.0), (0.0, 0.0), (2.0, 3.0)] {
            assert_eq!(resolve(lon, lat, &regions), None);
            assert_eq!(resolver.lookup(lon, lat), Lookup::NoMatch);
        }
    }

    #[test]
    fn test_index_agrees_with_linear_scan() {
        let regions: RegionSet = vec![
            region("Sliver", "G", &[[0.0, 0.0], [9.0, 9.0]]),
            region("Tri", "G", &[[0.0, 0.0], [8.0, 0.0], [0.0, 8.0]]),
            region("Big", "G", &[[-1.0, -1.0], [-1.0, 9.0], [9.0, 9.0], [9.0, -1.0]]),
            region("U", "H", &[[2.0, 2.0], [7.0, 2.0], [7.0, 7.0], [6.0, 7.0], [6.0, 3.0], [3.0, 3.0], [3.0, 7.0], [2.0, 7.0]]),
        ]
        .into_iter()
        .collect();
        let resolver = NeighborhoodResolver::new(regions.clone());

        for xi in -4..=40 {
            for yi in -4..=40 {
                let (lon, lat) = (xi as f64 * 0.25, yi as f64 * 0.25);
                assert_eq!(
                    resolver.resolve(lon, lat),
                    resolve(lon, lat, &regions),
                    "mismatch at ({}, {})",
                    lon,
                    lat
                );
            }
        }
    }

    #[test]
    fn test_resolver_is_shareable_across_threads() {
        let resolver = std::sync::Arc::new(NeighborhoodResolver::new(nyc()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let resolver = std::sync::Arc::clone(&resolver);
                std::thread::spawn(move || resolver.resolve(-74.005, 40.745))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap().name, "Chelsea");
        }
    }
}
