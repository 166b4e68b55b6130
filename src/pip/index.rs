//! Spatial index for narrowing neighborhood candidates.

use geo::BoundingRect;
use rstar::{RTree, RTreeObject, AABB};
use tracing::info;

use crate::models::RegionSet;

/// Bounding box of one region, keyed by its position in the set
#[derive(Debug, Clone)]
struct IndexedRegion {
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedRegion {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree over region envelopes.
///
/// Only answers "which regions could contain this point". Candidates are
/// returned in set order so first-match precedence stays identical to a
/// linear scan.
pub struct RegionIndex {
    tree: RTree<IndexedRegion>,
}

impl RegionIndex {
    /// Build the index for a region set. Degenerate rings are left out.
    pub fn build(regions: &RegionSet) -> Self {
        let indexed: Vec<IndexedRegion> = regions
            .iter()
            .enumerate()
            .filter(|(_, region)| !region.is_degenerate())
            .filter_map(|(position, region)| {
                let rect = region.boundary.bounding_rect()?;
                Some(IndexedRegion {
                    position,
                    envelope: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                })
            })
            .collect();

        let tree = RTree::bulk_load(indexed);
        info!("Spatial index built with {} of {} neighborhoods", tree.size(), regions.len());

        Self { tree }
    }

    /// Positions of regions whose envelope contains the point, ascending
    pub fn candidates(&self, lon: f64, lat: f64) -> Vec<usize> {
        let query_envelope = AABB::from_point([lon, lat]);

        let mut positions: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&query_envelope)
            .map(|ir| ir.position)
            .collect();
        positions.sort_unstable();
        positions
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
