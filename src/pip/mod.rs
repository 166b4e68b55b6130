//! Point-in-Polygon (PIP) neighborhood lookup.
//!
//! Loads neighborhood boundaries from GeoJSON and resolves points to the
//! first containing neighborhood, using an R-tree to narrow candidates.

mod boundary;
mod geometry;
mod index;
mod service;

pub use boundary::{load_regions, parse_regions, RegionError};
pub use geometry::{checked_coordinate, point_in_ring, validate_coordinate, ServiceArea};
pub use index::RegionIndex;
pub use service::{resolve, NeighborhoodResolver};
