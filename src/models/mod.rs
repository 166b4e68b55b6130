//! Core data models for neighborhood resolution.

pub mod region;
pub mod restaurant;

pub use region::{Lookup, NeighborhoodMatch, Region, RegionSet};
pub use restaurant::Restaurant;
