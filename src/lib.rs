//! nabe - neighborhood resolution for restaurant listings
//!
//! This library provides shared types and modules for the update-neighborhoods
//! and lookup binaries.

pub mod config;
pub mod discord;
pub mod models;
pub mod pip;
pub mod report;
pub mod store;

pub use models::{Lookup, NeighborhoodMatch, Region, RegionSet, Restaurant};
pub use pip::{resolve, NeighborhoodResolver, ServiceArea};
