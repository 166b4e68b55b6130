//! Neighborhood region types for PIP lookup.

use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};

/// A named neighborhood polygon grouped under a borough.
///
/// Only the outer ring of the source polygon is kept; holes are not modelled.
#[derive(Debug, Clone)]
pub struct Region {
    /// Neighborhood name (e.g. "Chelsea")
    pub name: String,

    /// Parent grouping (e.g. "Manhattan")
    pub group: String,

    /// Opaque group identifier passed through from the source data
    pub group_code: Option<String>,

    /// Outer ring, implicitly closed
    pub boundary: LineString<f64>,
}

impl Region {
    pub fn new(name: impl Into<String>, group: impl Into<String>, boundary: Vec<Coord<f64>>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            group_code: None,
            boundary: LineString::new(boundary),
        }
    }

    pub fn with_group_code(mut self, code: impl Into<String>) -> Self {
        self.group_code = Some(code.into());
        self
    }

    /// Ring vertices in source order
    pub fn vertices(&self) -> &[Coord<f64>] {
        &self.boundary.0
    }

    /// A ring with fewer than three vertices can never contain a point
    pub fn is_degenerate(&self) -> bool {
        self.boundary.0.len() < 3
    }

    pub fn to_match(&self) -> NeighborhoodMatch {
        NeighborhoodMatch {
            name: self.name.clone(),
            group: self.group.clone(),
            group_code: self.group_code.clone(),
        }
    }
}

/// Ordered collection of regions.
///
/// Order is significant: when regions overlap, the earliest one wins.
#[derive(Debug, Clone, Default)]
pub struct RegionSet {
    regions: Vec<Region>,
}

impl RegionSet {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    pub fn push(&mut self, region: Region) {
        self.regions.push(region);
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Region> {
        self.regions.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    /// Number of regions whose boundary cannot match anything
    pub fn degenerate_count(&self) -> usize {
        self.regions.iter().filter(|r| r.is_degenerate()).count()
    }

    /// Keep only regions in the given group (case-insensitive), preserving order
    pub fn filter_group(&self, group: &str) -> RegionSet {
        let wanted = group.to_lowercase();
        Self {
            regions: self
                .regions
                .iter()
                .filter(|r| r.group.to_lowercase() == wanted)
                .cloned()
                .collect(),
        }
    }
}

impl FromIterator<Region> for RegionSet {
    fn from_iter<I: IntoIterator<Item = Region>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Labels returned when a point falls inside a region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborhoodMatch {
    pub name: String,
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_code: Option<String>,
}

/// Outcome of resolving a raw coordinate pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Lookup {
    Matched(NeighborhoodMatch),
    /// Valid coordinate not contained by any region
    NoMatch,
    /// Missing, NaN or out-of-range coordinate
    InvalidCoordinate,
}

impl Lookup {
    pub fn matched(&self) -> Option<&NeighborhoodMatch> {
        match self {
            Lookup::Matched(m) => Some(m),
            _ => None,
        }
    }

    pub fn into_match(self) -> Option<NeighborhoodMatch> {
        match self {
            Lookup::Matched(m) => Some(m),
            _ => None,
        }
    }
}
