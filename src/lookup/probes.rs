//! Named probe coordinates for spot-checking a boundary file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use nabe::models::Lookup;
use nabe::pip::ServiceArea;
use nabe::NeighborhoodResolver;

#[derive(Debug, Deserialize)]
struct ProbeFile {
    #[serde(rename = "probe", default)]
    probes: Vec<Probe>,
}

/// A labelled coordinate to resolve
#[derive(Debug, Clone, Deserialize)]
pub struct Probe {
    pub name: String,
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Serialize)]
pub struct ProbeResult {
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    pub in_service_area: bool,
    pub lookup: Lookup,
}

impl ProbeResult {
    /// One-line human readable form
    pub fn describe(&self) -> String {
        let outcome = match &self.lookup {
            Lookup::Matched(m) => format!("{}, {}", m.name, m.group),
            Lookup::NoMatch => "no neighborhood found".to_string(),
            Lookup::InvalidCoordinate => "invalid coordinate".to_string(),
        };
        let area = if self.in_service_area {
            ""
        } else {
            " [outside service area]"
        };
        format!("{} ({}, {}) -> {}{}", self.name, self.lon, self.lat, outcome, area)
    }
}

pub fn load_probes(path: &Path) -> Result<Vec<Probe>> {
    let content = fs::read_to_string(path).context("Failed to read probe file")?;
    parse_probes(&content)
}

pub fn parse_probes(content: &str) -> Result<Vec<Probe>> {
    let file: ProbeFile = toml::from_str(content).context("Failed to parse probe file")?;
    Ok(file.probes)
}

pub fn run_probe(probe: &Probe, resolver: &NeighborhoodResolver, area: &ServiceArea) -> ProbeResult {
    ProbeResult {
        name: probe.name.clone(),
        lon: probe.lon,
        lat: probe.lat,
        in_service_area: area.contains(probe.lon, probe.lat),
        lookup: resolver.lookup(probe.lon, probe.lat),
    }
}
