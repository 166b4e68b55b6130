//! Spot-check tool for neighborhood boundaries.
//!
//! Resolves ad-hoc coordinates or a file of named probes against a
//! GeoJSON boundary file and prints the neighborhood each one falls in.

mod probes;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use nabe::config::Config;
use nabe::pip::load_regions;
use nabe::NeighborhoodResolver;

use crate::probes::{load_probes, run_probe, Probe, ProbeResult};

#[derive(Parser, Debug)]
#[command(name = "lookup")]
#[command(about = "Resolve coordinates to neighborhoods")]
struct Args {
    /// Neighborhood boundaries (GeoJSON FeatureCollection)
    #[arg(long)]
    regions: PathBuf,

    /// Longitude of a single point to resolve
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    lon: Option<f64>,

    /// Latitude of a single point to resolve
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    lat: Option<f64>,

    /// TOML file of [[probe]] entries with name, lon and lat
    #[arg(long)]
    probes: Option<PathBuf>,

    /// Print the first N neighborhoods in the file
    #[arg(long)]
    list: Option<usize>,

    /// Only use neighborhoods in the specified borough
    #[arg(long)]
    borough: Option<String>,

    /// Optional TOML config (service area)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit results as JSON lines
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = Config::load_or_default(args.config.as_deref())?;

    let mut regions = load_regions(&args.regions).context("Failed to load neighborhood boundaries")?;
    if let Some(borough) = &args.borough {
        regions = regions.filter_group(borough);
    }
    info!("Resolving against {} neighborhoods", regions.len());

    let resolver = NeighborhoodResolver::new(regions);

    let mut probes: Vec<Probe> = Vec::new();
    if let (Some(lon), Some(lat)) = (args.lon, args.lat) {
        probes.push(Probe {
            name: "point".to_string(),
            lon,
            lat,
        });
    }
    if let Some(path) = &args.probes {
        probes.extend(load_probes(path)?);
    }

    if probes.is_empty() && args.list.is_none() {
        anyhow::bail!("Nothing to do: pass --lon/--lat, --probes or --list");
    }

    for probe in &probes {
        let result: ProbeResult = run_probe(probe, &resolver, &config.service_area);
        if args.json {
            println!("{}", serde_json::to_string(&result)?);
        } else {
            println!("{}", result.describe());
        }
    }

    if let Some(n) = args.list {
        for region in resolver.regions().iter().take(n) {
            if args.json {
                println!("{}", serde_json::to_string(&region.to_match())?);
            } else {
                println!("  {} ({})", region.name, region.group);
            }
        }
    }

    Ok(())
}
