//! Neighborhood backfill for restaurant listings.
//!
//! Loads neighborhood boundaries, resolves each restaurant's coordinates to
//! a neighborhood, and writes the labels back to the restaurant store.

mod batch;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use nabe::config::Config;
use nabe::discord::DiscordWebhook;
use nabe::pip::{load_regions, NeighborhoodResolver};
use nabe::report::RunLog;
use nabe::store::RestaurantStore;

use crate::batch::Options;

#[derive(Parser, Debug)]
#[command(name = "update-neighborhoods")]
#[command(about = "Assign neighborhoods to restaurants from their coordinates")]
struct Args {
    /// Restaurant store (JSON array of restaurants)
    #[arg(short, long)]
    restaurants: PathBuf,

    /// Neighborhood boundaries (GeoJSON FeatureCollection)
    #[arg(long)]
    regions: PathBuf,

    /// Optional TOML config (service area, placeholder city names)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show what would be updated without making changes
    #[arg(long)]
    dry_run: bool,

    /// Don't update the city field with the borough
    #[arg(long)]
    no_update_city: bool,

    /// Append detailed logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Only use neighborhoods in the specified borough
    #[arg(long)]
    borough: Option<String>,

    /// Update restaurants that already have a neighborhood
    #[arg(long)]
    force_update: bool,

    /// Discord webhook URL for a run summary (optional)
    #[arg(long)]
    discord_webhook: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = Config::load_or_default(args.config.as_deref())?;

    let mut log = match &args.log_file {
        Some(path) => RunLog::open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?,
        None => RunLog::console(),
    };

    let mut regions = load_regions(&args.regions).context("Failed to load neighborhood boundaries")?;
    log.info(&format!(
        "Loaded {} neighborhoods from {}",
        regions.len(),
        args.regions.display()
    ));

    if let Some(borough) = &args.borough {
        regions = regions.filter_group(borough);
        log.info(&format!(
            "Filtered to {} neighborhoods in {}",
            regions.len(),
            borough
        ));
        if regions.is_empty() {
            warn!("No neighborhoods match borough {}", borough);
        }
    }

    let resolver = NeighborhoodResolver::new(regions);

    let mut store = RestaurantStore::open(&args.restaurants).context("Failed to open restaurant store")?;

    let options = Options {
        dry_run: args.dry_run,
        update_city: !args.no_update_city,
        skip_existing: !args.force_update,
        generic_cities: config.driver.generic_cities.clone(),
    };

    let summary = batch::run(&mut store, &resolver, &config.service_area, &options, &mut log);

    if !options.dry_run && summary.updated > 0 {
        store.save().context("Failed to save restaurant store")?;
    }

    log.info("Summary:");
    for line in summary.lines("service area") {
        log.info(&line);
    }
    if options.dry_run {
        log.info("This was a DRY RUN - no changes were made to the restaurant store");
    }

    log.finish().context("Failed to finalize log file")?;

    if let Some(url) = &args.discord_webhook {
        let source = args.restaurants.display().to_string();
        if let Err(e) = DiscordWebhook::new(url.clone())
            .send_summary(&source, &summary, options.dry_run)
            .await
        {
            warn!("Failed to send run summary: {:#}", e);
        }
    }

    info!("Done");
    Ok(())
}
