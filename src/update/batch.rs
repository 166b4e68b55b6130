//! Neighborhood backfill over the restaurant store.

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use nabe::models::{Lookup, NeighborhoodMatch, Restaurant};
use nabe::pip::{checked_coordinate, NeighborhoodResolver, ServiceArea};
use nabe::report::{RunLog, RunSummary};
use nabe::store::{Record, RestaurantStore};

/// Policy knobs for one run
#[derive(Debug, Clone)]
pub struct Options {
    /// Report intended changes without touching records
    pub dry_run: bool,
    /// Replace placeholder cities with the matched borough
    pub update_city: bool,
    /// Leave restaurants that already have a neighborhood alone
    pub skip_existing: bool,
    pub generic_cities: Vec<String>,
}

/// What resolution decided for one restaurant
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Update {
        neighborhood: NeighborhoodMatch,
        /// New city value, when the current one is a placeholder
        city: Option<String>,
    },
    NotFound,
    InvalidCoordinates,
    OutsideArea,
}

/// Classify a restaurant without modifying it
pub fn classify(
    restaurant: &Restaurant,
    resolver: &NeighborhoodResolver,
    area: &ServiceArea,
    options: &Options,
) -> Outcome {
    let (lon, lat) = restaurant.position();
    let Some(point) = checked_coordinate(lon, lat) else {
        return Outcome::InvalidCoordinates;
    };

    if !area.contains(point.x, point.y) {
        return Outcome::OutsideArea;
    }

    match resolver.lookup(point.x, point.y) {
        Lookup::Matched(neighborhood) => {
            let city = replacement_city(restaurant, &neighborhood, options);
            Outcome::Update { neighborhood, city }
        }
        Lookup::NoMatch => Outcome::NotFound,
        Lookup::InvalidCoordinate => Outcome::InvalidCoordinates,
    }
}

/// The borough replaces a missing or placeholder city
fn replacement_city(
    restaurant: &Restaurant,
    neighborhood: &NeighborhoodMatch,
    options: &Options,
) -> Option<String> {
    if !options.update_city || neighborhood.group.is_empty() {
        return None;
    }

    let is_placeholder = match restaurant.city.as_deref() {
        None | Some("") => true,
        Some(city) => options.generic_cities.iter().any(|g| g == city),
    };

    if is_placeholder && restaurant.city.as_deref() != Some(neighborhood.group.as_str()) {
        Some(neighborhood.group.clone())
    } else {
        None
    }
}

/// Run the backfill over every record in the store.
///
/// Resolution runs in parallel; updates and log lines are applied in record
/// order afterwards.
pub fn run(
    store: &mut RestaurantStore,
    resolver: &NeighborhoodResolver,
    area: &ServiceArea,
    options: &Options,
    log: &mut RunLog,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut candidates: Vec<(usize, &Restaurant)> = Vec::new();

    for (position, record) in store.records().iter().enumerate() {
        match record {
            Record::Unparsed { reason, .. } => {
                log.warn(&format!("Error reading record #{}: {}", position, reason));
                summary.errors += 1;
            }
            Record::Restaurant(r) if !r.has_coordinates() => {}
            Record::Restaurant(r) if options.skip_existing && r.has_neighborhood() => {
                summary.skipped += 1;
            }
            Record::Restaurant(r) => candidates.push((position, r)),
        }
    }

    log.info(&format!("Found {} restaurants with coordinates", candidates.len()));

    let pb = ProgressBar::new(candidates.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let outcomes: Vec<(usize, Outcome)> = candidates
        .par_iter()
        .map(|&(position, restaurant)| {
            let outcome = classify(restaurant, resolver, area, options);
            pb.inc(1);
            (position, outcome)
        })
        .collect();

    pb.finish_and_clear();

    for (position, outcome) in outcomes {
        let Record::Restaurant(restaurant) = &mut store.records_mut()[position] else {
            continue;
        };
        apply(restaurant, outcome, options, log, &mut summary);
    }

    summary
}

fn apply(
    restaurant: &mut Restaurant,
    outcome: Outcome,
    options: &Options,
    log: &mut RunLog,
    summary: &mut RunSummary,
) {
    match outcome {
        Outcome::Update { neighborhood, city } => {
            let label = format!("{}, {}", neighborhood.name, neighborhood.group);
            if options.dry_run {
                log.info(&format!("[DRY RUN] Would update {}: {}", restaurant.name, label));
            } else {
                restaurant.neighborhood = Some(neighborhood.name);
                if city.is_some() {
                    restaurant.city = city;
                }
                log.info(&format!("Updated {}: {}", restaurant.name, label));
            }
            summary.updated += 1;
        }
        Outcome::NotFound => {
            log.info(&format!(
                "No neighborhood found for {} at {}",
                restaurant.name,
                restaurant.display_position()
            ));
            summary.not_found += 1;
        }
        Outcome::InvalidCoordinates => {
            log.warn(&format!(
                "Invalid coordinates for {}: {}",
                restaurant.name,
                restaurant.display_position()
            ));
            summary.invalid_coordinates += 1;
        }
        Outcome::OutsideArea => {
            log.info(&format!(
                "Coordinates outside service area for {}: {}",
                restaurant.name,
                restaurant.display_position()
            ));
            summary.outside_area += 1;
        }
    }
}
