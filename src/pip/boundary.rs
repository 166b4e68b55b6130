//! Neighborhood boundary extraction from GeoJSON.

use std::fs;
use std::path::{Path, PathBuf};

use geo::Coord;
use geojson::{Feature, GeoJson, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{Region, RegionSet};

/// Property keys tried in order for each label
const NAME_KEYS: &[&str] = &["neighborhood", "name", "ntaname"];
const GROUP_KEYS: &[&str] = &["borough", "boroname", "group"];
const GROUP_CODE_KEYS: &[&str] = &["boroughCode", "borocode", "group_code"];

/// Errors that make a region file unusable.
#[derive(Debug, Error)]
pub enum RegionError {
    #[error("failed to read region file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("expected a GeoJSON FeatureCollection, found a {0}")]
    NotFeatureCollection(&'static str),
}

/// Load a region set from a GeoJSON file on disk
pub fn load_regions<P: AsRef<Path>>(path: P) -> Result<RegionSet, RegionError> {
    let path = path.as_ref();
    info!("Loading neighborhood boundaries from {}", path.display());

    let content = fs::read_to_string(path).map_err(|source| RegionError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_regions(&content)
}

/// Parse a GeoJSON FeatureCollection into regions, preserving feature order.
///
/// Features without a usable polygon or name are skipped. Rings that end up
/// with fewer than three vertices are kept; they simply never match.
pub fn parse_regions(geojson: &str) -> Result<RegionSet, RegionError> {
    let collection = match geojson.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => fc,
        GeoJson::Feature(_) => return Err(RegionError::NotFeatureCollection("Feature")),
        GeoJson::Geometry(_) => return Err(RegionError::NotFeatureCollection("Geometry")),
    };

    let total = collection.features.len();
    let mut regions = RegionSet::default();

    for (position, feature) in collection.features.iter().enumerate() {
        match region_from_feature(feature) {
            Some(region) => regions.push(region),
            None => debug!("Skipping feature #{}", position),
        }
    }

    let skipped = total - regions.len();
    if skipped > 0 {
        warn!("Skipped {} of {} features without a usable polygon or name", skipped, total);
    }

    let degenerate = regions.degenerate_count();
    if degenerate > 0 {
        warn!("{} neighborhoods have fewer than 3 vertices and will never match", degenerate);
    }

    info!("Loaded GeoJSON with {} neighborhoods", regions.len());

    Ok(regions)
}

fn region_from_feature(feature: &Feature) -> Option<Region> {
    let Some(name) = first_property(feature, NAME_KEYS) else {
        warn!("Feature has none of the name properties {:?}", NAME_KEYS);
        return None;
    };

    let Some(ring) = outer_ring(feature) else {
        warn!("Neighborhood {} has no polygon geometry", name);
        return None;
    };

    let group = first_property(feature, GROUP_KEYS).unwrap_or_default();
    let mut region = Region::new(name, group, ring);
    region.group_code = first_property(feature, GROUP_CODE_KEYS);

    Some(region)
}

/// Outer ring of a Polygon, or of the first polygon of a MultiPolygon
fn outer_ring(feature: &Feature) -> Option<Vec<Coord<f64>>> {
    let geometry = feature.geometry.as_ref()?;

    let rings = match &geometry.value {
        Value::Polygon(rings) => rings.as_slice(),
        Value::MultiPolygon(polygons) => polygons.first().map(Vec::as_slice).unwrap_or(&[]),
        _ => return None,
    };

    // A polygon without rings becomes an empty ring that never matches
    let coords = rings
        .first()
        .map(|positions| {
            positions
                .iter()
                .filter(|p| p.len() >= 2)
                .map(|p| Coord { x: p[0], y: p[1] })
                .collect()
        })
        .unwrap_or_default();

    Some(coords)
}

/// First non-empty property among `keys`; numbers are stringified
fn first_property(feature: &Feature, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match feature.property(*key)? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "neighborhood": "Chelsea", "borough": "Manhattan", "boroughCode": "1", "@id": "x" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-74.01, 40.74], [-74.01, 40.75], [-74.0, 40.75], [-74.0, 40.74], [-74.01, 40.74]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "ntaname": "Williamsburg", "boroname": "Brooklyn", "borocode": 3 },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[-73.96, 40.71], [-73.96, 40.72], [-73.95, 40.72], [-73.95, 40.71]]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "borough": "Queens" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [0, 1], [1, 1]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "neighborhood": "Pier" },
                "geometry": { "type": "Point", "coordinates": [-74.0, 40.7] }
            },
            {
                "type": "Feature",
                "properties": { "neighborhood": "Sliver", "borough": "Queens" },
                "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 1]]] }
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample_collection() {
        let regions = parse_regions(SAMPLE).unwrap();
        let names: Vec<&str> = regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Chelsea", "Williamsburg", "Sliver"]);

        let chelsea = regions.get(0).unwrap();
        assert_eq!(chelsea.group, "Manhattan");
        assert_eq!(chelsea.group_code.as_deref(), Some("1"));
        assert_eq!(chelsea.vertices().len(), 5);

        let williamsburg = regions.get(1).unwrap();
        assert_eq!(williamsburg.group, "Brooklyn");
        assert_eq!(williamsburg.group_code.as_deref(), Some("3"));

        assert!(regions.get(2).unwrap().is_degenerate());
        assert_eq!(regions.degenerate_count(), 1);
    }

    #[test]
    fn test_holes_are_ignored() {
        let doc = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "neighborhood": "Donut", "borough": "Queens" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [
                        [[0, 0], [0, 10], [10, 10], [10, 0], [0, 0]],
                        [[4, 4], [4, 6], [6, 6], [6, 4], [4, 4]]
                    ]
                }
            }]
        }"#;

        let regions = parse_regions(doc).unwrap();
        let donut = regions.get(0).unwrap();
        assert_eq!(donut.vertices().len(), 5);
        assert!(crate::pip::point_in_ring(Coord { x: 5.0, y: 5.0 }, donut.vertices()));
    }

    #[test]
    fn test_rejects_non_collection() {
        let doc = r#"{ "type": "Point", "coordinates": [0, 0] }"#;
        assert!(matches!(
            parse_regions(doc),
            Err(RegionError::NotFeatureCollection("Geometry"))
        ));
        assert!(matches!(parse_regions("not json"), Err(RegionError::GeoJson(_))));
    }

    #[test]
    fn test_load_regions_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let regions = load_regions(file.path()).unwrap();
        assert_eq!(regions.len(), 3);

        let missing = load_regions(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(RegionError::Io { .. })));
    }
}
