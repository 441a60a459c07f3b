//! Neighborhood boundary ingestion
//!
//! Reads a GeoJSON FeatureCollection of named Polygon/MultiPolygon
//! features once at startup. A missing file or structurally invalid
//! content is fatal before any network or store activity begins.

use crate::domain::{Neighborhood, PipelineError};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Label used when a feature carries no name property
const DEFAULT_NAME: &str = "Unnamed";

/// A GeoJSON position; only the first two ordinates are used
type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: serde_json::Value,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
}

/// Load all neighborhoods from a GeoJSON boundary file
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Neighborhood>, PipelineError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PipelineError::ResourceMissing(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| PipelineError::MalformedInput(format!("unreadable boundary file: {}", e)))?;
    let collection: FeatureCollection = serde_json::from_str(&content)
        .map_err(|e| PipelineError::MalformedInput(e.to_string()))?;

    if collection.kind != "FeatureCollection" {
        return Err(PipelineError::MalformedInput(format!(
            "expected a FeatureCollection, got {:?}",
            collection.kind
        )));
    }

    let mut neighborhoods = Vec::with_capacity(collection.features.len());
    for (idx, feature) in collection.features.into_iter().enumerate() {
        let name = resolve_name(&feature.properties);
        let boundary = match feature.geometry {
            Some(Geometry::Polygon { coordinates }) => {
                MultiPolygon::new(vec![parse_polygon(&coordinates, idx)?])
            }
            Some(Geometry::MultiPolygon { coordinates }) => {
                let polygons = coordinates
                    .iter()
                    .map(|rings| parse_polygon(rings, idx))
                    .collect::<Result<Vec<_>, _>>()?;
                MultiPolygon::new(polygons)
            }
            None => {
                return Err(PipelineError::MalformedInput(format!(
                    "feature {} ({}) has no polygon geometry",
                    idx, name
                )));
            }
        };

        debug!(neighborhood = %name, polygons = %boundary.0.len(), "boundary_parsed");
        neighborhoods.push(Neighborhood { name, boundary });
    }

    Ok(neighborhoods)
}

/// Name resolution order: `name`, else `NAME`, else a fixed label - never null
fn resolve_name(properties: &serde_json::Value) -> String {
    properties["name"]
        .as_str()
        .or_else(|| properties["NAME"].as_str())
        .unwrap_or(DEFAULT_NAME)
        .to_string()
}

fn parse_polygon(rings: &[Vec<Position>], feature_idx: usize) -> Result<Polygon<f64>, PipelineError> {
    let mut parsed = rings
        .iter()
        .map(|ring| parse_ring(ring, feature_idx))
        .collect::<Result<Vec<_>, _>>()?;

    if parsed.is_empty() || parsed[0].0.is_empty() {
        return Err(PipelineError::MalformedInput(format!(
            "feature {} has an empty exterior ring",
            feature_idx
        )));
    }

    let exterior = parsed.remove(0);
    Ok(Polygon::new(exterior, parsed))
}

fn parse_ring(ring: &[Position], feature_idx: usize) -> Result<LineString<f64>, PipelineError> {
    let mut coords = Vec::with_capacity(ring.len());
    for position in ring {
        if position.len() < 2 {
            return Err(PipelineError::MalformedInput(format!(
                "feature {} has a position with fewer than two ordinates",
                feature_idx
            )));
        }
        coords.push(Coord { x: position[0], y: position[1] });
    }

    // Close the ring if the input left it open
    if !coords.is_empty() && coords[0] != coords[coords.len() - 1] {
        coords.push(coords[0]);
    }

    Ok(LineString::new(coords))
}
