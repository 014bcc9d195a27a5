//! Points-of-interest loading.
//!
//! Reads a GeoJSON FeatureCollection of Point features. Only the geometry
//! coordinates (`[lon, lat]`) and the optional `fid` identifier property
//! are read; every other property is ignored. Each point gets a stable
//! zero-based index in file order.

use crate::{ArchiveError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// External identifier of a point, as found in the input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    /// Numeric feature id.
    Number(i64),
    /// String feature id.
    Text(String),
}

/// One point of interest.
///
/// Immutable after load; maps to exactly one output folder and one tile
/// address per zoom level.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Stable zero-based index assigned at load time.
    pub index: usize,
    /// Identifier from the input file (`fid` property), falling back to
    /// the index when absent.
    pub external_id: ExternalId,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    #[serde(default)]
    properties: Option<Properties>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    fid: Option<ExternalId>,
}

/// Load points from a GeoJSON file.
///
/// Indices are assigned in file order before the `max_points` cut, so a
/// limited run processes the same leading points a full run would.
pub fn load_points(path: &Path, max_points: usize) -> Result<Vec<Point>> {
    let raw = fs::read_to_string(path)?;
    let collection: FeatureCollection = serde_json::from_str(&raw)?;

    let mut points = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.into_iter().enumerate() {
        if feature.geometry.kind != "Point" || feature.geometry.coordinates.len() < 2 {
            return Err(ArchiveError::UnsupportedGeometry {
                index,
                kind: feature.geometry.kind,
            });
        }

        let external_id = feature
            .properties
            .and_then(|p| p.fid)
            .unwrap_or(ExternalId::Number(index as i64));

        // GeoJSON coordinate order is [lon, lat].
        points.push(Point {
            index,
            external_id,
            lon: feature.geometry.coordinates[0],
            lat: feature.geometry.coordinates[1],
        });
    }

    if max_points > 0 {
        points.truncate(max_points);
    }

    Ok(points)
}
