//! Manifest model and persistence.
//!
//! The manifest is the sole persisted artifact of the pipeline. It is
//! created fresh each run and fully replaces any prior manifest, but only
//! after every point has been processed, so a crash mid-run never corrupts
//! a previously completed manifest.
//!
//! The classifier collaborator reads this exact structure, fills in
//! `greenPercent` per tile, and adds the aggregate `greenStats` and
//! flattened `allTiles` fields; those are optional here and absent until
//! it runs.

use crate::points::ExternalId;
use crate::{ArchiveError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use waylapse_wayback::Release;

/// Manifest filename within the archive root.
const MANIFEST_FILE: &str = "manifest.json";

/// Folder name for a point: `point_` plus the 5-digit zero-padded index.
pub fn point_folder(index: usize) -> String {
    format!("point_{:05}", index)
}

/// Path of the manifest inside an archive root.
pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_FILE)
}

/// One uniquely-retained tile for a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    /// Release date label.
    pub date: String,
    /// Tile filename inside the point folder.
    pub filename: String,
    /// Provider revision the tile was fetched from.
    #[serde(rename = "revisionId")]
    pub revision: String,
    /// Vegetation coverage percentage, written by the classifier.
    #[serde(rename = "greenPercent", default, skip_serializing_if = "Option::is_none")]
    pub green_percent: Option<f64>,
}

/// A release whose tile was byte-identical to an earlier retained tile.
///
/// Recorded so a re-run can reproduce the verdict without re-fetching the
/// (deleted) duplicate file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateRecord {
    /// Release date label of the duplicate.
    pub date: String,
    /// Filename the duplicate would have used.
    pub filename: String,
    /// Provider revision of the duplicate.
    #[serde(rename = "revisionId")]
    pub revision: String,
    /// Filename of the retained tile with the same content.
    #[serde(rename = "duplicateOf")]
    pub duplicate_of: String,
}

/// One point and the tiles retained for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEntry {
    /// Stable zero-based point index.
    pub index: usize,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Identifier from the input file.
    #[serde(rename = "externalId")]
    pub external_id: ExternalId,
    /// Folder under the archive root holding this point's tiles.
    pub folder: String,
    /// Retained tiles, in catalog order. Content hashes are pairwise
    /// distinct within a point by construction.
    pub tiles: Vec<TileRecord>,
    /// Releases collapsed into earlier retained tiles, in catalog order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicates: Vec<DuplicateRecord>,
}

/// Aggregate vegetation statistics, written by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreenStats {
    /// Lowest per-tile percentage.
    pub min: f64,
    /// Highest per-tile percentage.
    pub max: f64,
    /// Mean percentage, rounded to 2 decimals.
    pub avg: f64,
}

/// A tile flattened out of its point entry, written by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatTile {
    /// Index of the owning point.
    #[serde(rename = "pointIndex")]
    pub point_index: usize,
    /// Latitude of the owning point.
    pub lat: f64,
    /// Longitude of the owning point.
    pub lon: f64,
    /// Folder of the owning point.
    pub folder: String,
    /// Release date label.
    pub date: String,
    /// Tile filename inside the point folder.
    pub filename: String,
    /// Provider revision.
    #[serde(rename = "revisionId")]
    pub revision: String,
    /// Vegetation coverage percentage.
    #[serde(rename = "greenPercent")]
    pub green_percent: f64,
}

/// The persisted archive manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// When this run's manifest was generated.
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
    /// Tile zoom level used for the run.
    pub zoom: u8,
    /// Imagery source name.
    #[serde(rename = "sourceName")]
    pub source_name: String,
    /// Release catalog the run operated on, in provider order.
    pub releases: Vec<Release>,
    /// Per-point results, in point-index order.
    pub points: Vec<PointEntry>,
    /// Aggregate vegetation statistics (classifier, additive).
    #[serde(rename = "greenStats", default, skip_serializing_if = "Option::is_none")]
    pub green_stats: Option<GreenStats>,
    /// Flattened tile view sorted by vegetation coverage (classifier, additive).
    #[serde(rename = "allTiles", default, skip_serializing_if = "Option::is_none")]
    pub all_tiles: Option<Vec<FlatTile>>,
}

impl Manifest {
    /// Start an empty manifest for a run.
    pub fn new(zoom: u8, source_name: impl Into<String>, releases: Vec<Release>) -> Self {
        Self {
            generated_at: Utc::now(),
            zoom,
            source_name: source_name.into(),
            releases,
            points: Vec::new(),
            green_stats: None,
            all_tiles: None,
        }
    }

    /// Load the manifest from an archive root.
    pub fn load(root: &Path) -> Result<Self> {
        let path = manifest_path(root);
        if !path.exists() {
            return Err(ArchiveError::MissingManifest(path));
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Persist the manifest into an archive root, replacing any prior one.
    pub fn save(&self, root: &Path) -> Result<()> {
        let body = serde_json::to_string_pretty(self)?;
        fs::write(manifest_path(root), body)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Manifest {
        let mut manifest = Manifest::new(
            18,
            "Esri Wayback",
            vec![Release {
                revision: "11475".to_string(),
                label: "2020-01-08".to_string(),
                year: 2020,
            }],
        );
        manifest.points.push(PointEntry {
            index: 0,
            lat: 40.7128,
            lon: -74.0060,
            external_id: ExternalId::Number(42),
            folder: point_folder(0),
            tiles: vec![TileRecord {
                date: "2020-01-08".to_string(),
                filename: "2020-01-08.jpg".to_string(),
                revision: "11475".to_string(),
                green_percent: None,
            }],
            duplicates: Vec::new(),
        });
        manifest
    }

    #[test]
    fn test_point_folder_padding() {
        assert_eq!(point_folder(0), "point_00000");
        assert_eq!(point_folder(7), "point_00007");
        assert_eq!(point_folder(12345), "point_12345");
    }

    #[test]
    fn test_field_names_match_contract() {
        let value = serde_json::to_value(sample()).unwrap();

        assert!(value.get("generatedAt").is_some());
        assert!(value.get("sourceName").is_some());
        let point = &value["points"][0];
        assert_eq!(point["externalId"], 42);
        assert_eq!(point["folder"], "point_00000");
        let tile = &point["tiles"][0];
        assert_eq!(tile["revisionId"], "11475");
        // Classifier fields stay absent until the classifier runs.
        assert!(tile.get("greenPercent").is_none());
        assert!(value.get("greenStats").is_none());
        assert!(value.get("allTiles").is_none());
        assert_eq!(value["releases"][0]["revisionId"], "11475");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = sample();
        manifest.save(dir.path()).unwrap();

        let loaded = Manifest::load(dir.path()).unwrap();
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn test_load_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Manifest::load(dir.path()),
            Err(ArchiveError::MissingManifest(_))
        ));
    }
}
