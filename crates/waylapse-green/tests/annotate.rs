//! Manifest annotation tests on a scratch archive.

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};
use waylapse_archive::{point_folder, ExternalId, Manifest, PointEntry, TileRecord};
use waylapse_green::{annotate, GreenError};
use waylapse_wayback::Release;

fn tile_record(date: &str, filename: &str, revision: &str) -> TileRecord {
    TileRecord {
        date: date.to_string(),
        filename: filename.to_string(),
        revision: revision.to_string(),
        green_percent: None,
    }
}

/// Archive with one point and three tiles: fully green, gray, half green.
fn build_archive(root: &Path) {
    let folder = root.join(point_folder(0));
    fs::create_dir_all(&folder).unwrap();

    RgbImage::from_pixel(8, 8, Rgb([0, 200, 0]))
        .save(folder.join("2015-02-25.png"))
        .unwrap();
    RgbImage::from_pixel(8, 8, Rgb([100, 100, 100]))
        .save(folder.join("2019-03-06.png"))
        .unwrap();

    let mut half = RgbImage::from_pixel(8, 8, Rgb([100, 100, 100]));
    for x in 0..4 {
        for y in 0..8 {
            half.put_pixel(x, y, Rgb([0, 200, 0]));
        }
    }
    half.save(folder.join("2023-10-11.png")).unwrap();

    let mut manifest = Manifest::new(
        18,
        "Esri Wayback",
        vec![Release {
            revision: "r0".to_string(),
            label: "2015-02-25".to_string(),
            year: 2015,
        }],
    );
    manifest.points.push(PointEntry {
        index: 0,
        lat: 40.7128,
        lon: -74.0060,
        external_id: ExternalId::Number(42),
        folder: point_folder(0),
        tiles: vec![
            tile_record("2015-02-25", "2015-02-25.png", "r0"),
            tile_record("2019-03-06", "2019-03-06.png", "r2"),
            tile_record("2023-10-11", "2023-10-11.png", "r4"),
        ],
        duplicates: Vec::new(),
    });
    manifest.save(root).unwrap();
}

#[test]
fn test_annotate_scores_and_sorts() {
    let dir = tempfile::tempdir().unwrap();
    build_archive(dir.path());

    let summary = annotate(dir.path()).unwrap();
    assert_eq!(summary.analyzed, 3);
    assert_eq!(summary.stats.min, 0.0);
    assert_eq!(summary.stats.max, 100.0);
    assert_eq!(summary.stats.avg, 50.0);

    let manifest = Manifest::load(dir.path()).unwrap();

    // Percentages written back per tile, in place.
    let tiles = &manifest.points[0].tiles;
    assert_eq!(tiles[0].green_percent, Some(100.0));
    assert_eq!(tiles[1].green_percent, Some(0.0));
    assert_eq!(tiles[2].green_percent, Some(50.0));

    // Flattened view is sorted greenest-first.
    let flat = manifest.all_tiles.as_ref().unwrap();
    let percents: Vec<f64> = flat.iter().map(|t| t.green_percent).collect();
    assert_eq!(percents, [100.0, 50.0, 0.0]);
    assert_eq!(flat[0].point_index, 0);
    assert_eq!(flat[0].folder, "point_00000");

    let stats = manifest.green_stats.unwrap();
    assert_eq!(stats.avg, 50.0);
}

#[test]
fn test_annotate_preserves_core_structure() {
    let dir = tempfile::tempdir().unwrap();
    build_archive(dir.path());
    let before = serde_json::to_value(Manifest::load(dir.path()).unwrap()).unwrap();

    annotate(dir.path()).unwrap();
    let after = serde_json::to_value(Manifest::load(dir.path()).unwrap()).unwrap();

    // Core fields are untouched; classifier fields are purely additive.
    for field in ["generatedAt", "zoom", "sourceName", "releases"] {
        assert_eq!(before[field], after[field], "field {field} changed");
    }
    let (bp, ap) = (&before["points"][0], &after["points"][0]);
    for field in ["index", "lat", "lon", "externalId", "folder"] {
        assert_eq!(bp[field], ap[field], "point field {field} changed");
    }
    assert_eq!(
        bp["tiles"].as_array().unwrap().len(),
        ap["tiles"].as_array().unwrap().len()
    );
}

#[test]
fn test_missing_tile_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    build_archive(dir.path());
    fs::remove_file(dir.path().join(point_folder(0)).join("2019-03-06.png")).unwrap();

    let summary = annotate(dir.path()).unwrap();
    assert_eq!(summary.analyzed, 2);

    let manifest = Manifest::load(dir.path()).unwrap();
    assert_eq!(manifest.points[0].tiles[1].green_percent, None);
}

#[test]
fn test_empty_archive_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = Manifest::new(18, "Esri Wayback", Vec::new());
    manifest.save(dir.path()).unwrap();

    assert!(matches!(annotate(dir.path()), Err(GreenError::NoTiles)));
}

#[test]
fn test_missing_manifest_is_an_archive_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(annotate(dir.path()), Err(GreenError::Archive(_))));
}
