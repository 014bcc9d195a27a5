//! Per-tile vegetation scoring and manifest annotation.

use crate::{GreenError, Result};
use image::RgbImage;
use std::path::Path;
use tracing::{debug, info, warn};
use waylapse_archive::{FlatTile, GreenStats, Manifest};

/// Minimum Excess Green index (`2G - R - B`) for a vegetation pixel.
pub const EXG_THRESHOLD: f64 = 12.0;

/// Minimum Green-Red Vegetation Index for a vegetation pixel.
pub const GRVI_THRESHOLD: f64 = 0.025;

/// Pixels darker than this mean brightness are ignored (shadow).
pub const MIN_BRIGHTNESS: f64 = 20.0;

/// Pixels brighter than this mean brightness are ignored (cloud, glare).
pub const MAX_BRIGHTNESS: f64 = 250.0;

/// Result of annotating an archive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreenSummary {
    /// Tiles successfully analyzed.
    pub analyzed: usize,
    /// Aggregate statistics over the analyzed tiles.
    pub stats: GreenStats,
}

/// Vegetation coverage of an image, as a percentage of all pixels,
/// rounded to 2 decimals.
pub fn green_percent(img: &RgbImage) -> f64 {
    let total = (img.width() as u64 * img.height() as u64) as f64;
    if total == 0.0 {
        return 0.0;
    }

    let mut vegetation = 0u64;
    for pixel in img.pixels() {
        let [r, g, b] = pixel.0;
        let (r, g, b) = (r as f64, g as f64, b as f64);

        let brightness = (r + g + b) / 3.0;
        if brightness < MIN_BRIGHTNESS || brightness > MAX_BRIGHTNESS {
            continue;
        }

        let exg = 2.0 * g - r - b;
        let grvi = (g - r) / (g + r).max(1.0);

        if exg > EXG_THRESHOLD && g > b && grvi > GRVI_THRESHOLD {
            vegetation += 1;
        }
    }

    round2(vegetation as f64 / total * 100.0)
}

/// Decode an image file and score it.
pub fn analyze_file(path: &Path) -> Result<f64> {
    let img = image::open(path)?.to_rgb8();
    Ok(green_percent(&img))
}

/// Score every retained tile in an archive and write the results back
/// into its manifest.
///
/// Fills `greenPercent` per tile, computes `greenStats {min, max, avg}`,
/// and adds the flattened `allTiles` view sorted by coverage, highest
/// first. Tiles whose file is missing or undecodable are skipped with a
/// warning and left unscored.
pub fn annotate(root: &Path) -> Result<GreenSummary> {
    let mut manifest = Manifest::load(root)?;
    let mut flat: Vec<FlatTile> = Vec::new();

    for point in &mut manifest.points {
        debug!(point = point.index, tiles = point.tiles.len(), "scoring point");

        for tile in &mut point.tiles {
            let path = root.join(&point.folder).join(&tile.filename);
            if !path.exists() {
                warn!(file = %path.display(), "tile file missing, skipping");
                continue;
            }

            let percent = match analyze_file(&path) {
                Ok(percent) => percent,
                Err(err) => {
                    warn!(file = %path.display(), error = %err, "tile not decodable, skipping");
                    continue;
                }
            };

            tile.green_percent = Some(percent);
            flat.push(FlatTile {
                point_index: point.index,
                lat: point.lat,
                lon: point.lon,
                folder: point.folder.clone(),
                date: tile.date.clone(),
                filename: tile.filename.clone(),
                revision: tile.revision.clone(),
                green_percent: percent,
            });
        }
    }

    if flat.is_empty() {
        return Err(GreenError::NoTiles);
    }

    let min = flat.iter().map(|t| t.green_percent).fold(f64::INFINITY, f64::min);
    let max = flat.iter().map(|t| t.green_percent).fold(f64::NEG_INFINITY, f64::max);
    let avg = round2(flat.iter().map(|t| t.green_percent).sum::<f64>() / flat.len() as f64);
    let stats = GreenStats { min, max, avg };

    // Greenest first.
    flat.sort_by(|a, b| {
        b.green_percent
            .partial_cmp(&a.green_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let analyzed = flat.len();
    manifest.green_stats = Some(stats);
    manifest.all_tiles = Some(flat);
    manifest.save(root)?;

    info!(analyzed, min = stats.min, max = stats.max, avg = stats.avg, "analysis complete");

    Ok(GreenSummary { analyzed, stats })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
