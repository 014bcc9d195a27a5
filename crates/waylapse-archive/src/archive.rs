//! Archive run orchestration.
//!
//! Sequential reference flow: one point at a time, one release at a time,
//! in catalog order. Network fetches are spaced by the configured delay;
//! tiles already on disk and duplicate verdicts recorded in a prior
//! manifest are served without touching the network, which makes re-runs
//! incremental and fetch-free when nothing changed upstream.

use crate::dedup::{DedupTracker, Observation};
use crate::manifest::{point_folder, DuplicateRecord, Manifest, PointEntry, TileRecord};
use crate::{load_points, ArchiveConfig, Result};
use std::collections::HashMap;
use std::fs;
use std::thread;
use tracing::{debug, info, warn};
use waylapse_wayback::{Release, TileCoord, TileSource};

/// Counters for one archive run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    /// Points processed.
    pub points: usize,
    /// Releases in the effective catalog.
    pub releases: usize,
    /// Tiles retained as unique.
    pub unique: u64,
    /// Tiles discarded as byte-identical duplicates.
    pub duplicates: u64,
}

/// The archive pipeline.
pub struct Archiver {
    config: ArchiveConfig,
}

impl Archiver {
    /// Create an archiver with the given configuration.
    pub fn new(config: ArchiveConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline over the given release catalog.
    ///
    /// `releases` must be in the provider's chronological order; dedup
    /// tie-breaking depends on it. The manifest is written once, after all
    /// points complete. A tile-level fetch failure skips that release for
    /// that point; filesystem failures abort the run.
    pub fn run(&self, releases: &[Release], source: &dyn TileSource) -> Result<ArchiveStats> {
        let points = load_points(&self.config.points_file, self.config.max_points)?;
        fs::create_dir_all(&self.config.root)?;

        // Duplicate verdicts from a prior run, so deleted duplicate files
        // are not re-fetched just to be deleted again.
        let prior_duplicates = self.load_prior_duplicates();

        let mut manifest = Manifest::new(
            self.config.zoom,
            self.config.source_name.clone(),
            releases.to_vec(),
        );
        let mut stats = ArchiveStats {
            points: points.len(),
            releases: releases.len(),
            ..ArchiveStats::default()
        };

        for point in &points {
            let coord = TileCoord::from_lat_lon(point.lat, point.lon, self.config.zoom)?;
            let folder = point_folder(point.index);
            let dir = self.config.root.join(&folder);
            fs::create_dir_all(&dir)?;

            let mut tracker = DedupTracker::new();
            let mut tiles = Vec::new();
            let mut duplicates = Vec::new();

            for release in releases {
                let filename = format!("{}.jpg", release.label);
                let path = dir.join(&filename);

                let (bytes, fetched) = if path.exists() {
                    // Skip-fetch path: the file on disk is authoritative.
                    (fs::read(&path)?, false)
                } else if let Some(record) = prior_duplicates.get(&(point.index, release.revision.clone())) {
                    // Known duplicate from a prior run; nothing to fetch.
                    duplicates.push(record.clone());
                    stats.duplicates += 1;
                    continue;
                } else {
                    match source.fetch_tile(&release.revision, coord) {
                        Ok(bytes) => {
                            fs::write(&path, &bytes)?;
                            (bytes, true)
                        }
                        Err(err) => {
                            // Best-effort: this release is skipped for this
                            // point, no retry.
                            warn!(
                                point = point.index,
                                release = %release.label,
                                error = %err,
                                "tile fetch failed, skipping release"
                            );
                            thread::sleep(self.config.delay);
                            continue;
                        }
                    }
                };

                match tracker.observe(&bytes, &release.label, &filename) {
                    Observation::Unique => {
                        tiles.push(TileRecord {
                            date: release.label.clone(),
                            filename: filename.clone(),
                            revision: release.revision.clone(),
                            green_percent: None,
                        });
                        stats.unique += 1;
                        debug!(point = point.index, release = %release.label, "tile retained");
                    }
                    Observation::Duplicate(first) => {
                        fs::remove_file(&path)?;
                        duplicates.push(DuplicateRecord {
                            date: release.label.clone(),
                            filename: filename.clone(),
                            revision: release.revision.clone(),
                            duplicate_of: first.filename.clone(),
                        });
                        stats.duplicates += 1;
                        debug!(point = point.index, release = %release.label, "duplicate removed");
                    }
                }

                if fetched {
                    thread::sleep(self.config.delay);
                }
            }

            info!(
                point = point.index,
                of = points.len(),
                lat = point.lat,
                lon = point.lon,
                retained = tiles.len(),
                percent = (point.index + 1) * 100 / points.len().max(1),
                "point complete"
            );

            manifest.points.push(PointEntry {
                index: point.index,
                lat: point.lat,
                lon: point.lon,
                external_id: point.external_id.clone(),
                folder,
                tiles,
                duplicates,
            });
        }

        manifest.save(&self.config.root)?;
        info!(
            unique = stats.unique,
            duplicates = stats.duplicates,
            points = stats.points,
            "archive complete"
        );

        Ok(stats)
    }

    /// Index duplicate verdicts from the prior manifest, if one exists.
    ///
    /// A missing or unreadable prior manifest just means no verdicts are
    /// reusable; it never fails the run.
    fn load_prior_duplicates(&self) -> HashMap<(usize, String), DuplicateRecord> {
        let mut verdicts = HashMap::new();
        match Manifest::load(&self.config.root) {
            Ok(prior) => {
                for point in prior.points {
                    for record in point.duplicates {
                        verdicts.insert((point.index, record.revision.clone()), record);
                    }
                }
            }
            Err(err) => {
                debug!(error = %err, "no prior manifest consulted");
            }
        }
        verdicts
    }
}
