//! # waylapse-archive
//!
//! Temporal tile acquisition and deduplication pipeline.
//!
//! Builds a time-series archive of satellite imagery tiles for a fixed set
//! of geographic points: one folder per point, one candidate tile per
//! historical release, with byte-identical tiles across releases collapsed
//! to their earliest occurrence via content hashing. The sole persisted
//! artifact is a manifest describing the imagery actually retained.
//!
//! The pipeline is idempotent and resumable: tile files already on disk
//! are reused instead of re-fetched, duplicate verdicts from a prior
//! manifest are honored without network traffic, and the manifest is only
//! written once, after all points complete.
//!
//! ## Example
//!
//! ```no_run
//! use waylapse_archive::{ArchiveConfig, Archiver};
//! use waylapse_wayback::WaybackClient;
//!
//! let client = WaybackClient::new()?;
//! let releases = client.fetch_catalog(0)?;
//!
//! let archiver = Archiver::new(ArchiveConfig::default());
//! let stats = archiver.run(&releases, &client)?;
//! println!("{} unique tiles, {} duplicates removed", stats.unique, stats.duplicates);
//! # Ok::<(), waylapse_archive::ArchiveError>(())
//! ```

mod archive;
mod config;
mod dedup;
mod error;
mod manifest;
mod points;

pub use archive::{ArchiveStats, Archiver};
pub use config::ArchiveConfig;
pub use dedup::{DedupTracker, Observation, RetainedRef};
pub use error::ArchiveError;
pub use manifest::{
    manifest_path, point_folder, DuplicateRecord, FlatTile, GreenStats, Manifest, PointEntry,
    TileRecord,
};
pub use points::{load_points, ExternalId, Point};

/// Result type for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;
