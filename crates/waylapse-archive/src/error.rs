//! Error types for the archive pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building the tile archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Wayback service error (catalog fetch, tile addressing).
    #[error(transparent)]
    Wayback(#[from] waylapse_wayback::WaybackError),

    /// I/O error on the archive directory or a tile file.
    ///
    /// Filesystem failures are fatal for a run: a directory or file that
    /// cannot be written means the archive root itself is unusable.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error reading the points file or reading/writing the manifest.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A points-file feature carries a geometry this pipeline cannot map
    /// to a single tile address.
    #[error("Unsupported geometry {kind:?} for feature {index}")]
    UnsupportedGeometry {
        /// Zero-based feature index in the input file.
        index: usize,
        /// GeoJSON geometry type found.
        kind: String,
    },

    /// No manifest present where one was expected.
    #[error("No manifest found at {0}")]
    MissingManifest(PathBuf),
}
