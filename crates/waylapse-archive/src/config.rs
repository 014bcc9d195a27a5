//! Archive run configuration.

use std::path::PathBuf;
use std::time::Duration;
use waylapse_wayback::DEFAULT_ZOOM;

/// Configuration for one archive run.
///
/// Defaults match the reference pipeline: zoom 18 (building scale), no
/// point limit, 100 ms politeness delay between network fetches.
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// GeoJSON file holding the points of interest.
    pub points_file: PathBuf,
    /// Archive root directory (per-point folders and the manifest live here).
    pub root: PathBuf,
    /// Tile zoom level.
    pub zoom: u8,
    /// Maximum number of points to process (0 = all).
    pub max_points: usize,
    /// Delay between consecutive network fetches. Not applied when a tile
    /// is served from disk.
    pub delay: Duration,
    /// Imagery source name recorded in the manifest.
    pub source_name: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            points_file: PathBuf::from("points.geojson"),
            root: PathBuf::from("tiles"),
            zoom: DEFAULT_ZOOM,
            max_points: 0,
            delay: Duration::from_millis(100),
            source_name: "Esri Wayback".to_string(),
        }
    }
}
