//! Slippy-map tile addressing.

use crate::{Result, WaybackError};
use std::f64::consts::PI;

/// Minimum valid zoom level.
pub const MIN_ZOOM: u8 = 0;

/// Maximum zoom level served by the Wayback tile endpoint.
pub const MAX_ZOOM: u8 = 23;

/// Default zoom level (building scale, one tile per site).
pub const DEFAULT_ZOOM: u8 = 18;

/// Web Mercator latitude limit, arctan(sinh(pi)) in degrees.
const LAT_LIMIT: f64 = 85.0511;

/// OSM-style tile coordinates (z, x, y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Zoom level (0-23).
    pub z: u8,
    /// X coordinate (column, 0 at 180°W, increases eastward).
    pub x: u32,
    /// Y coordinate (row, 0 at ~85.05°N, increases southward).
    pub y: u32,
}

impl TileCoord {
    /// Create a new tile coordinate.
    ///
    /// # Panics
    /// Panics if coordinates are out of range for the zoom level.
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        let max_coord = 1u32 << z;
        assert!(x < max_coord, "x={} out of range for zoom {}", x, z);
        assert!(y < max_coord, "y={} out of range for zoom {}", y, z);
        Self { z, x, y }
    }

    /// Convert latitude/longitude to tile coordinates.
    ///
    /// Uses the OpenStreetMap Slippy Map tiling formula:
    /// - x = floor((lon + 180) / 360 * 2^z)
    /// - y = floor((1 - ln(tan(lat) + sec(lat)) / π) / 2 * 2^z)
    ///
    /// Latitude is clamped to ±85.0511° before projection, so the formula's
    /// singularity at the poles saturates to the first/last tile row instead
    /// of overflowing.
    ///
    /// # Arguments
    /// * `lat` - Latitude in degrees
    /// * `lon` - Longitude in degrees (-180 to 180)
    /// * `z` - Zoom level (0-23)
    pub fn from_lat_lon(lat: f64, lon: f64, z: u8) -> Result<Self> {
        if z > MAX_ZOOM {
            return Err(WaybackError::InvalidZoomLevel(z));
        }

        let lat_clamped = lat.clamp(-LAT_LIMIT, LAT_LIMIT);

        let n = (1u64 << z) as f64;

        let x = ((lon + 180.0) / 360.0 * n).floor() as u32;

        let lat_rad = lat_clamped.to_radians();
        let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor() as u32;

        // Clamp to valid range (handles lon at exactly +180°)
        let max_coord = ((1u64 << z) - 1) as u32;
        let x = x.min(max_coord);
        let y = y.min(max_coord);

        Ok(Self { z, x, y })
    }

    /// Get the bounding box for this tile.
    ///
    /// Returns (min_lat, max_lat, min_lon, max_lon).
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let n = (1u64 << self.z) as f64;

        let min_lon = self.x as f64 / n * 360.0 - 180.0;
        let max_lon = (self.x + 1) as f64 / n * 360.0 - 180.0;

        // Latitude bounds (inverse of Slippy Map formula)
        let max_lat = (PI * (1.0 - 2.0 * self.y as f64 / n)).sinh().atan().to_degrees();
        let min_lat = (PI * (1.0 - 2.0 * (self.y + 1) as f64 / n)).sinh().atan().to_degrees();

        (min_lat, max_lat, min_lon, max_lon)
    }
}
