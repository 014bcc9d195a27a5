//! # waylapse-wayback
//!
//! Client for the Esri Wayback historical imagery service.
//!
//! This crate provides the three provider-facing building blocks of the
//! waylapse pipeline:
//!
//! - [`TileCoord`]: conversion of geographic coordinates into slippy-map
//!   tile addresses (OpenStreetMap tiling convention, Web Mercator).
//! - Release catalog fetching: the ordered list of historical imagery
//!   snapshots ([`Release`]) published by the Wayback metadata endpoint.
//! - Tile fetching: retrieval of a single tile image for a given release
//!   revision and tile address, following HTTP redirects manually with a
//!   bounded depth.
//!
//! ## Tile Coordinate System
//!
//! Uses the OpenStreetMap Slippy Map tile naming convention:
//! - `z` is the zoom level (0-23, default 18)
//! - `x` is the column (0 to 2^z - 1, from west to east)
//! - `y` is the row (0 to 2^z - 1, from north to south)
//!
//! At zoom level 18 a tile covers roughly one building block, which is the
//! scale the vegetation scan operates at.
//!
//! ## Example
//!
//! ```no_run
//! use waylapse_wayback::{TileCoord, WaybackClient, TileSource, DEFAULT_ZOOM};
//!
//! let client = WaybackClient::new()?;
//!
//! // All releases from 2020 onwards, in the provider's chronological order.
//! let releases = client.fetch_catalog(2020)?;
//!
//! let coord = TileCoord::from_lat_lon(40.7128, -74.0060, DEFAULT_ZOOM)?;
//! let bytes = client.fetch_tile(&releases[0].revision, coord)?;
//! println!("{} bytes for {}", bytes.len(), releases[0].label);
//! # Ok::<(), waylapse_wayback::WaybackError>(())
//! ```

mod catalog;
mod client;
mod error;
mod tile;

pub use catalog::Release;
pub use client::{TileSource, WaybackClient, MAX_REDIRECTS};
pub use error::WaybackError;
pub use tile::{TileCoord, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};

/// Result type for Wayback operations.
pub type Result<T> = std::result::Result<T, WaybackError>;
