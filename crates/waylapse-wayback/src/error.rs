//! Error types for the Wayback client.

use thiserror::Error;

/// Errors that can occur when talking to the Wayback service.
///
/// The archive pipeline treats these in two classes: catalog errors are
/// fatal for a run (no consistent release list means no usable dedup
/// ordering), while tile-level errors are recoverable (the affected
/// release is skipped for the affected point).
#[derive(Debug, Error)]
pub enum WaybackError {
    /// HTTP transport error (connection failure, timeout, bad TLS).
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Metadata endpoint answered with a non-success status.
    #[error("Catalog request failed with HTTP {0}")]
    CatalogStatus(u16),

    /// Metadata document could not be parsed as the expected JSON shape.
    #[error("Catalog parse error: {0}")]
    CatalogParse(#[from] serde_json::Error),

    /// A release name carried no 4-digit year to index it by.
    #[error("No 4-digit year in release name {0:?}")]
    YearNotFound(String),

    /// Tile request answered with a non-redirect, non-success status.
    #[error("Tile fetch failed with HTTP {status}")]
    TileFetch {
        /// The final HTTP status code.
        status: u16,
    },

    /// Redirect response without a `Location` header.
    #[error("Redirect response is missing a Location header")]
    MissingLocation,

    /// `Location` header that could not be resolved into a URL.
    #[error("Unresolvable redirect location {0:?}")]
    BadLocation(String),

    /// Redirect chain exceeded the depth cap.
    #[error("Tile fetch exceeded {limit} redirects")]
    TooManyRedirects {
        /// Maximum number of redirects that were followed.
        limit: usize,
    },

    /// Invalid zoom level.
    #[error("Invalid zoom level {0} (must be 0-23)")]
    InvalidZoomLevel(u8),
}
