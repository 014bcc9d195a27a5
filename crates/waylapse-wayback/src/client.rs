//! HTTP client for the Wayback metadata and tile endpoints.

use crate::catalog::{self, Release};
use crate::{Result, TileCoord, WaybackError};
use reqwest::blocking::Client;
use reqwest::{redirect, StatusCode, Url};
use std::time::Duration;
use tracing::debug;

/// Production Wayback service root.
const WAYBACK_BASE_URL: &str = "https://wayback.maptiles.arcgis.com";

/// Service path shared by the metadata and tile endpoints.
const SERVICE_PATH: &str = "arcgis/rest/services/World_Imagery/MapServer";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of redirect hops followed for one tile fetch.
///
/// The tile endpoint normally answers with a single redirect to the asset
/// store; the cap exists so a cyclic redirect chain fails instead of
/// looping forever.
pub const MAX_REDIRECTS: usize = 5;

/// Uniform tile-fetch interface.
///
/// The archive pipeline only needs "give me the bytes of this tile in this
/// release"; abstracting that behind a trait keeps the scheduling model and
/// the dedup logic independent of the transport, and lets tests substitute
/// a canned source.
pub trait TileSource {
    /// Fetch the image bytes for one tile in one release.
    fn fetch_tile(&self, revision: &str, coord: TileCoord) -> Result<Vec<u8>>;
}

/// Client for the Esri Wayback service.
///
/// Automatic redirect handling is disabled on the underlying HTTP client;
/// tile fetches resolve `Location` headers themselves (absolute or
/// server-relative), bounded by [`MAX_REDIRECTS`].
#[derive(Debug)]
pub struct WaybackClient {
    /// HTTP client (redirects off, per-request timeout).
    client: Client,
    /// Service root, overridable for tests.
    base_url: String,
}

impl WaybackClient {
    /// Create a client against the production Wayback service.
    pub fn new() -> Result<Self> {
        Self::with_base_url(WAYBACK_BASE_URL)
    }

    /// Create a client against an alternate service root.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the release catalog from the metadata endpoint.
    ///
    /// Returns releases in the provider's chronological order. When
    /// `min_year` is nonzero, releases from earlier years are dropped.
    /// Any failure here is fatal for a run: dedup ordering needs a
    /// complete, consistent release list.
    pub fn fetch_catalog(&self, min_year: i32) -> Result<Vec<Release>> {
        let url = format!("{}/{}?f=json", self.base_url, SERVICE_PATH);
        debug!(%url, "fetching release catalog");

        let response = self.client.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(WaybackError::CatalogStatus(status.as_u16()));
        }

        let body = response.text()?;
        catalog::parse_catalog(&body, min_year)
    }

    /// URL of one tile in one release.
    pub fn tile_url(&self, revision: &str, coord: TileCoord) -> String {
        format!(
            "{}/{}/tile/{}/{}/{}/{}",
            self.base_url, SERVICE_PATH, revision, coord.z, coord.y, coord.x
        )
    }
}

impl TileSource for WaybackClient {
    /// Fetch a tile, following 301/302 redirects up to [`MAX_REDIRECTS`].
    ///
    /// Returns the final response body; intermediate redirect bodies are
    /// discarded. Never touches the filesystem, so a failed fetch leaves
    /// no partial file behind.
    fn fetch_tile(&self, revision: &str, coord: TileCoord) -> Result<Vec<u8>> {
        let mut url = self.tile_url(revision, coord);

        for _ in 0..=MAX_REDIRECTS {
            let response = self.client.get(&url).send()?;
            let status = response.status();

            if status == StatusCode::MOVED_PERMANENTLY || status == StatusCode::FOUND {
                let location = response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .ok_or(WaybackError::MissingLocation)?
                    .to_str()
                    .map_err(|_| WaybackError::MissingLocation)?
                    .to_string();

                url = resolve_location(&url, &location)?;
                debug!(%url, "following tile redirect");
                continue;
            }

            if !status.is_success() {
                return Err(WaybackError::TileFetch {
                    status: status.as_u16(),
                });
            }

            return Ok(response.bytes()?.to_vec());
        }

        Err(WaybackError::TooManyRedirects {
            limit: MAX_REDIRECTS,
        })
    }
}

/// Resolve a `Location` header against the URL that produced it.
///
/// Handles both absolute URLs and server-relative paths.
fn resolve_location(current: &str, location: &str) -> Result<String> {
    let base = Url::parse(current).map_err(|_| WaybackError::BadLocation(location.to_string()))?;
    let resolved = base
        .join(location)
        .map_err(|_| WaybackError::BadLocation(location.to_string()))?;
    Ok(resolved.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_url() {
        let client = WaybackClient::new().unwrap();
        let coord = TileCoord::new(18, 77182, 98559);
        assert_eq!(
            client.tile_url("11475", coord),
            "https://wayback.maptiles.arcgis.com/arcgis/rest/services/World_Imagery/MapServer/tile/11475/18/98559/77182"
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = WaybackClient::with_base_url("http://127.0.0.1:8080/").unwrap();
        let coord = TileCoord::new(1, 0, 0);
        assert_eq!(
            client.tile_url("7", coord),
            "http://127.0.0.1:8080/arcgis/rest/services/World_Imagery/MapServer/tile/7/1/0/0"
        );
    }

    #[test]
    fn test_resolve_absolute_location() {
        let resolved =
            resolve_location("https://a.example/tile/1", "https://cdn.example/asset/9").unwrap();
        assert_eq!(resolved, "https://cdn.example/asset/9");
    }

    #[test]
    fn test_resolve_server_relative_location() {
        let resolved = resolve_location("https://a.example/tile/1?f=jpg", "/asset/9").unwrap();
        assert_eq!(resolved, "https://a.example/asset/9");
    }

    #[test]
    fn test_resolve_bad_location() {
        assert!(matches!(
            resolve_location("https://a.example/tile/1", "http://["),
            Err(WaybackError::BadLocation(_))
        ));
    }
}
