//! Release catalog parsing.
//!
//! The Wayback metadata endpoint publishes its historical snapshots as a
//! `Selection` array, each entry carrying a revision number (`M`) and a
//! display name like `World Imagery (Wayback 2023-10-11)`. The catalog
//! order is the provider's chronological order and is preserved as-is;
//! dedup tie-breaking depends on it.

use crate::{Result, WaybackError};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Display-name wrapper around the release date label.
const LABEL_PREFIX: &str = "World Imagery (Wayback ";
const LABEL_SUFFIX: &str = ")";

/// One historical snapshot of the imagery dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Provider revision identifier, used in tile URLs.
    #[serde(rename = "revisionId")]
    pub revision: String,
    /// Human-readable date label, e.g. `2023-10-11`.
    pub label: String,
    /// Calendar year extracted from the release name.
    pub year: i32,
}

/// Raw metadata document shape.
#[derive(Debug, Deserialize)]
struct CatalogDoc {
    #[serde(rename = "Selection")]
    selection: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "M", deserialize_with = "revision_string")]
    revision: String,
}

/// Accept the revision id as either a JSON number or a string.
fn revision_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n.to_string()),
        NumberOrString::String(s) if !s.is_empty() => Ok(s),
        NumberOrString::String(_) => Err(de::Error::custom("empty revision id")),
    }
}

/// Parse the metadata document into an ordered release list.
///
/// Provider order is preserved. When `min_year` is nonzero, releases from
/// earlier years are dropped. A release whose name carries no 4-digit year
/// makes the whole catalog unusable and fails the parse.
pub(crate) fn parse_catalog(body: &str, min_year: i32) -> Result<Vec<Release>> {
    let doc: CatalogDoc = serde_json::from_str(body)?;

    let mut releases = Vec::with_capacity(doc.selection.len());
    for entry in doc.selection {
        let year = find_year(&entry.name).ok_or_else(|| WaybackError::YearNotFound(entry.name.clone()))?;
        if min_year > 0 && year < min_year {
            continue;
        }
        releases.push(Release {
            revision: entry.revision,
            label: date_label(&entry.name).to_string(),
            year,
        });
    }

    Ok(releases)
}

/// Extract the date label from a release name.
///
/// Strips the `World Imagery (Wayback ...)` wrapper when present; an
/// unwrapped name is used verbatim.
fn date_label(name: &str) -> &str {
    name.strip_prefix(LABEL_PREFIX)
        .and_then(|rest| rest.strip_suffix(LABEL_SUFFIX))
        .unwrap_or(name)
}

/// Find the first window of four consecutive ASCII digits.
fn find_year(name: &str) -> Option<i32> {
    let bytes = name.as_bytes();
    bytes
        .windows(4)
        .position(|w| w.iter().all(u8::is_ascii_digit))
        .and_then(|start| name[start..start + 4].parse().ok())
}
