//! Per-point content deduplication.
//!
//! Tracks which tile contents have already been seen for one point, keyed
//! by SHA-256 over the raw bytes. The first release observed with a given
//! digest owns that visual appearance; later byte-identical tiles are
//! reported as duplicates. Catalog order decides ties, so the tracker must
//! be fed releases in chronological catalog order and reset per point.

use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// The retained tile that first produced a given content digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetainedRef {
    /// Release date label of the retained tile.
    pub date: String,
    /// Filename of the retained tile.
    pub filename: String,
}

/// Verdict for one observed tile.
#[derive(Debug, PartialEq, Eq)]
pub enum Observation<'a> {
    /// First occurrence of this content; the tile is retained.
    Unique,
    /// Byte-identical to an earlier retained tile.
    Duplicate(&'a RetainedRef),
}

/// Dedup state for a single point.
#[derive(Debug, Default)]
pub struct DedupTracker {
    seen: HashMap<[u8; 32], RetainedRef>,
}

impl DedupTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one tile's bytes under the given release label and filename.
    ///
    /// Records the mapping on first occurrence; on a repeat digest the
    /// earlier retained tile is returned and no state changes.
    pub fn observe(&mut self, bytes: &[u8], date: &str, filename: &str) -> Observation<'_> {
        let digest: [u8; 32] = Sha256::digest(bytes).into();

        match self.seen.entry(digest) {
            std::collections::hash_map::Entry::Occupied(entry) => {
                Observation::Duplicate(entry.into_mut())
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(RetainedRef {
                    date: date.to_string(),
                    filename: filename.to_string(),
                });
                Observation::Unique
            }
        }
    }

    /// Number of distinct contents seen so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no content has been observed yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let mut tracker = DedupTracker::new();

        assert_eq!(tracker.observe(b"AAA", "2015", "2015.jpg"), Observation::Unique);

        match tracker.observe(b"AAA", "2017", "2017.jpg") {
            Observation::Duplicate(first) => {
                assert_eq!(first.date, "2015");
                assert_eq!(first.filename, "2015.jpg");
            }
            Observation::Unique => panic!("repeat content must be a duplicate"),
        }

        // The earliest owner is stable even after more repeats.
        match tracker.observe(b"AAA", "2019", "2019.jpg") {
            Observation::Duplicate(first) => assert_eq!(first.date, "2015"),
            Observation::Unique => panic!("repeat content must be a duplicate"),
        }
    }

    #[test]
    fn test_synthetic_release_sequence() {
        // Releases 0, 2, 4 share bytes; 1 and 3 are distinct.
        let contents: [&[u8]; 5] = [b"same", b"one", b"same", b"two", b"same"];
        let mut tracker = DedupTracker::new();
        let mut retained = Vec::new();
        let mut duplicates = 0;

        for (i, bytes) in contents.iter().enumerate() {
            match tracker.observe(bytes, &i.to_string(), &format!("{i}.jpg")) {
                Observation::Unique => retained.push(i),
                Observation::Duplicate(_) => duplicates += 1,
            }
        }

        assert_eq!(retained, [0, 1, 3]);
        assert_eq!(duplicates, 2);
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn test_distinct_contents_all_unique() {
        let mut tracker = DedupTracker::new();
        assert!(tracker.is_empty());
        assert_eq!(tracker.observe(b"a", "d1", "f1"), Observation::Unique);
        assert_eq!(tracker.observe(b"b", "d2", "f2"), Observation::Unique);
        assert_eq!(tracker.len(), 2);
    }
}
