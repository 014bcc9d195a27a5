//! # waylapse-green
//!
//! Vegetation coverage classifier for archived imagery tiles.
//!
//! Consumes the manifest produced by the archive pipeline, scores every
//! retained tile for vegetation coverage with a fixed pixel-color
//! heuristic, and writes the percentages back into the manifest along
//! with aggregate statistics and a flattened, coverage-sorted tile view.
//! Everything it writes is additive to the structure the archive produced.
//!
//! ## Heuristic
//!
//! A pixel counts as vegetation when all three hold:
//! - Excess Green index `2G - R - B` exceeds a fixed threshold
//! - green dominates blue
//! - Green-Red Vegetation Index `(G - R) / (G + R)` exceeds a fixed threshold
//!
//! Very dark and very bright pixels (shadow, cloud, glare) are excluded
//! from the vegetation count up front.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! let summary = waylapse_green::annotate(Path::new("tiles"))?;
//! println!(
//!     "analyzed {} tiles, green {}% - {}%",
//!     summary.analyzed, summary.stats.min, summary.stats.max
//! );
//! # Ok::<(), waylapse_green::GreenError>(())
//! ```

mod analyze;
mod error;

pub use analyze::{
    analyze_file, annotate, green_percent, GreenSummary, EXG_THRESHOLD, GRVI_THRESHOLD,
    MAX_BRIGHTNESS, MIN_BRIGHTNESS,
};
pub use error::GreenError;

/// Result type for classifier operations.
pub type Result<T> = std::result::Result<T, GreenError>;
