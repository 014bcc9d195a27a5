//! Error types for the classifier.

use thiserror::Error;

/// Errors that can occur while scoring tiles.
#[derive(Debug, Error)]
pub enum GreenError {
    /// Archive error (manifest missing, unreadable, or unwritable).
    #[error(transparent)]
    Archive(#[from] waylapse_archive::ArchiveError),

    /// Image decoding error.
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    /// The manifest listed no tile that could be analyzed.
    #[error("No analyzable tiles in the archive")]
    NoTiles,
}
