//! Error types for dominant-color extraction

use thiserror::Error;

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while extracting colors from an image
#[derive(Error, Debug)]
pub enum Error {
    /// The input could not be decoded as a supported raster format
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The input file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the file that could not be read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Clustering could not produce a partition. Valid pixel input never
    /// triggers this; it exists to contain misuse such as `k == 0`.
    #[error("clustering failed: {0}")]
    Clustering(String),
}
