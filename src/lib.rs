//! Extract and name the dominant colors of raster images.
//!
//! An image is decoded and normalized to a fixed 500×500 sample grid, the
//! samples are grouped by seeded k-means clustering in RGB space, and each
//! cluster centroid is matched against a fixed palette of 27 named colors.
//! The result is a ranked list of named, confidence-scored color matches.
//!
//! ```no_run
//! let bytes = std::fs::read("carpet.jpg").unwrap();
//! for m in dominant::summarize(&bytes, 3) {
//!     println!("{}", m);
//! }
//! ```
//!
//! Unreadable inputs never fail the pipeline: [`summarize`] converts them
//! into `"Error"` placeholder records, so batches run start to finish past
//! corrupt files.

#![deny(missing_docs)]

pub use error::{Error, Result};
pub use kmeans::{cluster, ColorCluster, DEFAULT_SEED, N_INIT};
pub use names::{name_of, PALETTE};
pub use sampler::{sample, SAMPLE_EDGE, SAMPLE_SIZE};
pub use summary::{parse_hex, summarize, summarize_path, to_hex, ColorMatch, DEFAULT_K};

mod error;
mod kmeans;
mod names;
mod sampler;
mod summary;
