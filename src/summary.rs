//! Ranked, named, confidence-scored color summary of a single image.
//!
//! [`summarize`] is the composition point of the pipeline: sample, cluster,
//! name. It also owns the failure-containment policy: an unreadable image is
//! logged and converted into placeholder records, so a batch caller always
//! gets exactly `k` records per image and never has to branch on failure.

use std::fmt;
use std::path::Path;

use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::kmeans::{self, ColorCluster};
use crate::{names, sampler};

/// Default number of dominant colors per image.
pub const DEFAULT_K: usize = 3;

/// One named dominant color of an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorMatch {
    /// Closest palette name for the cluster centroid.
    pub name: String,
    /// Centroid as a lowercase `#rrggbb` hex code.
    pub hex: String,
    /// Centroid channels.
    pub rgb: (u8, u8, u8),
    /// Percentage of samples in the cluster, rounded to one decimal place.
    pub confidence: f64,
}

impl ColorMatch {
    fn from_cluster(cluster: &ColorCluster) -> Self {
        let Rgb([r, g, b]) = cluster.centroid;
        ColorMatch {
            name: names::name_of(cluster.centroid).to_owned(),
            hex: to_hex(cluster.centroid),
            rgb: (r, g, b),
            confidence: (cluster.share * 1000.0).round() / 10.0,
        }
    }

    /// The placeholder record emitted for unreadable images.
    fn placeholder() -> Self {
        ColorMatch {
            name: "Error".to_owned(),
            hex: "#000000".to_owned(),
            rgb: (0, 0, 0),
            confidence: 0.0,
        }
    }
}

impl fmt::Display for ColorMatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:14} | {:>5.1}% | {}", self.name, self.confidence, self.hex)
    }
}

/// Format an RGB triple as a lowercase, `#`-prefixed 6-digit hex code.
pub fn to_hex(rgb: Rgb<u8>) -> String {
    let Rgb([r, g, b]) = rgb;
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Parse a `#rrggbb` hex code back into an RGB triple.
///
/// Accepts exactly the canonical form produced by [`to_hex`], with the `#`
/// optional and hex digits of either case.
pub fn parse_hex(hex: &str) -> Option<Rgb<u8>> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[2 * i..2 * i + 2], 16).ok();
    Some(Rgb([channel(0)?, channel(1)?, channel(2)?]))
}

/// Summarize the dominant colors of one image, given its raw bytes.
///
/// Returns exactly `k` records, ordered by descending cluster size. If the
/// bytes cannot be decoded, all `k` records are the `"Error"` placeholder
/// (`#000000`, confidence 0.0) and a diagnostic is logged; the failure never
/// propagates. Confidences of a successful summary sum to 100 up to
/// rounding.
pub fn summarize(bytes: &[u8], k: usize) -> Vec<ColorMatch> {
    if k == 0 {
        return Vec::new();
    }

    let pixels = match sampler::sample(bytes) {
        Ok(pixels) => pixels,
        Err(err) => return contain(err, k),
    };
    // `pixels` is non-empty and k >= 1 here, so clustering cannot fail.
    match kmeans::cluster(&pixels, k) {
        Ok(clusters) => clusters.iter().map(ColorMatch::from_cluster).collect(),
        Err(err) => contain(err, k),
    }
}

/// Summarize the dominant colors of the image at `path`.
///
/// Same contract as [`summarize`]; an unreadable file yields `k`
/// placeholder records.
pub fn summarize_path(path: impl AsRef<Path>, k: usize) -> Vec<ColorMatch> {
    let path = path.as_ref();
    match std::fs::read(path) {
        Ok(bytes) => summarize(&bytes, k),
        Err(source) => contain(
            Error::Io {
                path: path.display().to_string(),
                source,
            },
            k,
        ),
    }
}

fn contain(err: Error, k: usize) -> Vec<ColorMatch> {
    log::warn!("emitting {} placeholder records: {}", k, err);
    vec![ColorMatch::placeholder(); k]
}
