//! Iterative centroid clustering of pixel samples.
//!
//! Runs Lloyd's algorithm with k-means++ seeding in Euclidean RGB space.
//! Identical pixels are merged into weighted color entries first, so the
//! per-iteration cost scales with the number of distinct colors rather than
//! the raw sample count.
//!
//! k-means only approximates the optimal partition and can get stuck in a
//! local minimum, so every call runs [`N_INIT`] independently seeded trials
//! and keeps the one with the lowest within-cluster sum of squared
//! distances. Seeds are derived from a fixed base seed, which makes the
//! result reproducible for a given input.

use std::cmp::Reverse;
use std::collections::HashMap;

use image::Rgb;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};

/// Base seed for centroid initialization, matching across runs.
pub const DEFAULT_SEED: u64 = 42;

/// Number of independently seeded clustering trials per call.
pub const N_INIT: u64 = 10;

/// Iteration budget per trial. If a trial has not converged by then, the
/// best partition found so far is used.
const MAX_ITERATIONS: usize = 100;

/// A trial has converged once no centroid channel moves more than this.
const CONVERGENCE: f64 = 1e-3;

/// One dominant color group of an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorCluster {
    /// Cluster centroid, truncated to integer channels.
    pub centroid: Rgb<u8>,
    /// Number of samples assigned to this centroid.
    pub count: usize,
    /// Fraction of all samples assigned to this centroid, in `[0, 1]`.
    pub share: f64,
}

/// Partition `pixels` into exactly `k` clusters, sorted by descending count.
///
/// Clusters with equal counts are ordered by centroid channels ascending
/// (red, then green, then blue). Centroid channels are truncated, not
/// rounded. Counts always sum to `pixels.len()`; a cluster may end up with
/// count 0 when the image has fewer distinct colors than `k`.
///
/// # Errors
///
/// Returns [`Error::Clustering`] only for degenerate input: `k == 0` or an
/// empty pixel slice.
pub fn cluster(pixels: &[Rgb<u8>], k: usize) -> Result<Vec<ColorCluster>> {
    cluster_seeded(pixels, k, DEFAULT_SEED)
}

/// Like [`cluster`], with an explicit base seed.
pub fn cluster_seeded(pixels: &[Rgb<u8>], k: usize, seed: u64) -> Result<Vec<ColorCluster>> {
    if k == 0 {
        return Err(Error::Clustering("cluster count must be at least 1".into()));
    }
    if pixels.is_empty() {
        return Err(Error::Clustering("no pixels to cluster".into()));
    }

    let (colors, weights) = dedup(pixels);

    let mut best: Option<Trial> = None;
    for trial in 0..N_INIT {
        let candidate = lloyd(&colors, &weights, k, seed.wrapping_add(trial));
        // Strictly lower wcss wins, so equal trials keep the earliest seed.
        if best.as_ref().is_none_or(|b| candidate.wcss < b.wcss) {
            best = Some(candidate);
        }
    }
    // k >= 1 and N_INIT > 0, so a trial always exists.
    let Trial { centroids, .. } = best.expect("at least one clustering trial");

    let mut counts = vec![0usize; k];
    for (color, &weight) in colors.iter().zip(&weights) {
        counts[nearest(color, &centroids)] += weight as usize;
    }

    let total = pixels.len() as f64;
    let mut clusters: Vec<ColorCluster> = centroids
        .iter()
        .zip(&counts)
        .map(|(centroid, &count)| ColorCluster {
            centroid: truncate(centroid),
            count,
            share: count as f64 / total,
        })
        .collect();
    clusters.sort_by_key(|c| (Reverse(c.count), c.centroid.0));

    log::debug!(
        "clustered {} pixels ({} distinct) into {} groups",
        pixels.len(),
        colors.len(),
        k
    );
    Ok(clusters)
}

/// Outcome of a single seeded Lloyd run.
struct Trial {
    centroids: Vec<[f64; 3]>,
    wcss: f64,
}

/// Merge identical pixels into weighted entries, in first-seen order.
///
/// First-seen order keeps the whole pipeline deterministic; iterating the
/// map directly would not be.
fn dedup(pixels: &[Rgb<u8>]) -> (Vec<[f64; 3]>, Vec<u32>) {
    let mut index: HashMap<[u8; 3], usize> = HashMap::new();
    let mut colors = Vec::new();
    let mut weights: Vec<u32> = Vec::new();

    for pixel in pixels {
        let slot = *index.entry(pixel.0).or_insert_with(|| {
            colors.push(pixel.0.map(f64::from));
            weights.push(0);
            colors.len() - 1
        });
        weights[slot] += 1;
    }

    (colors, weights)
}

fn distance_sq(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

/// Index of the closest centroid; equal distances resolve to the lowest index.
fn nearest(color: &[f64; 3], centroids: &[[f64; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let dist = distance_sq(color, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

/// k-means++ seeding over weighted colors.
///
/// The first centroid is drawn proportionally to pixel weight, each further
/// one proportionally to weight times squared distance to its closest
/// already-chosen centroid. Once every remaining color coincides with a
/// chosen centroid the distance weights collapse to zero; further centroids
/// are then drawn uniformly, which duplicates existing ones and leaves the
/// surplus clusters empty.
fn plus_plus_init(
    colors: &[[f64; 3]],
    weights: &[u32],
    k: usize,
    rng: &mut StdRng,
) -> Vec<[f64; 3]> {
    let mut centroids = Vec::with_capacity(k);

    let first = weighted_pick(rng, weights.iter().map(|&w| f64::from(w)));
    centroids.push(colors[first]);

    let mut dist: Vec<f64> = colors
        .iter()
        .map(|c| distance_sq(c, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let pick = weighted_pick(
            rng,
            dist.iter().zip(weights).map(|(&d, &w)| d * f64::from(w)),
        );
        let newest = colors[pick];
        centroids.push(newest);
        for (d, c) in dist.iter_mut().zip(colors) {
            let to_new = distance_sq(c, &newest);
            if to_new < *d {
                *d = to_new;
            }
        }
    }

    centroids
}

/// Draw an index proportionally to `weights`; uniform if all weights are 0.
fn weighted_pick(rng: &mut StdRng, weights: impl Iterator<Item = f64> + Clone) -> usize {
    let total: f64 = weights.clone().sum();
    if total <= 0.0 {
        return rng.gen_range(0..weights.count());
    }

    let mut remaining = rng.gen::<f64>() * total;
    let mut last = 0;
    for (i, w) in weights.enumerate() {
        last = i;
        remaining -= w;
        if remaining <= 0.0 {
            return i;
        }
    }
    // Floating point sums can leave a sliver of `remaining`.
    last
}

/// One seeded Lloyd run over weighted colors.
fn lloyd(colors: &[[f64; 3]], weights: &[u32], k: usize, seed: u64) -> Trial {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut centroids = plus_plus_init(colors, weights, k, &mut rng);

    for _ in 0..MAX_ITERATIONS {
        let mut sums = vec![[0.0f64; 3]; k];
        let mut totals = vec![0.0f64; k];
        for (color, &weight) in colors.iter().zip(weights) {
            let slot = nearest(color, &centroids);
            let w = f64::from(weight);
            for (sum, channel) in sums[slot].iter_mut().zip(color) {
                *sum += w * channel;
            }
            totals[slot] += w;
        }

        let mut moved = 0.0f64;
        for ((centroid, sum), &total) in centroids.iter_mut().zip(&sums).zip(&totals) {
            // An empty cluster keeps its previous centroid.
            if total == 0.0 {
                continue;
            }
            for (channel, s) in centroid.iter_mut().zip(sum) {
                let next = s / total;
                moved = moved.max((next - *channel).abs());
                *channel = next;
            }
        }
        if moved < CONVERGENCE {
            break;
        }
    }

    let wcss = colors
        .iter()
        .zip(weights)
        .map(|(c, &w)| f64::from(w) * distance_sq(c, &centroids[nearest(c, &centroids)]))
        .sum();

    Trial { centroids, wcss }
}

/// Truncate (floor) centroid channels to u8, the reference behavior.
fn truncate(centroid: &[f64; 3]) -> Rgb<u8> {
    Rgb(centroid.map(|c| c.clamp(0.0, 255.0) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(color: [u8; 3], n: usize) -> Vec<Rgb<u8>> {
        vec![Rgb(color); n]
    }

    #[test]
    fn solid_input_yields_exact_centroid() {
        let clusters = cluster(&solid([190, 40, 40], 1000), 1).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].centroid, Rgb([190, 40, 40]));
        assert_eq!(clusters[0].count, 1000);
        assert_eq!(clusters[0].share, 1.0);
    }

    #[test]
    fn requesting_more_clusters_than_colors_leaves_empty_clusters() {
        let clusters = cluster(&solid([10, 20, 30], 100), 3).unwrap();
        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[0].count, 100);
        assert_eq!(clusters[1].count, 0);
        assert_eq!(clusters[2].count, 0);
        assert_eq!(clusters.iter().map(|c| c.count).sum::<usize>(), 100);
    }

    #[test]
    fn two_color_input_recovers_both_colors_and_shares() {
        let mut pixels = solid([255, 255, 255], 600);
        pixels.extend(solid([0, 0, 0], 400));

        let clusters = cluster(&pixels, 2).unwrap();
        assert_eq!(clusters[0].centroid, Rgb([255, 255, 255]));
        assert_eq!(clusters[0].count, 600);
        assert_eq!(clusters[1].centroid, Rgb([0, 0, 0]));
        assert!((clusters[1].share - 0.4).abs() < 1e-9);
    }

    #[test]
    fn clusters_are_sorted_by_descending_count() {
        let mut pixels = solid([200, 0, 0], 100);
        pixels.extend(solid([0, 200, 0], 300));
        pixels.extend(solid([0, 0, 200], 200));

        let clusters = cluster(&pixels, 3).unwrap();
        let counts: Vec<usize> = clusters.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![300, 200, 100]);
    }

    #[test]
    fn count_ties_order_by_centroid_channels() {
        let mut pixels = solid([255, 255, 255], 500);
        pixels.extend(solid([0, 0, 0], 500));

        let clusters = cluster(&pixels, 2).unwrap();
        assert_eq!(clusters[0].centroid, Rgb([0, 0, 0]));
        assert_eq!(clusters[1].centroid, Rgb([255, 255, 255]));
    }

    #[test]
    fn centroid_channels_are_truncated_not_rounded() {
        // Mean red channel is 10.666..; truncation gives 10, rounding 11.
        let pixels = vec![Rgb([10, 0, 0]), Rgb([10, 0, 0]), Rgb([12, 0, 0])];
        let clusters = cluster(&pixels, 1).unwrap();
        assert_eq!(clusters[0].centroid, Rgb([10, 0, 0]));
    }

    #[test]
    fn same_input_same_seed_is_deterministic() {
        let mut pixels = Vec::new();
        for i in 0..600u32 {
            let v = (i % 251) as u8;
            pixels.push(Rgb([v, v.wrapping_mul(3), 255 - v]));
        }
        let a = cluster(&pixels, 4).unwrap();
        let b = cluster(&pixels, 4).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn permuted_input_finds_the_same_partition() {
        let mut pixels = solid([220, 130, 50], 700);
        pixels.extend(solid([30, 70, 40], 300));
        let forward = cluster(&pixels, 2).unwrap();

        pixels.reverse();
        let reversed = cluster(&pixels, 2).unwrap();

        for (a, b) in forward.iter().zip(&reversed) {
            assert_eq!(a.centroid, b.centroid);
            assert_eq!(a.count, b.count);
        }
    }

    #[test]
    fn degenerate_input_is_rejected() {
        assert!(cluster(&solid([1, 2, 3], 10), 0).is_err());
        assert!(cluster(&[], 2).is_err());
    }
}
