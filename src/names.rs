//! Map any RGB triple to the closest entry of the fixed named-color palette.

use image::Rgb;
use itertools::Itertools;

/// The named-color palette, in declaration order.
///
/// Declaration order is part of the contract: when a color is equally close
/// to several entries, the first declared entry wins. The table is a plain
/// process-wide constant; at 27 entries a linear scan beats any index.
pub const PALETTE: [(&str, [u8; 3]); 27] = [
    ("White", [255, 255, 255]),
    ("Ivory", [240, 234, 214]),
    ("Cream", [245, 235, 210]),
    ("Beige", [220, 205, 180]),
    ("Tan", [195, 165, 120]),
    ("Light Brown", [180, 130, 85]),
    ("Brown", [130, 80, 40]),
    ("Dark Brown", [80, 50, 25]),
    ("Light Grey", [200, 200, 200]),
    ("Grey", [150, 150, 150]),
    ("Dark Grey", [90, 90, 90]),
    ("Black", [20, 20, 20]),
    ("Red", [190, 40, 40]),
    ("Dark Red", [120, 20, 20]),
    ("Pink", [220, 150, 160]),
    ("Orange", [220, 130, 50]),
    ("Yellow", [230, 210, 80]),
    ("Gold", [200, 170, 60]),
    ("Light Green", [130, 180, 120]),
    ("Green", [60, 120, 60]),
    ("Dark Green", [30, 70, 40]),
    ("Light Blue", [140, 180, 210]),
    ("Blue", [60, 100, 160]),
    ("Dark Blue", [25, 40, 90]),
    ("Navy", [20, 30, 70]),
    ("Purple", [110, 60, 130]),
    ("Light Purple", [170, 140, 190]),
];

/// Name of the palette entry closest to `rgb` in Euclidean RGB distance.
pub fn name_of(rgb: Rgb<u8>) -> &'static str {
    let index = PALETTE
        .iter()
        .position_min_by_key(|(_, reference)| distance_sq(rgb.0, *reference))
        .expect("palette is non-empty");
    PALETTE[index].0
}

/// Squared Euclidean distance between two RGB triples.
fn distance_sq(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(&b)
        .map(|(&x, &y)| {
            let d = i32::from(x) - i32::from(y);
            (d * d) as u32
        })
        .sum()
}
