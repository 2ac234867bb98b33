//! Decode an image and produce a fixed-size set of RGB pixel samples.
//!
//! Every input is normalized to the same 500×500 sample grid, so clustering
//! cost is bounded by the sample size rather than the source resolution, and
//! cluster shares are comparable across images of any size.

use image::imageops::{resize, FilterType};
use image::Rgb;

use crate::error::Result;

/// Edge length of the canonical sample grid.
pub const SAMPLE_EDGE: u32 = 500;

/// Number of pixels produced by [`sample`]: 500 × 500.
pub const SAMPLE_SIZE: usize = (SAMPLE_EDGE * SAMPLE_EDGE) as usize;

/// Decode `bytes` and return exactly [`SAMPLE_SIZE`] RGB samples.
///
/// Grayscale and indexed inputs are expanded to RGB; an alpha channel is
/// dropped. Inputs that are not already 500×500 are resampled with Lanczos3.
///
/// # Errors
///
/// Returns [`crate::Error::Decode`] if `bytes` is not a supported raster
/// format (JPEG, PNG, BMP, TIFF and WEBP are enabled).
pub fn sample(bytes: &[u8]) -> Result<Vec<Rgb<u8>>> {
    let decoded = image::load_from_memory(bytes)?;
    let rgb = decoded.into_rgb8();

    let scaled = if rgb.dimensions() == (SAMPLE_EDGE, SAMPLE_EDGE) {
        rgb
    } else {
        resize(&rgb, SAMPLE_EDGE, SAMPLE_EDGE, FilterType::Lanczos3)
    };

    Ok(scaled.pixels().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use image::RgbImage;
    use std::io::Cursor;

    fn png_bytes(img: &RgbImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn sample_count_is_fixed_regardless_of_input_size() {
        for (w, h) in [(1, 1), (20, 700), (500, 500), (813, 311)] {
            let img = RgbImage::from_pixel(w, h, Rgb([12, 200, 99]));
            let pixels = sample(&png_bytes(&img)).unwrap();
            assert_eq!(pixels.len(), SAMPLE_SIZE, "for source {}x{}", w, h);
        }
    }

    #[test]
    fn solid_image_samples_stay_solid() {
        let img = RgbImage::from_pixel(64, 64, Rgb([190, 40, 40]));
        let pixels = sample(&png_bytes(&img)).unwrap();
        assert!(pixels.iter().all(|p| *p == Rgb([190, 40, 40])));
    }

    #[test]
    fn exact_size_input_is_passed_through_unscaled() {
        let mut img = RgbImage::from_pixel(500, 500, Rgb([0, 0, 0]));
        img.put_pixel(499, 0, Rgb([255, 255, 255]));
        let pixels = sample(&png_bytes(&img)).unwrap();
        assert_eq!(pixels[499], Rgb([255, 255, 255]));
        assert_eq!(pixels[500], Rgb([0, 0, 0]));
    }

    #[test]
    fn rgba_alpha_is_dropped() {
        let img = image::RgbaImage::from_pixel(16, 16, image::Rgba([60, 100, 160, 128]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();

        let pixels = sample(&buf.into_inner()).unwrap();
        assert!(pixels.iter().all(|p| *p == Rgb([60, 100, 160])));
    }

    #[test]
    fn garbage_bytes_fail_with_decode_error() {
        let err = sample(b"definitely not an image").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
