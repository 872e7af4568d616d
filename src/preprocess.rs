// Image preparation before OCR
use image::{imageops, DynamicImage, GrayImage};
use image::imageops::FilterType;

use crate::config;

/// Knobs for [`prepare`].
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareOptions {
    /// Images narrower or shorter than this get upscaled
    pub min_dimension: u32,
    pub upscale_factor: u32,
    /// Invert light-on-dark images so the text ends up dark
    pub auto_invert: bool,
    /// Mean brightness below this counts as a dark background
    pub invert_threshold: f64,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            min_dimension: config::preprocess::MIN_DIMENSION,
            upscale_factor: config::preprocess::UPSCALE_FACTOR,
            auto_invert: true,
            invert_threshold: config::preprocess::INVERT_THRESHOLD,
        }
    }
}

/// Grayscale, upscale small images and normalize polarity.
///
/// Nothing else is done to the pixels: no blur, no thresholding, no
/// morphology. Tesseract copes better with the untouched layout.
pub fn prepare(image: &DynamicImage, options: &PrepareOptions) -> GrayImage {
    let (width, height) = (image.width(), image.height());

    let scaled = if needs_upscale(width, height, options) {
        let factor = options.upscale_factor.max(1);
        crate::log_debug!(
            "Upscaling {}x{} image by {} before OCR",
            width, height, factor
        );
        image.resize_exact(width * factor, height * factor, FilterType::Lanczos3)
    } else {
        image.clone()
    };

    let mut gray = scaled.to_luma8();

    if options.auto_invert {
        let mean = mean_brightness(&gray);
        if mean < options.invert_threshold {
            crate::log_debug!("Mean brightness {:.1} - inverting light-on-dark image", mean);
            imageops::invert(&mut gray);
        }
    }

    gray
}

fn needs_upscale(width: u32, height: u32, options: &PrepareOptions) -> bool {
    width > 0 && height > 0 && (width < options.min_dimension || height < options.min_dimension)
}

/// Average luma over all pixels (0.0 - 255.0). Empty images count as white.
pub fn mean_brightness(image: &GrayImage) -> f64 {
    let pixel_count = image.width() as u64 * image.height() as u64;
    if pixel_count == 0 {
        return 255.0;
    }
    let sum: u64 = image.pixels().map(|p| p.0[0] as u64).sum();
    sum as f64 / pixel_count as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    fn solid_rgb(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([value, value, value])))
    }

    #[test]
    fn test_small_image_is_doubled() {
        let prepared = prepare(&solid_rgb(120, 400, 240), &PrepareOptions::default());
        assert_eq!(prepared.dimensions(), (240, 800));
    }

    #[test]
    fn test_large_image_keeps_size() {
        let prepared = prepare(&solid_rgb(320, 300, 240), &PrepareOptions::default());
        assert_eq!(prepared.dimensions(), (320, 300));
    }

    #[test]
    fn test_dark_background_is_inverted() {
        let prepared = prepare(&solid_rgb(300, 300, 20), &PrepareOptions::default());
        assert_eq!(prepared.get_pixel(0, 0), &Luma([235]));
    }

    #[test]
    fn test_light_background_untouched() {
        let prepared = prepare(&solid_rgb(300, 300, 200), &PrepareOptions::default());
        assert_eq!(prepared.get_pixel(10, 10), &Luma([200]));
    }

    #[test]
    fn test_invert_can_be_disabled() {
        let options = PrepareOptions { auto_invert: false, ..PrepareOptions::default() };
        let prepared = prepare(&solid_rgb(300, 300, 20), &options);
        assert_eq!(prepared.get_pixel(0, 0), &Luma([20]));
    }

    #[test]
    fn test_mean_brightness() {
        let mut gray = GrayImage::from_pixel(2, 1, Luma([0]));
        gray.put_pixel(1, 0, Luma([255]));
        assert!((mean_brightness(&gray) - 127.5).abs() < f64::EPSILON);
        assert_eq!(mean_brightness(&GrayImage::new(0, 0)), 255.0);
    }
}
