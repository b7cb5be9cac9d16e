//! Pure pixel transforms: no I/O, no configuration.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageBuffer, Rgb, RgbImage, Rgba};

/// Composite onto opaque white when the image carries alpha
///
/// Palette images with a transparent entry decode to RGBA, so they take the
/// same path. Images without alpha are only converted to 8-bit RGB.
pub fn flatten_to_rgb(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    ImageBuffer::from_fn(width, height, |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
    })
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (u32::from(channel), u32::from(alpha));
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

/// Source-space window that, scaled to `target`, covers it exactly
///
/// The factor is `max(tw / sw, th / sh)`; the window is the target divided
/// by it, clamped to the source. Returns `(x, y, width, height)`.
pub fn cover_window(source: (u32, u32), target: (u32, u32)) -> (u32, u32, u32, u32) {
    let (sw, sh) = (f64::from(source.0), f64::from(source.1));
    let (tw, th) = (f64::from(target.0), f64::from(target.1));
    let ratio = f64::max(tw / sw, th / sh);

    let width = ((tw / ratio).round() as u32).clamp(1, source.0);
    let height = ((th / ratio).round() as u32).clamp(1, source.1);
    let (x, y) = crop_origin(source, (width, height));
    (x, y, width, height)
}

/// Top-left corner of a centered crop; odd leftovers go to the trailing edge
pub fn crop_origin(outer: (u32, u32), window: (u32, u32)) -> (u32, u32) {
    (
        outer.0.saturating_sub(window.0) / 2,
        outer.1.saturating_sub(window.1) / 2,
    )
}

/// Cover-crop: cut the centered window, then scale it to `target`
///
/// The result is exactly `target` and never padded. Working memory is
/// bounded by the source and the target, whatever the aspect ratio.
pub fn cover_crop(img: &RgbImage, target: (u32, u32)) -> RgbImage {
    let (x, y, width, height) = cover_window(img.dimensions(), target);
    let window = imageops::crop_imm(img, x, y, width, height).to_image();

    if (width, height) == target {
        window
    } else {
        imageops::resize(&window, target.0, target.1, FilterType::Lanczos3)
    }
}

/// Shrink to `max_width` keeping the aspect; never upscales, never crops
pub fn fit_width(img: RgbImage, max_width: u32) -> RgbImage {
    let (width, height) = img.dimensions();
    if width <= max_width {
        return img;
    }

    let scaled_height =
        ((f64::from(height) * f64::from(max_width) / f64::from(width)).round() as u32).max(1);
    imageops::resize(&img, max_width, scaled_height, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: i16 = 2;

    fn assert_close(actual: Rgb<u8>, expected: [u8; 3]) {
        for (a, e) in actual.0.iter().zip(expected) {
            assert!(
                (i16::from(*a) - i16::from(e)).abs() <= TOLERANCE,
                "pixel {:?} not close to {:?}",
                actual.0,
                expected
            );
        }
    }

    fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
        ImageBuffer::from_pixel(width, height, Rgb(color))
    }

    #[test]
    fn test_cover_window_uses_max_ratio() {
        // landscape: height is the tight axis
        assert_eq!(cover_window((1000, 500), (300, 300)), (250, 0, 500, 500));
        // portrait
        assert_eq!(cover_window((400, 800), (600, 600)), (0, 200, 400, 400));
        // small sources upscale from a smaller window
        assert_eq!(cover_window((100, 50), (300, 300)), (25, 0, 50, 50));
        assert_eq!(cover_window((333, 500), (300, 300)), (0, 83, 333, 333));
    }

    #[test]
    fn test_cover_window_extreme_aspect_stays_in_source() {
        assert_eq!(cover_window((1, 20_000), (600, 600)), (0, 9_999, 1, 1));
        assert_eq!(cover_window((10_000_000, 1), (300, 300)), (4_999_999, 0, 1, 1));
    }

    #[test]
    fn test_crop_origin_floors_odd_leftover() {
        assert_eq!(crop_origin((600, 300), (300, 300)), (150, 0));
        assert_eq!(crop_origin((301, 300), (300, 300)), (0, 0));
        assert_eq!(crop_origin((300, 455), (300, 300)), (0, 77));
    }

    #[test]
    fn test_cover_crop_output_is_exact_target() {
        for (w, h) in [(1, 1), (333, 500), (60, 20), (300, 300), (601, 599), (7, 40), (1, 5000)] {
            let out = cover_crop(&solid(w, h, [10, 20, 30]), (300, 300));
            assert_eq!(out.dimensions(), (300, 300), "source {w}x{h}");
            let out = cover_crop(&solid(w, h, [10, 20, 30]), (600, 600));
            assert_eq!(out.dimensions(), (600, 600), "source {w}x{h}");
        }
    }

    #[test]
    fn test_cover_crop_never_pads() {
        let color = [200, 30, 60];
        for (w, h) in [(333, 500), (60, 20), (50, 51)] {
            let out = cover_crop(&solid(w, h, color), (300, 300));
            for pixel in out.pixels() {
                assert_close(*pixel, color);
            }
        }
    }

    #[test]
    fn test_cover_crop_keeps_the_center() {
        // left half red, right half blue; the 500x500 window spans x in 250..750
        let src = ImageBuffer::from_fn(1000, 500, |x, _| {
            if x < 500 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) }
        });
        let out = cover_crop(&src, (300, 300));
        assert_close(*out.get_pixel(10, 150), [255, 0, 0]);
        assert_close(*out.get_pixel(140, 150), [255, 0, 0]);
        assert_close(*out.get_pixel(160, 150), [0, 0, 255]);
        assert_close(*out.get_pixel(290, 150), [0, 0, 255]);
    }

    #[test]
    fn test_cover_crop_same_size_is_identity() {
        let src = ImageBuffer::from_fn(300, 300, |x, y| Rgb([x as u8, y as u8, 7]));
        assert_eq!(cover_crop(&src, (300, 300)), src);
    }

    #[test]
    fn test_flatten_composites_onto_white() {
        let rgba = ImageBuffer::from_fn(3, 1, |x, _| match x {
            0 => Rgba([0, 0, 0, 0]),
            1 => Rgba([255, 0, 0, 255]),
            _ => Rgba([0, 0, 0, 128]),
        });
        let flat = flatten_to_rgb(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(flat.get_pixel(1, 0).0, [255, 0, 0]);
        assert_close(*flat.get_pixel(2, 0), [127, 127, 127]);
    }

    #[test]
    fn test_flatten_opaque_is_plain_conversion() {
        let luma = image::GrayImage::from_pixel(2, 2, image::Luma([90]));
        let flat = flatten_to_rgb(&DynamicImage::ImageLuma8(luma));
        assert_eq!(flat.get_pixel(1, 1).0, [90, 90, 90]);
    }

    #[test]
    fn test_fit_width() {
        let wide = fit_width(solid(3200, 1000, [1, 2, 3]), 1600);
        assert_eq!(wide.dimensions(), (1600, 500));

        let narrow = fit_width(solid(800, 1000, [1, 2, 3]), 1600);
        assert_eq!(narrow.dimensions(), (800, 1000));
    }
}
