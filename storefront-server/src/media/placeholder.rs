//! "No image" placeholder shown for products without photos

use image::{Rgb, RgbImage};
use std::path::Path;

use super::{MediaError, encode_jpeg};

pub const PLACEHOLDER_SIZE: u32 = 300;
const BACKGROUND: Rgb<u8> = Rgb([0xF0, 0xF0, 0xF0]);
const STROKE: Rgb<u8> = Rgb([0xCC, 0xCC, 0xCC]);
const TEXT: Rgb<u8> = Rgb([0x99, 0x99, 0x99]);
const STROKE_WIDTH: i64 = 3;
const CROSS_MIN: i64 = 50;
const CROSS_MAX: i64 = 250;

const LABEL: &str = "No Image";
const GLYPH_WIDTH: i64 = 5;
const GLYPH_HEIGHT: i64 = 7;
const GLYPH_ADVANCE: i64 = GLYPH_WIDTH + 1;
const GLYPH_SCALE: i64 = 2;

/// 5x7 bitmaps for the label; each row's low five bits, leftmost column first
fn glyph(c: char) -> [u8; 7] {
    match c {
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'o' => [0, 0, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'm' => [0, 0, 0b11010, 0b10101, 0b10101, 0b10101, 0b10101],
        'a' => [0, 0, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111],
        'g' => [0, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110],
        'e' => [0, 0, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110],
        _ => [0; 7],
    }
}

/// Whether `(x, y)` is ink of the label centered on the image
fn on_label(x: i64, y: i64) -> bool {
    let chars = LABEL.chars().count() as i64;
    let width = (chars * GLYPH_ADVANCE - 1) * GLYPH_SCALE;
    let height = GLYPH_HEIGHT * GLYPH_SCALE;
    let center = PLACEHOLDER_SIZE as i64 / 2;
    let (lx, ly) = (x - (center - width / 2), y - (center - height / 2));
    if !(0..width).contains(&lx) || !(0..height).contains(&ly) {
        return false;
    }

    let (col, row) = (lx / GLYPH_SCALE, ly / GLYPH_SCALE);
    let gx = col % GLYPH_ADVANCE;
    if gx >= GLYPH_WIDTH {
        return false;
    }
    LABEL
        .chars()
        .nth((col / GLYPH_ADVANCE) as usize)
        .is_some_and(|c| (glyph(c)[row as usize] >> (GLYPH_WIDTH - 1 - gx) as u32) & 1 == 1)
}

/// Light grey square with a diagonal cross and a centered "No Image" label
pub fn render_placeholder() -> RgbImage {
    let half = STROKE_WIDTH / 2;
    let bounds = CROSS_MIN..=CROSS_MAX;
    RgbImage::from_fn(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, |x, y| {
        let (x, y) = (x as i64, y as i64);
        let in_box = bounds.contains(&x) && bounds.contains(&y);
        let on_main = (x - y).abs() <= half;
        let on_anti = (x + y - (CROSS_MIN + CROSS_MAX)).abs() <= half;
        if on_label(x, y) {
            TEXT
        } else if in_box && (on_main || on_anti) {
            STROKE
        } else {
            BACKGROUND
        }
    })
}

/// Write the placeholder if it does not exist yet; returns whether it was created
pub fn ensure_placeholder(path: &Path) -> Result<bool, MediaError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let bytes = encode_jpeg(&render_placeholder(), 90)?;
    std::fs::write(path, bytes)?;
    tracing::info!(path = %path.display(), "Placeholder image created");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_placeholder_cross() {
        let img = render_placeholder();
        assert_eq!(img.dimensions(), (300, 300));
        assert_eq!(*img.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*img.get_pixel(30, 30), BACKGROUND);
        assert_eq!(*img.get_pixel(50, 50), STROKE);
        assert_eq!(*img.get_pixel(100, 100), STROKE);
        assert_eq!(*img.get_pixel(250, 50), STROKE);
        assert_eq!(*img.get_pixel(50, 250), STROKE);
        assert_eq!(*img.get_pixel(260, 260), BACKGROUND);
        assert_eq!(*img.get_pixel(150, 10), BACKGROUND);
    }

    #[test]
    fn test_render_placeholder_label() {
        let img = render_placeholder();
        // top-left stroke of the 'N' at the label origin (103, 143)
        assert_eq!(*img.get_pixel(103, 143), TEXT);
        assert_eq!(*img.get_pixel(104, 144), TEXT);

        let ink: Vec<(u32, u32)> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == TEXT)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!ink.is_empty());
        assert!(ink.iter().all(|&(x, y)| (103..197).contains(&x) && (143..157).contains(&y)));
    }

    #[test]
    fn test_ensure_placeholder_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("static/images/placeholder.jpg");
        assert!(ensure_placeholder(&path).unwrap());
        std::fs::write(&path, b"custom").unwrap();
        assert!(!ensure_placeholder(&path).unwrap());
        assert_eq!(std::fs::read(&path).unwrap(), b"custom");
    }
}
