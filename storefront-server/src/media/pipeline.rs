//! Product image pipeline
//!
//! Every uploaded photo becomes two cover-cropped JPEGs named
//! `product-<id>-<n>-<size>.jpg`, where `n` is the 1-based upload position.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::transform::{cover_crop, flatten_to_rgb};
use super::{MediaError, decode, encode_jpeg};
use image::RgbImage;

/// JPEG quality for product derivatives
pub const PRODUCT_JPEG_QUALITY: u8 = 85;

/// Extension of every derivative written by the pipeline
pub const DERIVATIVE_EXT: &str = "jpg";

/// A named output rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeSpec {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Product card thumbnail
pub const SMALL: SizeSpec = SizeSpec {
    name: "small",
    width: 300,
    height: 300,
};

/// Product detail page
pub const LARGE: SizeSpec = SizeSpec {
    name: "large",
    width: 600,
    height: 600,
};

/// Public paths of one processed upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageVariants {
    pub small: String,
    pub large: String,
}

/// Writes product derivatives under `output_dir`
#[derive(Debug, Clone)]
pub struct ImagePipeline {
    output_dir: PathBuf,
    public_prefix: String,
}

impl ImagePipeline {
    pub fn new(output_dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `product-<id>-<index+1>-<size>.jpg`
    pub fn file_name(product_id: u64, index: usize, size: &SizeSpec) -> String {
        format!(
            "product-{}-{}-{}.{}",
            product_id,
            index + 1,
            size.name,
            DERIVATIVE_EXT
        )
    }

    fn public_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_prefix, file_name)
    }

    /// Decode, normalize and write both sizes for every image
    ///
    /// All images are decoded before anything touches the disk, so one bad
    /// upload fails the call with its index and leaves no new files behind.
    /// Existing files with the same names are overwritten.
    pub fn process_images(
        &self,
        images: &[Vec<u8>],
        product_id: u64,
    ) -> Result<Vec<ImageVariants>, MediaError> {
        let decoded = images
            .iter()
            .enumerate()
            .map(|(index, data)| decode(index, data))
            .collect::<Result<Vec<_>, _>>()?;

        if decoded.is_empty() {
            return Ok(Vec::new());
        }

        fs::create_dir_all(&self.output_dir)?;

        let mut variants = Vec::with_capacity(decoded.len());
        for (index, img) in decoded.iter().enumerate() {
            let rgb = flatten_to_rgb(img);
            let small = self.render(&rgb, product_id, index, &SMALL)?;
            let large = self.render(&rgb, product_id, index, &LARGE)?;

            tracing::debug!(
                product_id,
                index,
                source_width = img.width(),
                source_height = img.height(),
                "Product image processed"
            );

            variants.push(ImageVariants { small, large });
        }

        tracing::info!(
            product_id,
            count = variants.len(),
            "Product images written"
        );

        Ok(variants)
    }

    fn render(
        &self,
        rgb: &RgbImage,
        product_id: u64,
        index: usize,
        size: &SizeSpec,
    ) -> Result<String, MediaError> {
        let cropped = cover_crop(rgb, (size.width, size.height));
        let bytes = encode_jpeg(&cropped, PRODUCT_JPEG_QUALITY)?;

        let file_name = Self::file_name(product_id, index, size);
        fs::write(self.output_dir.join(&file_name), bytes)?;

        Ok(self.public_path(&file_name))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgb, Rgba};
    use std::io::Cursor;

    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn transparent_png(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgba([0u8, 0, 0, 0]));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_file_name_pattern() {
        assert_eq!(
            ImagePipeline::file_name(12, 0, &SMALL),
            "product-12-1-small.jpg"
        );
        assert_eq!(
            ImagePipeline::file_name(12, 2, &LARGE),
            "product-12-3-large.jpg"
        );
    }

    #[test]
    fn test_process_writes_both_sizes_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ImagePipeline::new(dir.path(), "/static/images/products/");

        let variants = pipeline
            .process_images(&[png_bytes(800, 400), png_bytes(200, 500)], 7)
            .unwrap();

        assert_eq!(
            variants,
            vec![
                ImageVariants {
                    small: "/static/images/products/product-7-1-small.jpg".into(),
                    large: "/static/images/products/product-7-1-large.jpg".into(),
                },
                ImageVariants {
                    small: "/static/images/products/product-7-2-small.jpg".into(),
                    large: "/static/images/products/product-7-2-large.jpg".into(),
                },
            ]
        );

        for (name, side) in [
            ("product-7-1-small.jpg", 300),
            ("product-7-1-large.jpg", 600),
            ("product-7-2-small.jpg", 300),
            ("product-7-2-large.jpg", 600),
        ] {
            let written = image::open(dir.path().join(name)).unwrap();
            assert_eq!((written.width(), written.height()), (side, side), "{name}");
            assert!(!written.color().has_alpha());
        }
    }

    #[test]
    fn test_extreme_aspect_source_renders_both_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ImagePipeline::new(dir.path(), "/img");

        pipeline.process_images(&[png_bytes(1, 20_000)], 4).unwrap();

        for (name, side) in [("product-4-1-small.jpg", 300), ("product-4-1-large.jpg", 600)] {
            let written = image::open(dir.path().join(name)).unwrap();
            assert_eq!((written.width(), written.height()), (side, side), "{name}");
        }
    }

    #[test]
    fn test_decode_failure_names_index_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("products");
        let pipeline = ImagePipeline::new(&out, "/img");

        let mut truncated = png_bytes(50, 50);
        truncated.truncate(40);

        let err = pipeline
            .process_images(&[png_bytes(50, 50), truncated], 3)
            .unwrap_err();
        assert!(matches!(err, MediaError::Decode { index: 1, .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_transparency_becomes_white() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ImagePipeline::new(dir.path(), "/img");
        pipeline.process_images(&[transparent_png(40, 40)], 1).unwrap();

        let small = image::open(dir.path().join("product-1-1-small.jpg"))
            .unwrap()
            .to_rgb8();
        let center = small.get_pixel(150, 150).0;
        assert!(center.iter().all(|&c| c >= 250), "got {center:?}");
    }

    #[test]
    fn test_processing_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ImagePipeline::new(dir.path(), "/img");
        let input = png_bytes(640, 480);

        pipeline.process_images(&[input.clone()], 9).unwrap();
        let first = fs::read(dir.path().join("product-9-1-large.jpg")).unwrap();

        pipeline.process_images(&[input], 9).unwrap();
        let second = fs::read(dir.path().join("product-9-1-large.jpg")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_no_images_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("never-created");
        let pipeline = ImagePipeline::new(&out, "/img");
        assert!(pipeline.process_images(&[], 1).unwrap().is_empty());
        assert!(!out.exists());
    }
}
