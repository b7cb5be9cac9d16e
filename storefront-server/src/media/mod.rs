//! Image handling for product photos and the storefront banner
//!
//! - [`transform`]: pure cover-crop and alpha flattening
//! - [`pipeline`]: uploaded bytes -> small/large JPEG derivatives on disk
//! - [`banner`]: single banner image, replaced atomically
//! - [`policy`]: size / format / count checks applied before decoding
//! - [`placeholder`]: "no image" asset generated at startup
//! - [`cleanup`]: removal of a deleted product's derivatives

pub mod banner;
pub mod cleanup;
pub mod pipeline;
pub mod placeholder;
pub mod policy;
pub mod transform;

pub use banner::{BannerOutcome, BannerWriter};
pub use cleanup::ImageCleanupService;
pub use pipeline::{ImagePipeline, ImageVariants};
pub use policy::UploadPolicy;

use shared::{AppError, ErrorCode};
use std::io::Cursor;
use thiserror::Error;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};

/// Image handling errors
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("image {index} could not be decoded: {reason}")]
    Decode { index: usize, reason: String },

    #[error("image {index} is empty")]
    Empty { index: usize },

    #[error("image {index} is too large: {size} bytes (max {max})")]
    TooLarge { index: usize, size: usize, max: usize },

    #[error("image {index} has an unsupported format (supported: jpeg, png, webp)")]
    UnsupportedFormat { index: usize },

    #[error("too many images: {count} (max {max})")]
    TooMany { count: usize, max: usize },

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("image storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Decode { index, .. } => {
                AppError::with_message(ErrorCode::InvalidImageFile, err.to_string())
                    .with_detail("index", index)
            }
            MediaError::Empty { index } => {
                AppError::with_message(ErrorCode::EmptyFile, err.to_string())
                    .with_detail("index", index)
            }
            MediaError::TooLarge { index, max, .. } => {
                AppError::with_message(ErrorCode::FileTooLarge, err.to_string())
                    .with_detail("index", index)
                    .with_detail("max_bytes", max)
            }
            MediaError::UnsupportedFormat { index } => {
                AppError::with_message(ErrorCode::UnsupportedFileFormat, err.to_string())
                    .with_detail("index", index)
            }
            MediaError::TooMany { max, .. } => {
                AppError::with_message(ErrorCode::TooManyFiles, err.to_string())
                    .with_detail("max_files", max)
            }
            MediaError::Encode(_) => {
                AppError::with_message(ErrorCode::ImageProcessingFailed, err.to_string())
            }
            MediaError::Io(_) => {
                AppError::with_message(ErrorCode::FileStorageFailed, err.to_string())
            }
        }
    }
}

/// Decode one upload, tagging failures with its position in the request
pub(crate) fn decode(index: usize, data: &[u8]) -> Result<DynamicImage, MediaError> {
    let img = image::load_from_memory(data).map_err(|e| MediaError::Decode {
        index,
        reason: e.to_string(),
    })?;

    if img.width() == 0 || img.height() == 0 {
        return Err(MediaError::Decode {
            index,
            reason: "zero width or height".to_string(),
        });
    }

    Ok(img)
}

/// Encode an opaque image as baseline JPEG
pub(crate) fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>, MediaError> {
    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let encoder = JpegEncoder::new_with_quality(&mut cursor, quality);
        img.write_with_encoder(encoder)
            .map_err(MediaError::Encode)?;
    }
    Ok(buffer)
}
