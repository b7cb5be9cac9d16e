//! Upload limits checked before any decoding work

use image::ImageFormat;

use super::MediaError;

/// Byte, format and count limits for image uploads
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    pub max_bytes: usize,
    pub max_files: usize,
}

impl UploadPolicy {
    pub fn new(max_bytes: usize, max_files: usize) -> Self {
        Self {
            max_bytes,
            max_files,
        }
    }

    /// Validate one upload and return its sniffed format
    pub fn check(&self, index: usize, data: &[u8]) -> Result<ImageFormat, MediaError> {
        if data.is_empty() {
            return Err(MediaError::Empty { index });
        }
        if data.len() > self.max_bytes {
            return Err(MediaError::TooLarge {
                index,
                size: data.len(),
                max: self.max_bytes,
            });
        }

        match image::guess_format(data) {
            Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP)) => Ok(format),
            _ => Err(MediaError::UnsupportedFormat { index }),
        }
    }

    /// Validate a whole request's uploads
    pub fn check_batch(&self, files: &[Vec<u8>]) -> Result<(), MediaError> {
        if files.len() > self.max_files {
            return Err(MediaError::TooMany {
                count: files.len(),
                max: self.max_files,
            });
        }
        for (index, data) in files.iter().enumerate() {
            self.check(index, data)?;
        }
        Ok(())
    }
}
