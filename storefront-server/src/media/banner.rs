//! Storefront banner
//!
//! A single image at a fixed public path. Replacement writes a temp file in
//! the same directory and renames it over the old one, so readers see either
//! the previous banner or the new one, never a partial file.

use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::transform::{fit_width, flatten_to_rgb};
use super::{MediaError, UploadPolicy, decode, encode_jpeg};

pub const BANNER_FILE_NAME: &str = "banner.jpg";
pub const BANNER_MAX_WIDTH: u32 = 1600;
pub const BANNER_JPEG_QUALITY: u8 = 90;

/// Result of a successful banner replacement
#[derive(Debug, Clone, Serialize)]
pub struct BannerOutcome {
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub bytes: u64,
}

#[derive(Debug, Clone)]
pub struct BannerWriter {
    dir: PathBuf,
    public_path: String,
    policy: UploadPolicy,
}

impl BannerWriter {
    pub fn new(dir: impl Into<PathBuf>, public_path: impl Into<String>, policy: UploadPolicy) -> Self {
        Self {
            dir: dir.into(),
            public_path: public_path.into(),
            policy,
        }
    }

    pub fn target(&self) -> PathBuf {
        self.dir.join(BANNER_FILE_NAME)
    }

    /// Validate, normalize and atomically swap in a new banner
    pub fn replace(&self, data: &[u8]) -> Result<BannerOutcome, MediaError> {
        self.policy.check(0, data)?;
        let img = decode(0, data)?;
        let rgb = fit_width(flatten_to_rgb(&img), BANNER_MAX_WIDTH);
        let (width, height) = rgb.dimensions();
        let encoded = encode_jpeg(&rgb, BANNER_JPEG_QUALITY)?;

        std::fs::create_dir_all(&self.dir)?;
        let bytes = replace_atomically(&self.target(), |file| {
            file.write_all(&encoded)?;
            Ok(())
        })?;

        tracing::info!(width, height, bytes, "Banner replaced");

        Ok(BannerOutcome {
            path: self.public_path.clone(),
            width,
            height,
            bytes,
        })
    }
}

/// Write `target` through a sibling temp file and rename it into place
///
/// If `write` fails the temp file is dropped (and removed) and `target` is
/// left untouched.
pub(crate) fn replace_atomically<F>(target: &Path, write: F) -> Result<u64, MediaError>
where
    F: FnOnce(&mut File) -> Result<(), MediaError>,
{
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".banner-")
        .suffix(".tmp")
        .tempfile_in(dir)?;

    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    let len = tmp.as_file().metadata()?.len();

    tmp.persist(target).map_err(|e| MediaError::Io(e.error))?;
    Ok(len)
}
