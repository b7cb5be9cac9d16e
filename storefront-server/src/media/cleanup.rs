//! Image cleanup service
//!
//! Removes the derivatives of a deleted product. Only used when
//! `PRUNE_ORPHAN_IMAGES` is enabled.

use std::path::PathBuf;
use tokio::fs;

use super::pipeline::DERIVATIVE_EXT;

#[derive(Debug, Clone)]
pub struct ImageCleanupService {
    images_dir: PathBuf,
}

impl ImageCleanupService {
    pub fn new(images_dir: PathBuf) -> Self {
        Self { images_dir }
    }

    fn belongs_to(file_name: &str, product_id: u64) -> bool {
        let prefix = format!("product-{}-", product_id);
        let Some(rest) = file_name.strip_prefix(&prefix) else {
            return false;
        };
        let Some(stem) = rest.strip_suffix(&format!(".{}", DERIVATIVE_EXT)) else {
            return false;
        };
        // "<n>-<size>", where n is the upload position
        match stem.split_once('-') {
            Some((n, size)) => !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) && !size.is_empty(),
            None => false,
        }
    }

    /// Delete every `product-<id>-*.jpg` file; returns how many were removed
    pub async fn remove_product_assets(&self, product_id: u64) -> usize {
        let mut entries = match fs::read_dir(&self.images_dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %self.images_dir.display(), error = %e, "Failed to read images directory");
                return 0;
            }
        };

        let mut deleted_count = 0;
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to list images directory");
                    break;
                }
            };

            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !Self::belongs_to(name, product_id) {
                continue;
            }

            match fs::remove_file(entry.path()).await {
                Ok(_) => deleted_count += 1,
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "Failed to delete product image");
                }
            }
        }

        if deleted_count > 0 {
            tracing::info!(product_id, count = deleted_count, "Product images cleaned up");
        }

        deleted_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_belongs_to_matches_only_own_files() {
        assert!(ImageCleanupService::belongs_to("product-4-1-small.jpg", 4));
        assert!(ImageCleanupService::belongs_to("product-4-12-large.jpg", 4));
        assert!(!ImageCleanupService::belongs_to("product-41-1-small.jpg", 4));
        assert!(!ImageCleanupService::belongs_to("product-4-1-small.png", 4));
        assert!(!ImageCleanupService::belongs_to("product-4-x-small.jpg", 4));
        assert!(!ImageCleanupService::belongs_to("banner.jpg", 4));
    }

    #[tokio::test]
    async fn test_remove_product_assets() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "product-4-1-small.jpg",
            "product-4-1-large.jpg",
            "product-41-1-small.jpg",
            "product-5-1-small.jpg",
        ] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let service = ImageCleanupService::new(dir.path().to_path_buf());
        assert_eq!(service.remove_product_assets(4).await, 2);
        assert!(dir.path().join("product-41-1-small.jpg").exists());
        assert!(dir.path().join("product-5-1-small.jpg").exists());
        assert_eq!(service.remove_product_assets(4).await, 0);
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_an_error() {
        let service = ImageCleanupService::new(PathBuf::from("/nonexistent/storefront/images"));
        assert_eq!(service.remove_product_assets(1).await, 0);
    }
}
