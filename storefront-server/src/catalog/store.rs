//! Catalog Store
//!
//! The JSON file is the source of truth: every read goes back to disk and
//! every mutation rewrites the whole array.

use shared::models::Product;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{CatalogError, CatalogResult};

/// `max(ids) + 1`, starting at 1 for an empty catalog
pub fn next_id(products: &[Product]) -> u64 {
    products.iter().map(|p| p.id).max().unwrap_or(0) + 1
}

#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the catalog for display
    ///
    /// A missing or unreadable file yields an empty catalog.
    pub async fn load(&self) -> Vec<Product> {
        match self.read().await {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Catalog unreadable, serving empty list");
                Vec::new()
            }
        }
    }

    /// Read the catalog ahead of a mutation
    ///
    /// A missing file is an empty catalog; a corrupt one is an error so the
    /// following save cannot overwrite it.
    pub async fn load_for_update(&self) -> CatalogResult<Vec<Product>> {
        self.read().await
    }

    async fn read(&self) -> CatalogResult<Vec<Product>> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CatalogError::Persistence(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).map_err(|e| {
            CatalogError::Persistence(format!("failed to parse {}: {}", self.path.display(), e))
        })
    }

    /// Overwrite the file with the full collection
    pub async fn save(&self, products: &[Product]) -> CatalogResult<()> {
        let json = serde_json::to_string_pretty(products)
            .map_err(|e| CatalogError::Persistence(format!("failed to serialize catalog: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                CatalogError::Persistence(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        fs::write(&self.path, json).await.map_err(|e| {
            CatalogError::Persistence(format!("failed to write {}: {}", self.path.display(), e))
        })?;

        tracing::debug!(path = %self.path.display(), count = products.len(), "Catalog saved");
        Ok(())
    }
}
