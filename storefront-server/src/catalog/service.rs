//! Catalog Service
//!
//! Composes the [`CatalogStore`] with the image pipeline. Every mutation
//! holds `write_lock` across its read-modify-write, so two concurrent
//! creates never compute the same id.

use shared::models::{Product, ProductStatistics, ProductUpdate, ProductView, SizeMap};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::seed::seed_products;
use super::store::{CatalogStore, next_id};
use super::{CatalogError, CatalogResult};
use crate::media::{ImageCleanupService, ImagePipeline, UploadPolicy};

/// Raw create form, as received from the admin upload
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub price: Option<String>,
    pub color: Option<String>,
    pub composition: Option<String>,
    pub description: Option<String>,
    /// JSON object `{"<size>": <units>, ...}`
    pub sizes: Option<String>,
}

/// Draft after validation
#[derive(Debug)]
struct ValidDraft {
    name: String,
    price: u64,
    color: String,
    composition: String,
    description: String,
    sizes: SizeMap,
}

fn required(value: Option<String>, field: &str) -> CatalogResult<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CatalogError::Validation(format!("{} is required", field))),
    }
}

impl ProductDraft {
    fn validate(self) -> CatalogResult<ValidDraft> {
        let name = required(self.name, "name")?;
        let raw_price = required(self.price, "price")?;
        let color = required(self.color, "color")?;
        let composition = required(self.composition, "composition")?;
        let raw_sizes = required(self.sizes, "available_sizes")?;

        let price = raw_price.parse::<u64>().map_err(|_| {
            CatalogError::InvalidPrice(format!(
                "price must be a non-negative integer, got {:?}",
                raw_price
            ))
        })?;

        Ok(ValidDraft {
            name,
            price,
            color,
            composition,
            description: self.description.unwrap_or_default().trim().to_string(),
            sizes: parse_size_map(&raw_sizes)?,
        })
    }
}

/// Parse the JSON wire form of a size map, keeping the given order
pub fn parse_size_map(wire: &str) -> CatalogResult<SizeMap> {
    let parsed: SizeMap = serde_json::from_str(wire).map_err(|e| {
        CatalogError::InvalidSizes(format!(
            "expected a JSON object of size -> non-negative quantity: {}",
            e
        ))
    })?;

    if parsed.is_empty() {
        return Err(CatalogError::InvalidSizes(
            "at least one size is required".to_string(),
        ));
    }

    let mut sizes = SizeMap::with_capacity(parsed.len());
    for (label, qty) in parsed {
        let label = label.trim().to_string();
        if label.is_empty() {
            return Err(CatalogError::InvalidSizes(
                "size labels must not be blank".to_string(),
            ));
        }
        if sizes.insert(label.clone(), qty).is_some() {
            return Err(CatalogError::InvalidSizes(format!(
                "duplicate size label {:?}",
                label
            )));
        }
    }
    Ok(sizes)
}

#[derive(Clone)]
pub struct CatalogService {
    store: CatalogStore,
    pipeline: ImagePipeline,
    policy: UploadPolicy,
    /// Set only when orphaned images should be pruned on delete
    cleanup: Option<ImageCleanupService>,
    placeholder_path: String,
    write_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("store", &self.store.path())
            .field("images_dir", &self.pipeline.output_dir())
            .field("prune_images", &self.cleanup.is_some())
            .finish()
    }
}

impl CatalogService {
    pub fn new(
        store: CatalogStore,
        pipeline: ImagePipeline,
        policy: UploadPolicy,
        placeholder_path: impl Into<String>,
    ) -> Self {
        Self {
            store,
            pipeline,
            policy,
            cleanup: None,
            placeholder_path: placeholder_path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Remove a product's image files after it is deleted
    pub fn with_cleanup(mut self, cleanup: ImageCleanupService) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    pub fn placeholder_path(&self) -> &str {
        &self.placeholder_path
    }

    // ========== Reads ==========

    /// Public listing with derived `sizes`
    pub async fn list(&self) -> Vec<ProductView> {
        self.store.load().await.into_iter().map(ProductView::from).collect()
    }

    pub async fn get(&self, id: u64) -> CatalogResult<ProductView> {
        self.store
            .load()
            .await
            .into_iter()
            .find(|p| p.id == id)
            .map(ProductView::from)
            .ok_or(CatalogError::NotFound(id))
    }

    /// Raw stored products
    pub async fn admin_products(&self) -> Vec<Product> {
        self.store.load().await
    }

    pub async fn statistics(&self) -> ProductStatistics {
        ProductStatistics::from_products(&self.store.load().await)
    }

    pub async fn count(&self) -> usize {
        self.store.load().await.len()
    }

    // ========== Mutations ==========

    /// Validate the draft, process its images and append the new product
    pub async fn create(&self, draft: ProductDraft, images: Vec<Vec<u8>>) -> CatalogResult<Product> {
        let draft = draft.validate()?;
        self.policy.check_batch(&images)?;

        let _guard = self.write_lock.lock().await;
        let mut products = self.store.load_for_update().await?;
        let id = next_id(&products);

        let pipeline = self.pipeline.clone();
        let variants = tokio::task::spawn_blocking(move || pipeline.process_images(&images, id))
            .await
            .map_err(|e| CatalogError::Internal(format!("image task failed: {}", e)))??;

        let (images, images_large): (Vec<String>, Vec<String>) =
            variants.into_iter().map(|v| (v.small, v.large)).unzip();
        let image = images
            .first()
            .cloned()
            .unwrap_or_else(|| self.placeholder_path.clone());
        let image_large = images_large
            .first()
            .cloned()
            .unwrap_or_else(|| self.placeholder_path.clone());

        let product = Product {
            id,
            name: draft.name,
            price: draft.price,
            color: draft.color,
            composition: draft.composition,
            description: draft.description,
            available_sizes: draft.sizes,
            images,
            images_large,
            image,
            image_large,
        };

        products.push(product.clone());
        self.store.save(&products).await?;

        tracing::info!(
            product_id = id,
            name = %product.name,
            images = product.images.len(),
            "Product created"
        );
        Ok(product)
    }

    /// Overwrite the provided fields; images are never reprocessed
    pub async fn update(&self, id: u64, update: ProductUpdate) -> CatalogResult<Product> {
        if update.available_sizes.as_ref().is_some_and(|s| s.is_empty()) {
            return Err(CatalogError::InvalidSizes(
                "at least one size is required".to_string(),
            ));
        }

        let _guard = self.write_lock.lock().await;
        let mut products = self.store.load_for_update().await?;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CatalogError::NotFound(id))?;

        product.apply_update(update);
        let updated = product.clone();
        self.store.save(&products).await?;

        tracing::info!(product_id = id, "Product updated");
        Ok(updated)
    }

    /// Remove the product and persist the remaining ones in their order
    pub async fn delete(&self, id: u64) -> CatalogResult<Product> {
        let removed = {
            let _guard = self.write_lock.lock().await;
            let mut products = self.store.load_for_update().await?;
            let pos = products
                .iter()
                .position(|p| p.id == id)
                .ok_or(CatalogError::NotFound(id))?;
            let removed = products.remove(pos);
            self.store.save(&products).await?;
            removed
        };

        tracing::info!(product_id = id, "Product deleted");

        if let Some(cleanup) = &self.cleanup {
            cleanup.remove_product_assets(id).await;
        }
        Ok(removed)
    }

    /// Write the starter catalog if the store holds no products
    pub async fn seed_if_empty(&self) -> CatalogResult<bool> {
        let _guard = self.write_lock.lock().await;
        if !self.store.load_for_update().await?.is_empty() {
            return Ok(false);
        }
        let seed = seed_products(&self.placeholder_path);
        self.store.save(&seed).await?;
        tracing::info!(count = seed.len(), "Catalog seeded");
        Ok(true)
    }
}
