//! Starter catalog for a fresh install

use indexmap::IndexMap;
use shared::models::Product;

const SEED_COUNT: u64 = 4;

/// Four "box-fit" T-shirts, each with ten units in one size
///
/// Seed products carry no uploaded photos, so every image path is the
/// placeholder.
pub fn seed_products(placeholder_path: &str) -> Vec<Product> {
    (1..=SEED_COUNT)
        .map(|id| {
            let mut sizes = IndexMap::new();
            sizes.insert("one size".to_string(), 10);
            Product {
                id,
                name: "Футболка box-fit".to_string(),
                price: 4000,
                color: "белый".to_string(),
                composition: "95% хлопок, 5% лайкра".to_string(),
                description: "Премиальная футболка идеального кроя.".to_string(),
                available_sizes: sizes,
                images: Vec::new(),
                images_large: Vec::new(),
                image: placeholder_path.to_string(),
                image_large: placeholder_path.to_string(),
            }
        })
        .collect()
}
