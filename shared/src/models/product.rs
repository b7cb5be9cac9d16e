//! Product Model

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Size label -> units in stock, in the order the admin entered them
pub type SizeMap = IndexMap<String, u32>;

/// Product entity, exactly as persisted in the catalog file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    /// Whole currency units
    pub price: u64,
    pub color: String,
    pub composition: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub available_sizes: SizeMap,
    /// Small (300x300) variants, one per uploaded source image
    #[serde(default)]
    pub images: Vec<String>,
    /// Large (600x600) variants, parallel to `images`
    #[serde(default)]
    pub images_large: Vec<String>,
    /// First small variant or the placeholder path
    pub image: String,
    /// First large variant or the placeholder path
    pub image_large: String,
}

impl Product {
    /// Size labels in stored order
    pub fn sizes(&self) -> Vec<String> {
        self.available_sizes.keys().cloned().collect()
    }

    /// Units across every size
    pub fn total_units(&self) -> u64 {
        self.available_sizes.values().map(|&q| u64::from(q)).sum()
    }

    /// Overwrite every field present in `update`; `id` is never touched.
    pub fn apply_update(&mut self, update: ProductUpdate) {
        let ProductUpdate {
            name,
            price,
            color,
            composition,
            description,
            available_sizes,
            images,
            images_large,
            image,
            image_large,
        } = update;

        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = price {
            self.price = v;
        }
        if let Some(v) = color {
            self.color = v;
        }
        if let Some(v) = composition {
            self.composition = v;
        }
        if let Some(v) = description {
            self.description = v;
        }
        if let Some(v) = available_sizes {
            self.available_sizes = v;
        }
        if let Some(v) = images {
            self.images = v;
        }
        if let Some(v) = images_large {
            self.images_large = v;
        }
        if let Some(v) = image {
            self.image = v;
        }
        if let Some(v) = image_large {
            self.image_large = v;
        }
    }
}

/// Public read projection: the stored product plus derived `sizes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub sizes: Vec<String>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let sizes = product.sizes();
        Self { product, sizes }
    }
}

/// Partial update payload
///
/// Unknown keys (`id`, `token`, a stale `sizes`) are ignored on purpose:
/// `id` is immutable and `sizes` is always derived on read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<u64>,
    pub color: Option<String>,
    pub composition: Option<String>,
    pub description: Option<String>,
    pub available_sizes: Option<SizeMap>,
    pub images: Option<Vec<String>>,
    pub images_large: Option<Vec<String>>,
    pub image: Option<String>,
    pub image_large: Option<String>,
}

/// Per-product unit total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTotal {
    pub id: u64,
    pub name: String,
    pub total_units: u64,
}

/// Admin statistics over the whole catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductStatistics {
    pub total_products: usize,
    pub total_units: u64,
    pub units_by_size: IndexMap<String, u64>,
    pub products: Vec<ProductTotal>,
}

impl ProductStatistics {
    /// Aggregate stock over a catalog snapshot
    pub fn from_products(products: &[Product]) -> Self {
        let mut stats = Self {
            total_products: products.len(),
            ..Self::default()
        };

        for product in products {
            for (size, &qty) in &product.available_sizes {
                *stats.units_by_size.entry(size.clone()).or_insert(0) += u64::from(qty);
            }
            let total_units = product.total_units();
            stats.total_units += total_units;
            stats.products.push(ProductTotal {
                id: product.id,
                name: product.name.clone(),
                total_units,
            });
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, sizes: &[(&str, u32)]) -> Product {
        Product {
            id,
            name: format!("Shirt {id}"),
            price: 4000,
            color: "white".into(),
            composition: "95% cotton".into(),
            description: String::new(),
            available_sizes: sizes.iter().map(|(s, q)| (s.to_string(), *q)).collect(),
            images: vec![],
            images_large: vec![],
            image: "/static/images/placeholder.jpg".into(),
            image_large: "/static/images/placeholder.jpg".into(),
        }
    }

    #[test]
    fn test_sizes_keep_insertion_order() {
        let p = product(1, &[("XL", 1), ("S", 2), ("M", 3)]);
        assert_eq!(p.sizes(), vec!["XL", "S", "M"]);

        let json = serde_json::to_string(&p).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sizes(), vec!["XL", "S", "M"]);
    }

    #[test]
    fn test_view_flattens_product() {
        let view = ProductView::from(product(3, &[("one size", 10)]));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["sizes"], serde_json::json!(["one size"]));
        assert_eq!(json["available_sizes"]["one size"], 10);
    }

    #[test]
    fn test_apply_update_only_touches_present_fields() {
        let mut p = product(5, &[("M", 1)]);
        let update: ProductUpdate =
            serde_json::from_str(r#"{"id": 99, "token": "x", "price": 3500, "sizes": ["L"]}"#)
                .unwrap();
        p.apply_update(update);
        assert_eq!(p.id, 5);
        assert_eq!(p.price, 3500);
        assert_eq!(p.name, "Shirt 5");
        assert_eq!(p.sizes(), vec!["M"]);
    }

    #[test]
    fn test_statistics() {
        let products = vec![
            product(1, &[("S", 2), ("M", 3)]),
            product(2, &[("M", 4), ("one size", 10)]),
        ];
        let stats = ProductStatistics::from_products(&products);
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.total_units, 19);
        assert_eq!(stats.units_by_size["S"], 2);
        assert_eq!(stats.units_by_size["M"], 7);
        assert_eq!(stats.units_by_size["one size"], 10);
        assert_eq!(stats.products[1].total_units, 14);
    }
}
