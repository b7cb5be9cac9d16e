//! Product catalog backed by a single JSON file
//!
//! - [`store`]: whole-file load/save of the product list
//! - [`service`]: create/update/delete/list with image attachment
//! - [`seed`]: products written once into an empty catalog

pub mod seed;
pub mod service;
pub mod store;

pub use service::{CatalogService, ProductDraft, parse_size_map};
pub use store::{CatalogStore, next_id};

use shared::{AppError, ErrorCode};
use thiserror::Error;

use crate::media::MediaError;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid size map: {0}")]
    InvalidSizes(String),

    #[error("Product {0} not found")]
    NotFound(u64),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("Catalog persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => AppError::validation(msg),
            CatalogError::InvalidPrice(msg) => {
                AppError::with_message(ErrorCode::ProductInvalidPrice, msg)
                    .with_detail("field", "price")
            }
            CatalogError::InvalidSizes(msg) => {
                AppError::with_message(ErrorCode::InvalidSizeMap, msg)
                    .with_detail("field", "available_sizes")
            }
            CatalogError::NotFound(id) => {
                AppError::with_message(ErrorCode::ProductNotFound, format!("Product {} not found", id))
                    .with_detail("id", id)
            }
            CatalogError::Media(e) => e.into(),
            CatalogError::Persistence(msg) => AppError::storage(msg),
            CatalogError::Internal(msg) => AppError::internal(msg),
        }
    }
}
