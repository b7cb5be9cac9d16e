//! Promo codes

pub mod store;

pub use store::{PromoMap, PromoStore};

use shared::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromoError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid discount: {0}")]
    InvalidDiscount(f64),

    #[error("Promo code {0:?} not found")]
    NotFound(String),

    #[error("Promo persistence error: {0}")]
    Persistence(String),
}

pub type PromoResult<T> = Result<T, PromoError>;

impl From<PromoError> for AppError {
    fn from(err: PromoError) -> Self {
        match err {
            PromoError::Validation(msg) => AppError::validation(msg).with_detail("field", "code"),
            PromoError::InvalidDiscount(_) => {
                AppError::with_message(ErrorCode::PromoInvalidDiscount, err.to_string())
                    .with_detail("field", "discount")
            }
            PromoError::NotFound(ref code) => {
                let code = code.clone();
                AppError::with_message(ErrorCode::PromoNotFound, err.to_string())
                    .with_detail("code", code)
            }
            PromoError::Persistence(msg) => AppError::storage(msg),
        }
    }
}
