//! Promo code models

use serde::{Deserialize, Serialize};

/// Stored value of the promo map (key is the lowercase code)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoDescriptor {
    pub discount: f64,
    #[serde(default)]
    pub description: String,
}

/// Promo code as listed to the admin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    pub discount: f64,
    pub description: String,
}

/// Create-or-overwrite payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoUpsert {
    pub code: String,
    pub discount: f64,
    #[serde(default)]
    pub description: String,
}

/// Public checkout lookup payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromoValidateRequest {
    pub code: String,
}

/// Result of a checkout lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoCheck {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
}

impl PromoCheck {
    pub fn valid(discount: f64) -> Self {
        Self {
            valid: true,
            discount: Some(discount),
        }
    }

    pub fn invalid() -> Self {
        Self {
            valid: false,
            discount: None,
        }
    }
}
