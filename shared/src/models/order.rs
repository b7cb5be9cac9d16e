//! Order and share payloads posted by the mini-app

use serde::{Deserialize, Serialize};

/// One cart line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    pub price: u64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Telegram user attached to the order, every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuyerInfo {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub username: Option<String>,
}

/// Checkout payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub products: Vec<OrderItem>,
    #[serde(default)]
    pub total_price: u64,
    #[serde(default)]
    pub user: BuyerInfo,
    #[serde(default)]
    pub promo_code: Option<String>,
}

/// Send a product card to a chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareRequest {
    pub chat_id: i64,
    pub product_id: u64,
}

/// `{status, message}` acknowledgement the mini-app checks for `"success"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}
