//! Order and share API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/order | POST | none |
//! | /api/share | POST | none |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/order", post(handler::create_order))
        .route("/api/share", post(handler::share_product))
}
