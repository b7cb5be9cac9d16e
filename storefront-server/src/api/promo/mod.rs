//! Promo API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/promo/validate | POST | none |
//! | /api/admin/promo | GET, POST | admin |
//! | /api/admin/promo/{code} | DELETE | admin |

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/promo/validate", post(handler::validate))
        .route("/api/admin/promo", get(handler::list).post(handler::upsert))
        .route("/api/admin/promo/{code}", delete(handler::remove))
}
