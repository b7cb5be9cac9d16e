//! Product API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/products | GET | none |
//! | /api/products/{id} | GET | none |
//! | /api/admin/products | GET, POST (multipart) | admin |
//! | /api/admin/products/{id} | PUT, DELETE | admin |
//! | /api/admin/statistics | GET | admin |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/products", get(handler::list))
        .route("/api/products/{id}", get(handler::get_by_id))
        .route(
            "/api/admin/products",
            get(handler::admin_list).post(handler::create),
        )
        .route(
            "/api/admin/products/{id}",
            put(handler::update).delete(handler::delete),
        )
        .route("/api/admin/statistics", get(handler::statistics))
}
