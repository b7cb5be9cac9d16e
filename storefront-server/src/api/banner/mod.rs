//! Banner API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/admin/banner | POST (multipart `file`) | admin |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/admin/banner", post(handler::upload))
}
