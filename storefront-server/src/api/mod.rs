//! HTTP API
//!
//! - [`health`] - liveness
//! - [`products`] - public catalog and admin product management
//! - [`promo`] - checkout promo lookup and admin promo management
//! - [`banner`] - admin banner upload
//! - [`orders`] - order forwarding and product sharing
//! - [`assets`] - generated images served from disk
//!
//! Everything under `/api/admin` passes through [`require_admin`].

pub mod assets;
pub mod banner;
pub mod health;
pub mod orders;
pub mod products;
pub mod promo;

use axum::extract::DefaultBodyLimit;
use axum::extract::multipart::MultipartError;
use axum::{Router, middleware};
use shared::{AppError, ErrorCode};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_admin;
use crate::core::{Config, ServerState};

/// HTTP access log
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    tracing::info!(target: "http_access", "{} {} {}", method, uri, response.status());

    response
}

/// Multipart failures, including a body over the size limit
pub(crate) fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == http::StatusCode::PAYLOAD_TOO_LARGE {
        AppError::with_message(ErrorCode::FileTooLarge, err.body_text())
    } else {
        AppError::invalid_request(format!("Invalid multipart request: {}", err.body_text()))
    }
}

/// Every route, without middleware or state
pub fn build_router(config: &Config) -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(products::router())
        .merge(promo::router())
        .merge(banner::router())
        .merge(orders::router())
        .merge(assets::router(config))
}

/// Fully configured application, used by the server and by tests
pub fn build_app(state: ServerState) -> Router {
    build_router(&state.config)
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .layer(DefaultBodyLimit::max(state.config.max_request_bytes()))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(log_request))
}
