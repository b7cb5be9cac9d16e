//! Generated images served from disk
//!
//! | Path | Source |
//! |------|--------|
//! | {IMAGES_PUBLIC_PREFIX}/{filename} | IMAGES_DIR |
//! | {BANNER_PUBLIC_PATH} | BANNER_DIR/banner.jpg |
//! | {PLACEHOLDER_PATH} | PLACEHOLDER_FILE |

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use http::header;
use std::path::PathBuf;

use crate::core::{Config, ServerState};

enum AssetResponse {
    Ok(Bytes),
    NotFound,
    BadRequest(&'static str),
}

impl IntoResponse for AssetResponse {
    fn into_response(self) -> axum::response::Response {
        match self {
            AssetResponse::Ok(content) => (
                http::StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "image/jpeg"),
                    (header::CACHE_CONTROL, "no-cache"),
                ],
                content,
            )
                .into_response(),
            AssetResponse::NotFound => {
                (http::StatusCode::NOT_FOUND, "File not found").into_response()
            }
            AssetResponse::BadRequest(msg) => {
                (http::StatusCode::BAD_REQUEST, msg).into_response()
            }
        }
    }
}

async fn read_asset(path: PathBuf) -> AssetResponse {
    match tokio::fs::read(&path).await {
        Ok(content) => AssetResponse::Ok(content.into()),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Asset not found");
            AssetResponse::NotFound
        }
    }
}

async fn serve_product_image(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> AssetResponse {
    // No path traversal out of the images directory
    if filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
    {
        return AssetResponse::BadRequest("Invalid filename");
    }
    read_asset(state.config.images_dir.join(&filename)).await
}

async fn serve_banner(State(state): State<ServerState>) -> AssetResponse {
    read_asset(state.banner.target()).await
}

async fn serve_placeholder(State(state): State<ServerState>) -> AssetResponse {
    read_asset(state.config.placeholder_file.clone()).await
}

pub fn router(config: &Config) -> Router<ServerState> {
    let prefix = config.images_public_prefix.trim_end_matches('/');
    Router::new()
        .route(&format!("{}/{{filename}}", prefix), get(serve_product_image))
        .route(&config.banner_public_path, get(serve_banner))
        .route(&config.placeholder_path, get(serve_placeholder))
}
