//! Product handlers

use axum::Json;
use axum::extract::{Multipart, Path, State};
use shared::AppResult;
use shared::models::{Product, ProductStatistics, ProductUpdate, ProductView, StatusResponse};

use crate::api::multipart_error;
use crate::catalog::ProductDraft;
use crate::core::ServerState;

/// Field names that carry image files even without a filename
const IMAGE_FIELDS: &[&str] = &["images", "image", "files", "file"];

/// GET /api/products - catalog with derived `sizes`
pub async fn list(State(state): State<ServerState>) -> Json<Vec<ProductView>> {
    Json(state.catalog.list().await)
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
) -> AppResult<Json<ProductView>> {
    Ok(Json(state.catalog.get(id).await?))
}

/// GET /api/admin/products - stored products, no derived fields
pub async fn admin_list(State(state): State<ServerState>) -> Json<Vec<Product>> {
    Json(state.catalog.admin_products().await)
}

/// GET /api/admin/statistics
pub async fn statistics(State(state): State<ServerState>) -> Json<ProductStatistics> {
    Json(state.catalog.statistics().await)
}

/// POST /api/admin/products - multipart form with text fields and image files
///
/// Text fields: `name`, `price`, `color`, `composition`, `description`,
/// `available_sizes` (or `sizes`) as a JSON object. Files are taken from any
/// field with a filename, in submission order.
pub async fn create(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<ProductView>> {
    let mut draft = ProductDraft::default();
    let mut images: Vec<Vec<u8>> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        if file_name.is_some() || IMAGE_FIELDS.contains(&name.as_str()) {
            let data = field.bytes().await.map_err(multipart_error)?;
            // An untouched <input type="file"> submits an empty part without a name
            if data.is_empty() && file_name.as_deref().unwrap_or_default().is_empty() {
                continue;
            }
            images.push(data.to_vec());
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        match name.as_str() {
            "name" => draft.name = Some(value),
            "price" => draft.price = Some(value),
            "color" => draft.color = Some(value),
            "composition" => draft.composition = Some(value),
            "description" => draft.description = Some(value),
            "available_sizes" | "sizes" => draft.sizes = Some(value),
            other => tracing::debug!(field = %other, "Ignoring form field"),
        }
    }

    let product = state.catalog.create(draft, images).await?;
    Ok(Json(product.into()))
}

/// PUT /api/admin/products/{id} - partial update, images untouched
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ProductView>> {
    let product = state.catalog.update(id, payload).await?;
    Ok(Json(product.into()))
}

/// DELETE /api/admin/products/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
) -> AppResult<Json<StatusResponse>> {
    state.catalog.delete(id).await?;
    Ok(Json(StatusResponse::success(format!("Product {} deleted", id))))
}
