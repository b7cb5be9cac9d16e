use axum::Json;
use axum::extract::State;
use shared::models::{OrderRequest, ShareRequest, StatusResponse};
use shared::{AppError, AppResult, ErrorCode};

use crate::core::ServerState;

/// POST /api/order - forward the cart to the manager chat
///
/// An unknown promo code does not fail the order; it is left out of the
/// message.
pub async fn create_order(
    State(state): State<ServerState>,
    Json(order): Json<OrderRequest>,
) -> AppResult<Json<StatusResponse>> {
    if order.products.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    let code = order
        .promo_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let mut promo = None;
    if let Some(code) = code {
        match state.promos.validate(code).await.discount {
            Some(discount) => promo = Some((code, discount)),
            None => tracing::info!(code = %code, "Order carries an unknown promo code"),
        }
    }

    state.notifier.send_order(&order, promo).await?;

    Ok(Json(StatusResponse::success("Order sent to manager")))
}

/// POST /api/share - send a product card to a chat
pub async fn share_product(
    State(state): State<ServerState>,
    Json(req): Json<ShareRequest>,
) -> AppResult<Json<StatusResponse>> {
    let view = state.catalog.get(req.product_id).await?;
    state.notifier.send_share(req.chat_id, &view.product).await?;

    Ok(Json(StatusResponse::success("Product shared")))
}
