use axum::Json;
use axum::extract::{Path, State};
use shared::AppResult;
use shared::models::{PromoCheck, PromoCode, PromoUpsert, PromoValidateRequest, StatusResponse};

use crate::core::ServerState;

/// POST /api/promo/validate - `{valid, discount?}`, never an error
pub async fn validate(
    State(state): State<ServerState>,
    Json(payload): Json<PromoValidateRequest>,
) -> Json<PromoCheck> {
    Json(state.promos.validate(&payload.code).await)
}

pub async fn list(State(state): State<ServerState>) -> Json<Vec<PromoCode>> {
    Json(state.promos.list().await)
}

/// POST /api/admin/promo - create or overwrite
pub async fn upsert(
    State(state): State<ServerState>,
    Json(payload): Json<PromoUpsert>,
) -> AppResult<Json<PromoCode>> {
    let saved = state
        .promos
        .upsert(&payload.code, payload.discount, &payload.description)
        .await?;
    Ok(Json(saved))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    state.promos.remove(&code).await?;
    Ok(Json(StatusResponse::success(format!(
        "Promo code {} deleted",
        code.trim().to_lowercase()
    ))))
}
