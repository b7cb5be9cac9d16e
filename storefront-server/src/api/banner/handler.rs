use axum::Json;
use axum::extract::{Multipart, State};
use shared::{AppError, AppResult, ErrorCode};

use crate::api::multipart_error;
use crate::core::ServerState;
use crate::media::BannerOutcome;

/// POST /api/admin/banner
///
/// Takes the `file` field (or the first field carrying a filename). The
/// previous banner stays in place if anything fails.
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<BannerOutcome>> {
    let mut data: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("file") || field.file_name().is_some() {
            data = Some(field.bytes().await.map_err(multipart_error)?.to_vec());
            break;
        }
    }

    let data = data.ok_or_else(|| {
        AppError::new(ErrorCode::NoFileProvided).with_detail("field", "file")
    })?;

    let writer = state.banner.clone();
    let outcome = tokio::task::spawn_blocking(move || writer.replace(&data))
        .await
        .map_err(|e| AppError::internal(format!("Banner task failed: {}", e)))??;

    Ok(Json(outcome))
}
