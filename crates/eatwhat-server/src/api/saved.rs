//! Saved-list handlers: read and mutate one venue's memberships.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use eatwhat_core::{SaveRequest, SavedLists};

use crate::middleware::{Principal, RequestId};

use super::{ApiError, ApiResponse, AppState};

const MAX_ID_LEN: usize = 512;

fn validate_id(req_id: &str, id: &str) -> Result<(), ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::new(req_id, "validation_error", "id must not be empty"));
    }
    if id.len() > MAX_ID_LEN {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("id must be at most {MAX_ID_LEN} bytes"),
        ));
    }
    Ok(())
}

pub(super) async fn get_saved(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SavedLists>>, ApiError> {
    validate_id(&req_id.0, &id)?;
    let lists = state.store.memberships(&principal.0, &id).await;
    Ok(Json(ApiResponse::new(lists, req_id.0)))
}

pub(super) async fn update_saved(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(principal): Extension<Principal>,
    body: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SavedLists>>, ApiError> {
    let Json(request) =
        body.map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.body_text()))?;
    validate_id(&req_id.0, &request.id)?;

    let lists = state.store.apply(&principal.0, &request).await;
    tracing::info!(
        venue_id = %request.id,
        list = %request.list_type,
        action = ?request.action,
        "saved list updated"
    );
    Ok(Json(ApiResponse::new(lists, req_id.0)))
}
