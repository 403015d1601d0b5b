//! Upload history handlers.

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::auth::UserContext;
use crate::error::HttpAppError;
use crate::state::AppState;

/// All of the caller's upload records, in insertion order.
#[tracing::instrument(skip(state), fields(user_id = %ctx.user_id))]
pub async fn list_upload_history(
    State(state): State<Arc<AppState>>,
    ctx: UserContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let records = state.upload_history.list_by_user(&ctx.user_id).await;
    Ok(Json(records))
}

/// Delete all of the caller's upload records. Other users are unaffected.
#[tracing::instrument(skip(state), fields(user_id = %ctx.user_id))]
pub async fn clear_upload_history(
    State(state): State<Arc<AppState>>,
    ctx: UserContext,
) -> Result<impl IntoResponse, HttpAppError> {
    state.upload_history.clear_user(&ctx.user_id).await;
    Ok(Json(serde_json::json!({ "success": true })))
}
