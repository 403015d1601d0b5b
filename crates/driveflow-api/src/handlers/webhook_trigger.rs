//! Webhook trigger handler.

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::auth::UserContext;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use driveflow_core::models::{TriggerRequest, TriggerResponse};

/// Notify the caller's webhook about a completed upload and persist the
/// resulting history record. Dispatch failures surface as errors and leave no
/// record behind.
#[tracing::instrument(skip(state, request), fields(user_id = %ctx.user_id))]
pub async fn trigger_webhook(
    State(state): State<Arc<AppState>>,
    ctx: UserContext,
    ValidatedJson(request): ValidatedJson<TriggerRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let outcome = state
        .webhook_service
        .trigger(&ctx.user_id, request)
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(TriggerResponse::from(outcome)))
}
