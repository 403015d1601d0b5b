//! Webhook configuration handlers
//!
//! One webhook URL per user, upsert semantics: saving again replaces the URL
//! and bumps the updated timestamp.

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::auth::UserContext;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use driveflow_core::models::SaveWebhookConfigRequest;
use driveflow_infra::validate_http_url;

/// Save (upsert) the caller's webhook URL.
#[tracing::instrument(skip(state, request), fields(user_id = %ctx.user_id))]
pub async fn save_webhook_config(
    State(state): State<Arc<AppState>>,
    ctx: UserContext,
    ValidatedJson(request): ValidatedJson<SaveWebhookConfigRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let url = request.webhook_url.trim();
    validate_http_url("webhookUrl", url)?;

    let config = state.webhook_configs.save(&ctx.user_id, url).await;
    Ok(Json(config))
}

/// Fetch the caller's webhook config; an empty `webhookUrl` when none is saved.
#[tracing::instrument(skip(state), fields(user_id = %ctx.user_id))]
pub async fn get_webhook_config(
    State(state): State<Arc<AppState>>,
    ctx: UserContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let body = match state.webhook_configs.get(&ctx.user_id).await {
        Some(config) => serde_json::to_value(config)
            .map_err(|e| driveflow_core::AppError::Internal(e.to_string()))?,
        None => serde_json::json!({ "webhookUrl": "" }),
    };
    Ok(Json(body))
}
