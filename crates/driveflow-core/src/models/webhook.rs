use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user webhook configuration entity. One config per user id; saving again
/// updates the URL in place (upsert).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    pub id: i64,
    pub user_id: String,
    pub webhook_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for saving a webhook configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveWebhookConfigRequest {
    pub webhook_url: String,
}

/// Request body for triggering a webhook after a completed upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerRequest {
    pub file_name: String,
    pub file_url: String,
    pub file_size: i64,
    pub webhook_url: String,
}

/// Payload POSTed to the user-configured webhook endpoint.
/// `timestamp` is generated at send time and serializes as ISO-8601.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub file_name: String,
    pub file_url: String,
    pub file_size: i64,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
}

/// Result of a successful webhook dispatch: the derived markdown document and
/// the id of the history record persisted for it.
#[derive(Debug, Clone)]
pub struct TriggerOutcome {
    pub markdown_result: String,
    pub history_record_id: i64,
}

/// Response returned by the trigger endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    pub success: bool,
    pub markdown_result: String,
    pub upload_history_id: i64,
}

impl From<TriggerOutcome> for TriggerResponse {
    fn from(outcome: TriggerOutcome) -> Self {
        Self {
            success: true,
            markdown_result: outcome.markdown_result,
            upload_history_id: outcome.history_record_id,
        }
    }
}
