use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;

use driveflow_core::models::{NewUploadHistory, TriggerOutcome, TriggerRequest, WebhookPayload};
use driveflow_core::AppError;
use driveflow_store::UploadHistoryStore;

const USER_AGENT: &str = "driveflow-webhook/1.0";
const MAX_LOGGED_BODY_BYTES: usize = 512;

/// Configuration for webhook dispatch.
#[derive(Clone, Debug)]
pub struct WebhookServiceConfig {
    pub timeout_seconds: u64,
    /// Permit private/loopback webhook hosts. Test-only escape hatch.
    pub allow_private_hosts: bool,
    /// Optional hostname allowlist for webhook URLs.
    pub allowlist: Option<Vec<String>>,
}

impl Default for WebhookServiceConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            allow_private_hosts: false,
            allowlist: None,
        }
    }
}

/// Single-shot webhook dispatch after a completed upload.
///
/// Unlike an event fan-out system there is exactly one recipient (the user's
/// configured URL), delivery is awaited by the caller, and there is no retry:
/// the dispatch result goes straight back to the client.
#[derive(Clone)]
pub struct WebhookService {
    history: UploadHistoryStore,
    http_client: Client,
    config: WebhookServiceConfig,
}

impl WebhookService {
    pub fn new(history: UploadHistoryStore, config: WebhookServiceConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .context("Failed to create HTTP client for webhooks")?;

        Ok(Self {
            history,
            http_client,
            config,
        })
    }

    /// Dispatch the upload notification to the user's webhook and persist a
    /// history record carrying the returned markdown.
    ///
    /// The record is written only after the webhook responded 2xx; network
    /// failures and non-2xx responses leave no history behind.
    #[tracing::instrument(skip(self, request), fields(user_id = %user_id, file_name = %request.file_name))]
    pub async fn trigger(
        &self,
        user_id: &str,
        request: TriggerRequest,
    ) -> Result<TriggerOutcome, AppError> {
        super::validate_http_url("fileUrl", &request.file_url)?;
        super::validate_http_url("webhookUrl", &request.webhook_url)?;
        if request.file_size < 0 {
            return Err(AppError::BadRequest("fileSize must not be negative".to_string()));
        }

        super::ssrf::validate_url(
            &request.webhook_url,
            self.config.allow_private_hosts,
            self.config.allowlist.as_deref(),
        )
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook URL: {}", e)))?;

        let payload = WebhookPayload {
            file_name: request.file_name.clone(),
            file_url: request.file_url.clone(),
            file_size: request.file_size,
            timestamp: Utc::now(),
            user_id: user_id.to_string(),
        };

        let response = self
            .http_client
            .post(&request.webhook_url)
            .header("User-Agent", USER_AGENT)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Webhook request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                webhook_url = %request.webhook_url,
                status = status.as_u16(),
                "Webhook returned non-2xx status"
            );
            return Err(AppError::Remote {
                status: status.as_u16(),
                message: truncate(&body, MAX_LOGGED_BODY_BYTES),
            });
        }

        let markdown_result = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .as_ref()
            .and_then(extract_markdown)
            .unwrap_or_default();

        let record = self
            .history
            .save(NewUploadHistory {
                user_id: user_id.to_string(),
                file_name: request.file_name,
                file_url: request.file_url,
                file_size: request.file_size,
                webhook_url: Some(request.webhook_url.clone()),
                markdown_result: Some(markdown_result.clone()),
            })
            .await;

        tracing::info!(
            record_id = record.id,
            status = status.as_u16(),
            markdown_bytes = markdown_result.len(),
            "Webhook delivered"
        );

        Ok(TriggerOutcome {
            markdown_result,
            history_record_id: record.id,
        })
    }
}

/// The webhook is expected to answer `{"markdownResult": "..."}`; anything
/// else (missing field, non-string, non-JSON body) degrades to no markdown.
fn extract_markdown(body: &serde_json::Value) -> Option<String> {
    body.get("markdownResult")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
