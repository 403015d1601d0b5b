//! Driveflow client library.
//!
//! Client-side half of the upload relay: the HTTP client for the driveflow
//! API, the file-transfer client that PUTs bytes to the remote drive, and the
//! sequential upload orchestrator that ties them together.

pub mod transfer;
pub mod uploader;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use driveflow_core::models::{TriggerRequest, TriggerResponse, UploadHistoryRecord, WebhookConfig};

pub use transfer::{DriveTransferClient, FileTransfer, ProgressCallback};
pub use uploader::{MarkdownDocument, TokenProvider, UploadReport, Uploader};

/// API surface the orchestrator talks to. `ApiClient` is the real
/// implementation; tests drive the orchestrator with an in-memory fake.
#[async_trait]
pub trait RelayApi: Send + Sync {
    async fn save_webhook_config(&self, webhook_url: &str) -> Result<WebhookConfig>;
    /// The configured webhook URL, or `None` when none is saved.
    async fn get_webhook_config(&self) -> Result<Option<String>>;
    async fn trigger_webhook(&self, request: &TriggerRequest) -> Result<TriggerResponse>;
    async fn upload_history(&self) -> Result<Vec<UploadHistoryRecord>>;
    async fn clear_upload_history(&self) -> Result<()>;
}

/// HTTP client for the driveflow API, identifying the caller via `X-User-Id`.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    user_id: String,
}

impl ApiClient {
    pub fn new(base_url: String, user_id: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("X-User-Id", self.user_id.as_str())
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        response
            .json()
            .await
            .context("Failed to parse response as JSON")
    }

    /// GET request. Deserializes the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.apply_auth(self.client.get(self.build_url(path)));
        let response = request.send().await.context("Failed to send request")?;
        Self::read_json(response).await
    }

    /// POST a JSON body and deserialize the response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.apply_auth(self.client.post(self.build_url(path)).json(body));
        let response = request.send().await.context("Failed to send request")?;
        Self::read_json(response).await
    }

    /// DELETE request. Returns Ok(()) on success.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let request = self.apply_auth(self.client.delete(self.build_url(path)));
        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl RelayApi for ApiClient {
    async fn save_webhook_config(&self, webhook_url: &str) -> Result<WebhookConfig> {
        self.post_json(
            "/api/webhook/config",
            &serde_json::json!({ "webhookUrl": webhook_url }),
        )
        .await
    }

    async fn get_webhook_config(&self) -> Result<Option<String>> {
        // The server answers either a full config or `{"webhookUrl": ""}`.
        let body: serde_json::Value = self.get("/api/webhook/config").await?;
        let url = body
            .get("webhookUrl")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        Ok(if url.is_empty() {
            None
        } else {
            Some(url.to_string())
        })
    }

    async fn trigger_webhook(&self, request: &TriggerRequest) -> Result<TriggerResponse> {
        self.post_json("/api/webhook/trigger", request).await
    }

    async fn upload_history(&self) -> Result<Vec<UploadHistoryRecord>> {
        self.get("/api/uploads/history").await
    }

    async fn clear_upload_history(&self) -> Result<()> {
        self.delete("/api/uploads/history").await
    }
}
