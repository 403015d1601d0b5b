//! File transfer to the remote drive.
//!
//! One binary upload per file: a PUT of the raw bytes to a path derived from
//! the file name, authorized with the caller's bearer token. The body is
//! streamed in fixed-size chunks so progress can be reported as the transfer
//! advances.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use driveflow_core::AppError;

const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Progress callback: invoked with a percentage in [0, 100], non-decreasing,
/// reaching 100 on success.
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// Uploads one file to the remote storage endpoint.
#[async_trait]
pub trait FileTransfer: Send + Sync {
    /// Upload `data` under `file_name` and return the remote web URL.
    async fn upload(
        &self,
        file_name: &str,
        data: Bytes,
        access_token: &str,
        on_progress: ProgressCallback,
    ) -> Result<String, AppError>;
}

/// Transfer client for a drive-style storage API: PUT to
/// `{endpoint}/{name}:/content`, JSON response carrying a `webUrl`.
#[derive(Clone)]
pub struct DriveTransferClient {
    client: Client,
    upload_endpoint: String,
}

impl DriveTransferClient {
    pub fn new(upload_endpoint: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .context("Failed to create HTTP client for file transfer")?;

        Ok(Self {
            client,
            upload_endpoint: upload_endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn upload_url(&self, file_name: &str) -> String {
        format!(
            "{}/{}:/content",
            self.upload_endpoint,
            utf8_percent_encode(file_name, NON_ALPHANUMERIC)
        )
    }
}

#[async_trait]
impl FileTransfer for DriveTransferClient {
    #[tracing::instrument(skip(self, data, access_token, on_progress), fields(size = data.len()))]
    async fn upload(
        &self,
        file_name: &str,
        data: Bytes,
        access_token: &str,
        on_progress: ProgressCallback,
    ) -> Result<String, AppError> {
        if data.is_empty() {
            return Err(AppError::BadRequest(
                "Cannot upload an empty file".to_string(),
            ));
        }

        let total = data.len();
        let url = self.upload_url(file_name);

        // Chunked body: the iterator is advanced lazily as the transport pulls
        // chunks, so the callback tracks bytes actually handed to the socket.
        let mut sent = 0usize;
        let progress = on_progress.clone();
        let chunks = chunk_bytes(&data).into_iter().map(move |chunk| {
            sent += chunk.len();
            progress(percent_of(sent, total));
            Ok::<Bytes, std::io::Error>(chunk)
        });

        let response = self
            .client
            .put(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .header("Content-Type", "application/octet-stream")
            .header("Content-Length", total)
            .body(reqwest::Body::wrap_stream(futures::stream::iter(chunks)))
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Network error during upload: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            // Surface the storage API's error message when the body carries one.
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| {
                    v.get("error")?
                        .get("message")?
                        .as_str()
                        .map(|s| s.to_string())
                })
                .unwrap_or_else(|| "Upload failed".to_string());
            return Err(AppError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|_| AppError::Remote {
            status: status.as_u16(),
            message: "Upload failed: malformed response from storage".to_string(),
        })?;

        let web_url = body
            .get("webUrl")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::Remote {
                status: status.as_u16(),
                message: "Upload failed: no file URL in storage response".to_string(),
            })?;

        on_progress(100);
        tracing::debug!(file_name = %file_name, "File uploaded");
        Ok(web_url.to_string())
    }
}

fn chunk_bytes(data: &Bytes) -> Vec<Bytes> {
    (0..data.len())
        .step_by(UPLOAD_CHUNK_SIZE)
        .map(|start| data.slice(start..(start + UPLOAD_CHUNK_SIZE).min(data.len())))
        .collect()
}

fn percent_of(sent: usize, total: usize) -> u8 {
    ((sent * 100) / total).min(100) as u8
}
