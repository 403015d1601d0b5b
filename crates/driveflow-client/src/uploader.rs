//! Sequential upload orchestrator.
//!
//! Drives the per-file pipeline: acquire a fresh access token, upload to the
//! drive, then trigger the configured webhook and refresh the history list.
//! Files are processed one at a time in insertion order, so progress
//! callbacks for different files never interleave.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use driveflow_core::models::{FileEntry, TriggerRequest, UploadHistoryRecord, UploadStatus};
use driveflow_core::AppError;

use crate::transfer::{FileTransfer, ProgressCallback};
use crate::RelayApi;

/// External authentication collaborator: supplies a bearer token for the
/// storage API and a stable user identifier.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    fn is_authenticated(&self) -> bool;
    fn user_id(&self) -> &str;
    /// A fresh access token; requested once per file upload.
    async fn access_token(&self) -> Result<String, AppError>;
}

/// The markdown document currently selected for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownDocument {
    pub content: String,
    /// Name of the file the document was derived from.
    pub source_file: String,
}

/// Outcome of one `upload_files` run.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub uploaded: usize,
    pub failed: usize,
    /// Files that uploaded fine but whose webhook dispatch failed.
    pub webhook_failures: Vec<String>,
}

/// Client-side upload state: selected files, the configured webhook URL, the
/// cached history list, and the current markdown document.
#[derive(Default)]
pub struct Uploader {
    files: Vec<FileEntry>,
    webhook_url: Option<String>,
    history: Vec<UploadHistoryRecord>,
    markdown: Option<MarkdownDocument>,
}

impl Uploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn history(&self) -> &[UploadHistoryRecord] {
        &self.history
    }

    pub fn markdown(&self) -> Option<&MarkdownDocument> {
        self.markdown.as_ref()
    }

    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url.as_deref()
    }

    pub fn set_webhook_url(&mut self, url: Option<String>) {
        self.webhook_url = url.filter(|u| !u.is_empty());
    }

    /// Append newly selected files as pending entries, in the given order.
    pub fn add_files(&mut self, files: impl IntoIterator<Item = (String, Bytes)>) {
        for (name, data) in files {
            self.files.push(FileEntry::new(name, data));
        }
    }

    /// Remove an entry. Succeeded and in-flight entries may not be removed.
    pub fn remove_file(&mut self, id: Uuid) -> Result<(), AppError> {
        let index = self
            .files
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| AppError::NotFound(format!("No file entry with id {}", id)))?;

        if !self.files[index].is_removable() {
            return Err(AppError::BadRequest(format!(
                "Cannot remove a file in state '{}'",
                self.files[index].status
            )));
        }

        self.files.remove(index);
        Ok(())
    }

    /// Load the saved webhook URL from the server into local state.
    pub async fn load_webhook_config(&mut self, api: &dyn RelayApi) -> Result<(), AppError> {
        let url = api
            .get_webhook_config()
            .await
            .map_err(|e| AppError::Network(format!("Failed to load webhook config: {}", e)))?;
        self.set_webhook_url(url);
        Ok(())
    }

    /// Persist the locally set webhook URL.
    pub async fn save_webhook_url(&mut self, api: &dyn RelayApi) -> Result<(), AppError> {
        let url = self
            .webhook_url
            .clone()
            .ok_or_else(|| AppError::BadRequest("Please enter a webhook URL".to_string()))?;

        api.save_webhook_config(&url)
            .await
            .map_err(|e| AppError::Network(format!("Failed to save webhook URL: {}", e)))?;
        Ok(())
    }

    pub async fn load_history(&mut self, api: &dyn RelayApi) -> Result<(), AppError> {
        self.history = api
            .upload_history()
            .await
            .map_err(|e| AppError::Network(format!("Failed to load upload history: {}", e)))?;
        Ok(())
    }

    pub async fn clear_history(&mut self, api: &dyn RelayApi) -> Result<(), AppError> {
        api.clear_upload_history()
            .await
            .map_err(|e| AppError::Network(format!("Failed to clear upload history: {}", e)))?;
        self.history.clear();
        Ok(())
    }

    /// Select a past upload's markdown as the current document.
    pub fn view_markdown_result(&mut self, history_id: i64) -> Result<(), AppError> {
        let record = self
            .history
            .iter()
            .find(|r| r.id == history_id)
            .ok_or_else(|| AppError::NotFound(format!("No history record {}", history_id)))?;

        let content = record
            .markdown_result
            .clone()
            .filter(|m| !m.is_empty())
            .ok_or_else(|| {
                AppError::NotFound("This upload doesn't have a markdown result".to_string())
            })?;

        self.markdown = Some(MarkdownDocument {
            content,
            source_file: record.file_name.clone(),
        });
        Ok(())
    }

    pub fn clear_markdown(&mut self) {
        self.markdown = None;
    }

    /// Upload every pending file, strictly sequentially in insertion order.
    ///
    /// Guard clauses abort before any network traffic: the caller must be
    /// authenticated and at least one pending entry must exist. Per-file
    /// failures mark that entry `Error` and move on; a webhook failure leaves
    /// the file `Success` and is reported in the returned report.
    #[tracing::instrument(skip_all, fields(user_id = %tokens.user_id()))]
    pub async fn upload_files(
        &mut self,
        tokens: &dyn TokenProvider,
        transfer: &dyn FileTransfer,
        api: &dyn RelayApi,
    ) -> Result<UploadReport, AppError> {
        if !tokens.is_authenticated() {
            return Err(AppError::Unauthorized(
                "Please sign in to upload files".to_string(),
            ));
        }
        if self.files.is_empty() {
            return Err(AppError::BadRequest("No files selected".to_string()));
        }

        let pending: Vec<Uuid> = self
            .files
            .iter()
            .filter(|f| f.status == UploadStatus::Pending)
            .map(|f| f.id)
            .collect();

        if pending.is_empty() {
            return Err(AppError::BadRequest(
                "All files have already been uploaded".to_string(),
            ));
        }

        let mut report = UploadReport::default();

        for id in pending {
            let (file_name, data) = {
                let entry = self.entry_mut(id);
                entry.mark_uploading();
                (entry.file_name.clone(), entry.data.clone())
            };
            let file_size = data.len() as i64;

            // The callback records into a shared cell; the entry's progress
            // field is synced from it once the transfer returns.
            let progress = Arc::new(AtomicU8::new(0));
            let callback: ProgressCallback = {
                let progress = progress.clone();
                Arc::new(move |pct: u8| {
                    progress.fetch_max(pct.min(100), Ordering::Relaxed);
                })
            };

            let outcome = match tokens.access_token().await {
                Ok(token) => transfer.upload(&file_name, data, &token, callback).await,
                Err(e) => Err(e),
            };

            let entry = self.entry_mut(id);
            entry.set_progress(progress.load(Ordering::Relaxed));

            let file_url = match outcome {
                Ok(url) => {
                    entry.mark_success(url.clone());
                    report.uploaded += 1;
                    url
                }
                Err(e) => {
                    tracing::warn!(file_name = %file_name, error = %e, "Upload failed");
                    entry.mark_error(e.to_string());
                    report.failed += 1;
                    continue;
                }
            };

            match self.webhook_url.clone() {
                Some(webhook_url) => {
                    let request = TriggerRequest {
                        file_name: file_name.clone(),
                        file_url,
                        file_size,
                        webhook_url,
                    };
                    match api.trigger_webhook(&request).await {
                        Ok(response) => {
                            if !response.markdown_result.is_empty() {
                                self.markdown = Some(MarkdownDocument {
                                    content: response.markdown_result,
                                    source_file: file_name.clone(),
                                });
                            }
                            self.refresh_history(api).await;
                        }
                        Err(e) => {
                            // The upload itself succeeded; only the derived
                            // document is missing.
                            tracing::warn!(file_name = %file_name, error = %e, "Webhook dispatch failed");
                            report.webhook_failures.push(file_name.clone());
                        }
                    }
                }
                None => self.refresh_history(api).await,
            }
        }

        Ok(report)
    }

    async fn refresh_history(&mut self, api: &dyn RelayApi) {
        match api.upload_history().await {
            Ok(records) => self.history = records,
            Err(e) => tracing::warn!(error = %e, "Failed to refresh upload history"),
        }
    }

    fn entry_mut(&mut self, id: Uuid) -> &mut FileEntry {
        self.files
            .iter_mut()
            .find(|f| f.id == id)
            .expect("entry ids collected from self.files")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use driveflow_core::models::{TriggerResponse, WebhookConfig};
    use std::sync::Mutex;

    struct FakeTokens {
        authenticated: bool,
    }

    #[async_trait]
    impl TokenProvider for FakeTokens {
        fn is_authenticated(&self) -> bool {
            self.authenticated
        }

        fn user_id(&self) -> &str {
            "user-a"
        }

        async fn access_token(&self) -> Result<String, AppError> {
            if self.authenticated {
                Ok("token-123".to_string())
            } else {
                Err(AppError::Unauthorized("no session".to_string()))
            }
        }
    }

    #[derive(Default)]
    struct FakeTransfer {
        uploads: Mutex<Vec<String>>,
        fail_for: Option<String>,
    }

    #[async_trait]
    impl FileTransfer for FakeTransfer {
        async fn upload(
            &self,
            file_name: &str,
            _data: Bytes,
            access_token: &str,
            on_progress: ProgressCallback,
        ) -> Result<String, AppError> {
            assert_eq!(access_token, "token-123");
            self.uploads.lock().unwrap().push(file_name.to_string());
            on_progress(50);
            if self.fail_for.as_deref() == Some(file_name) {
                return Err(AppError::Network("connection reset".to_string()));
            }
            on_progress(100);
            Ok(format!("https://drive.example/{}", file_name))
        }
    }

    #[derive(Default)]
    struct FakeApi {
        trigger_fails: bool,
        markdown: String,
        triggers: Mutex<Vec<TriggerRequest>>,
        history: Mutex<Vec<UploadHistoryRecord>>,
    }

    #[async_trait]
    impl RelayApi for FakeApi {
        async fn save_webhook_config(&self, webhook_url: &str) -> Result<WebhookConfig> {
            let now = Utc::now();
            Ok(WebhookConfig {
                id: 1,
                user_id: "user-a".to_string(),
                webhook_url: webhook_url.to_string(),
                created_at: now,
                updated_at: now,
            })
        }

        async fn get_webhook_config(&self) -> Result<Option<String>> {
            Ok(None)
        }

        async fn trigger_webhook(&self, request: &TriggerRequest) -> Result<TriggerResponse> {
            if self.trigger_fails {
                anyhow::bail!("API request failed with status 500");
            }
            self.triggers.lock().unwrap().push(request.clone());
            let mut history = self.history.lock().unwrap();
            let id = history.len() as i64 + 1;
            history.push(UploadHistoryRecord {
                id,
                user_id: "user-a".to_string(),
                file_name: request.file_name.clone(),
                file_url: request.file_url.clone(),
                file_size: request.file_size,
                webhook_url: Some(request.webhook_url.clone()),
                markdown_result: Some(self.markdown.clone()),
                uploaded_at: Utc::now(),
            });
            Ok(TriggerResponse {
                success: true,
                markdown_result: self.markdown.clone(),
                upload_history_id: id,
            })
        }

        async fn upload_history(&self) -> Result<Vec<UploadHistoryRecord>> {
            Ok(self.history.lock().unwrap().clone())
        }

        async fn clear_upload_history(&self) -> Result<()> {
            self.history.lock().unwrap().clear();
            Ok(())
        }
    }

    fn uploader_with_files(names: &[&str]) -> Uploader {
        let mut uploader = Uploader::new();
        uploader.add_files(
            names
                .iter()
                .map(|n| (n.to_string(), Bytes::from_static(b"content"))),
        );
        uploader
    }

    #[test]
    fn test_add_files_appends_pending_entries_in_order() {
        let uploader = uploader_with_files(&["one.pdf", "two.pdf", "three.pdf"]);
        let names: Vec<_> = uploader.files().iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["one.pdf", "two.pdf", "three.pdf"]);
        assert!(uploader
            .files()
            .iter()
            .all(|f| f.status == UploadStatus::Pending));
    }

    #[tokio::test]
    async fn test_upload_requires_authentication() {
        let mut uploader = uploader_with_files(&["one.pdf"]);
        let err = uploader
            .upload_files(
                &FakeTokens {
                    authenticated: false,
                },
                &FakeTransfer::default(),
                &FakeApi::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_upload_with_no_files_is_rejected() {
        let mut uploader = Uploader::new();
        let err = uploader
            .upload_files(
                &FakeTokens {
                    authenticated: true,
                },
                &FakeTransfer::default(),
                &FakeApi::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_happy_path_uploads_triggers_and_refreshes_history() {
        let mut uploader = uploader_with_files(&["one.pdf", "two.pdf"]);
        uploader.set_webhook_url(Some("https://hook.example".to_string()));

        let tokens = FakeTokens {
            authenticated: true,
        };
        let transfer = FakeTransfer::default();
        let api = FakeApi {
            markdown: "# Report".to_string(),
            ..Default::default()
        };

        let report = uploader
            .upload_files(&tokens, &transfer, &api)
            .await
            .unwrap();

        assert_eq!(report.uploaded, 2);
        assert_eq!(report.failed, 0);
        assert!(report.webhook_failures.is_empty());

        // Sequential, in insertion order.
        assert_eq!(*transfer.uploads.lock().unwrap(), ["one.pdf", "two.pdf"]);

        for entry in uploader.files() {
            assert_eq!(entry.status, UploadStatus::Success);
            assert_eq!(entry.progress, 100);
            assert_eq!(
                entry.url.as_deref(),
                Some(format!("https://drive.example/{}", entry.file_name).as_str())
            );
        }

        // One trigger per file; the displayed markdown comes from the last one.
        assert_eq!(api.triggers.lock().unwrap().len(), 2);
        let doc = uploader.markdown().unwrap();
        assert_eq!(doc.content, "# Report");
        assert_eq!(doc.source_file, "two.pdf");
        assert_eq!(uploader.history().len(), 2);
    }

    #[tokio::test]
    async fn test_no_entry_is_processed_twice() {
        let mut uploader = uploader_with_files(&["one.pdf"]);
        let tokens = FakeTokens {
            authenticated: true,
        };
        let transfer = FakeTransfer::default();
        let api = FakeApi::default();

        uploader
            .upload_files(&tokens, &transfer, &api)
            .await
            .unwrap();

        // Nothing pending anymore: guarded no-op, no extra transfer calls.
        let err = uploader
            .upload_files(&tokens, &transfer, &api)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(transfer.uploads.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_upload_marks_entry_error_and_continues() {
        let mut uploader = uploader_with_files(&["bad.pdf", "good.pdf"]);
        uploader.set_webhook_url(Some("https://hook.example".to_string()));

        let transfer = FakeTransfer {
            fail_for: Some("bad.pdf".to_string()),
            ..Default::default()
        };
        let api = FakeApi::default();

        let report = uploader
            .upload_files(
                &FakeTokens {
                    authenticated: true,
                },
                &transfer,
                &api,
            )
            .await
            .unwrap();

        assert_eq!(report.uploaded, 1);
        assert_eq!(report.failed, 1);

        let bad = &uploader.files()[0];
        assert_eq!(bad.status, UploadStatus::Error);
        assert!(bad.error.as_deref().unwrap().contains("connection reset"));

        let good = &uploader.files()[1];
        assert_eq!(good.status, UploadStatus::Success);

        // The webhook only fires for files that actually uploaded.
        assert_eq!(api.triggers.lock().unwrap().len(), 1);
        assert_eq!(api.triggers.lock().unwrap()[0].file_name, "good.pdf");
    }

    #[tokio::test]
    async fn test_webhook_failure_leaves_file_success() {
        let mut uploader = uploader_with_files(&["one.pdf"]);
        uploader.set_webhook_url(Some("https://hook.example".to_string()));

        let api = FakeApi {
            trigger_fails: true,
            ..Default::default()
        };
        let report = uploader
            .upload_files(
                &FakeTokens {
                    authenticated: true,
                },
                &FakeTransfer::default(),
                &api,
            )
            .await
            .unwrap();

        assert_eq!(report.uploaded, 1);
        assert_eq!(report.webhook_failures, ["one.pdf"]);
        assert_eq!(uploader.files()[0].status, UploadStatus::Success);
        assert!(uploader.markdown().is_none());
    }

    #[tokio::test]
    async fn test_upload_without_webhook_still_refreshes_history() {
        let mut uploader = uploader_with_files(&["one.pdf"]);
        let api = FakeApi::default();

        let report = uploader
            .upload_files(
                &FakeTokens {
                    authenticated: true,
                },
                &FakeTransfer::default(),
                &api,
            )
            .await
            .unwrap();

        assert_eq!(report.uploaded, 1);
        // No webhook configured: no trigger, but history was re-fetched.
        assert!(api.triggers.lock().unwrap().is_empty());
        assert!(uploader.history().is_empty());
    }

    #[test]
    fn test_remove_file_respects_status_rules() {
        let mut uploader = uploader_with_files(&["one.pdf", "two.pdf"]);
        let first = uploader.files()[0].id;
        let second = uploader.files()[1].id;

        uploader.remove_file(first).unwrap();
        assert_eq!(uploader.files().len(), 1);

        // Success entries may not be removed.
        uploader.files[0].mark_success("https://drive.example/two.pdf".to_string());
        let err = uploader.remove_file(second).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = uploader.remove_file(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_view_markdown_result_from_history() {
        let mut uploader = Uploader::new();
        let api = FakeApi {
            markdown: "# Derived".to_string(),
            ..Default::default()
        };
        api.trigger_webhook(&TriggerRequest {
            file_name: "one.pdf".to_string(),
            file_url: "https://drive.example/one.pdf".to_string(),
            file_size: 7,
            webhook_url: "https://hook.example".to_string(),
        })
        .await
        .unwrap();

        uploader.load_history(&api).await.unwrap();
        uploader.view_markdown_result(1).unwrap();
        assert_eq!(uploader.markdown().unwrap().content, "# Derived");

        let err = uploader.view_markdown_result(99).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
