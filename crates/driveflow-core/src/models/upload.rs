use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

/// Lifecycle of a selected file: `Pending -> Uploading -> {Success | Error}`.
/// Terminal states are never retried automatically.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Pending,
    Uploading,
    Success,
    Error,
}

impl Display for UploadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadStatus::Pending => write!(f, "pending"),
            UploadStatus::Uploading => write!(f, "uploading"),
            UploadStatus::Success => write!(f, "success"),
            UploadStatus::Error => write!(f, "error"),
        }
    }
}

/// A file selected for upload, tracked by the orchestrator.
///
/// Mutated only by the orchestrator as the upload proceeds; `url` is set on
/// success, `error` on failure.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub id: Uuid,
    pub file_name: String,
    pub data: Bytes,
    /// Upload progress percentage in [0, 100], non-decreasing.
    pub progress: u8,
    pub status: UploadStatus,
    pub url: Option<String>,
    pub error: Option<String>,
}

impl FileEntry {
    pub fn new(file_name: impl Into<String>, data: Bytes) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            data,
            progress: 0,
            status: UploadStatus::Pending,
            url: None,
            error: None,
        }
    }

    pub fn mark_uploading(&mut self) {
        self.status = UploadStatus::Uploading;
    }

    pub fn mark_success(&mut self, url: String) {
        self.status = UploadStatus::Success;
        self.progress = 100;
        self.url = Some(url);
        self.error = None;
    }

    pub fn mark_error(&mut self, message: String) {
        self.status = UploadStatus::Error;
        self.error = Some(message);
    }

    /// Progress updates never move backwards.
    pub fn set_progress(&mut self, percent: u8) {
        self.progress = self.progress.max(percent.min(100));
    }

    /// Only pending and failed entries may be removed by the user.
    pub fn is_removable(&self) -> bool {
        matches!(self.status, UploadStatus::Pending | UploadStatus::Error)
    }
}
