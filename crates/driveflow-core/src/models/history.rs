use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted log entry of one completed upload, optionally carrying the
/// webhook URL used and the derived markdown output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadHistoryRecord {
    pub id: i64,
    pub user_id: String,
    pub file_name: String,
    pub file_url: String,
    pub file_size: i64,
    pub webhook_url: Option<String>,
    pub markdown_result: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Insert form of [`UploadHistoryRecord`]: the store allocates `id` and stamps
/// `uploaded_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUploadHistory {
    pub user_id: String,
    pub file_name: String,
    pub file_url: String,
    pub file_size: i64,
    pub webhook_url: Option<String>,
    pub markdown_result: Option<String>,
}
