use chrono::Utc;
use driveflow_core::models::{NewUploadHistory, UploadHistoryRecord};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory upload history: an append-only ordered list of records, each
/// tagged with the owning user id. Sequential ids are allocated on save.
#[derive(Clone, Default)]
pub struct UploadHistoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    records: Vec<UploadHistoryRecord>,
    next_id: i64,
}

impl UploadHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, allocating the next id and stamping `uploaded_at`.
    pub async fn save(&self, new: NewUploadHistory) -> UploadHistoryRecord {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let record = UploadHistoryRecord {
            id: inner.next_id,
            user_id: new.user_id,
            file_name: new.file_name,
            file_url: new.file_url,
            file_size: new.file_size,
            webhook_url: new.webhook_url,
            markdown_result: new.markdown_result,
            uploaded_at: Utc::now(),
        };
        inner.records.push(record.clone());
        tracing::debug!(record_id = record.id, user_id = %record.user_id, "Saved upload history record");
        record
    }

    /// All records for a user, in insertion order.
    pub async fn list_by_user(&self, user_id: &str) -> Vec<UploadHistoryRecord> {
        self.inner
            .read()
            .await
            .records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Remove all records for a user; other users' records are untouched.
    pub async fn clear_user(&self, user_id: &str) {
        let mut inner = self.inner.write().await;
        let before = inner.records.len();
        inner.records.retain(|r| r.user_id != user_id);
        tracing::debug!(
            user_id = %user_id,
            removed = before - inner.records.len(),
            "Cleared upload history"
        );
    }
}
