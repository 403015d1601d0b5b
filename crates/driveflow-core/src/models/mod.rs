//! Data model shared across the workspace.

mod history;
mod upload;
mod webhook;

pub use history::{NewUploadHistory, UploadHistoryRecord};
pub use upload::{FileEntry, UploadStatus};
pub use webhook::{
    SaveWebhookConfigRequest, TriggerOutcome, TriggerRequest, TriggerResponse, WebhookConfig,
    WebhookPayload,
};
