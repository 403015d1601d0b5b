//! Driveflow Store Library
//!
//! In-memory, process-scoped stores for webhook configurations and upload
//! history. Both are explicit objects constructed once at startup and shared
//! as cheap clones; mutations go through an async `RwLock` so concurrent
//! request handlers are safe. Nothing survives a restart.

mod upload_history;
mod webhook_config;

pub use upload_history::UploadHistoryStore;
pub use webhook_config::WebhookConfigStore;
