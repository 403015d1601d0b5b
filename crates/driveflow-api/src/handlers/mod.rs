//! HTTP request handlers.

mod upload_history;
mod webhook_config;
mod webhook_trigger;

pub use upload_history::{clear_upload_history, list_upload_history};
pub use webhook_config::{get_webhook_config, save_webhook_config};
pub use webhook_trigger::trigger_webhook;
