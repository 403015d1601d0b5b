//! Application state.
//!
//! The stores are explicit objects constructed once at startup and handed to
//! handlers through axum state; there is no global mutable storage.

use anyhow::Result;
use driveflow_core::Config;
use driveflow_infra::{WebhookService, WebhookServiceConfig};
use driveflow_store::{UploadHistoryStore, WebhookConfigStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub webhook_configs: WebhookConfigStore,
    pub upload_history: UploadHistoryStore,
    pub webhook_service: WebhookService,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let webhook_configs = WebhookConfigStore::new();
        let upload_history = UploadHistoryStore::new();

        let webhook_service = WebhookService::new(
            upload_history.clone(),
            WebhookServiceConfig {
                timeout_seconds: config.webhook_timeout_seconds,
                allow_private_hosts: config.webhook_allow_private_hosts,
                allowlist: config.webhook_allowlist.clone(),
            },
        )?;

        Ok(Self {
            config,
            webhook_configs,
            upload_history,
            webhook_service,
        })
    }
}
