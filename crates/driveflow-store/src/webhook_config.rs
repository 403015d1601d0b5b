use chrono::Utc;
use driveflow_core::models::WebhookConfig;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory webhook configuration store, keyed by user id.
///
/// One config per user: saving for an existing key updates the URL and
/// `updated_at` in place, preserving `id` and `created_at`.
#[derive(Clone, Default)]
pub struct WebhookConfigStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    configs: HashMap<String, WebhookConfig>,
    next_id: i64,
}

impl WebhookConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert the webhook URL for a user and return the resulting config.
    pub async fn save(&self, user_id: &str, webhook_url: &str) -> WebhookConfig {
        let mut inner = self.inner.write().await;
        let now = Utc::now();

        if let Some(existing) = inner.configs.get_mut(user_id) {
            existing.webhook_url = webhook_url.to_string();
            existing.updated_at = now;
            tracing::debug!(user_id = %user_id, "Updated webhook config");
            return existing.clone();
        }

        inner.next_id += 1;
        let config = WebhookConfig {
            id: inner.next_id,
            user_id: user_id.to_string(),
            webhook_url: webhook_url.to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.configs.insert(user_id.to_string(), config.clone());
        tracing::debug!(user_id = %user_id, "Created webhook config");
        config
    }

    /// Look up the config for a user, if any.
    pub async fn get(&self, user_id: &str) -> Option<WebhookConfig> {
        self.inner.read().await.configs.get(user_id).cloned()
    }
}
