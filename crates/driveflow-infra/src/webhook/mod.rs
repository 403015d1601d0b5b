//! Webhook dispatch.

mod service;
pub mod ssrf;

pub use service::{WebhookService, WebhookServiceConfig};

use driveflow_core::AppError;

/// Require an absolute http(s) URL with a host. `field` names the offending
/// request field in the error message.
pub fn validate_http_url(field: &str, raw: &str) -> Result<(), AppError> {
    let parsed = reqwest::Url::parse(raw)
        .map_err(|_| AppError::BadRequest(format!("{} is not a valid URL", field)))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(AppError::BadRequest(format!(
            "{} must be an absolute http(s) URL",
            field
        )));
    }
    Ok(())
}
