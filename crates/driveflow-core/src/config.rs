//! Configuration module
//!
//! Runtime configuration loaded from environment variables (with `.env`
//! support via dotenvy). Malformed values fail fast at startup.

use std::env;

use anyhow::{Context, Result};

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_UPLOAD_SIZE_BYTES: usize = 50 * 1024 * 1024;

/// Application configuration shared by the API server and the upload client.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    /// Allowed CORS origins; empty means allow any origin.
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// Timeout for outbound webhook dispatch requests.
    pub webhook_timeout_seconds: u64,
    /// Permit webhook URLs resolving to private/loopback hosts. Test-only escape hatch.
    pub webhook_allow_private_hosts: bool,
    /// Optional hostname allowlist for webhook URLs.
    pub webhook_allowlist: Option<Vec<String>>,
    /// Remote drive endpoint the transfer client PUTs file bytes to.
    pub drive_upload_endpoint: String,
    /// Request body limit for the API server.
    pub max_upload_size_bytes: usize,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self> {
        // Best effort: a missing .env file is fine.
        dotenvy::dotenv().ok();

        let server_port = parse_env("SERVER_PORT", DEFAULT_SERVER_PORT)?;

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let webhook_timeout_seconds =
            parse_env("WEBHOOK_TIMEOUT_SECONDS", DEFAULT_WEBHOOK_TIMEOUT_SECS)?;

        let webhook_allow_private_hosts = parse_env("WEBHOOK_ALLOW_PRIVATE_HOSTS", false)?;

        let webhook_allowlist = env::var("WEBHOOK_ALLOWLIST")
            .ok()
            .map(|v| split_list(&v))
            .filter(|list| !list.is_empty());

        let drive_upload_endpoint = env::var("DRIVE_UPLOAD_ENDPOINT")
            .unwrap_or_else(|_| "https://graph.microsoft.com/v1.0/me/drive/root:".to_string());

        let max_upload_size_bytes =
            parse_env("MAX_UPLOAD_SIZE_BYTES", DEFAULT_MAX_UPLOAD_SIZE_BYTES)?;

        Ok(Self {
            server_port,
            cors_origins,
            environment,
            webhook_timeout_seconds,
            webhook_allow_private_hosts,
            webhook_allowlist,
            drive_upload_endpoint,
            max_upload_size_bytes,
        })
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
            cors_origins: Vec::new(),
            environment: "development".to_string(),
            webhook_timeout_seconds: DEFAULT_WEBHOOK_TIMEOUT_SECS,
            webhook_allow_private_hosts: false,
            webhook_allowlist: None,
            drive_upload_endpoint: "https://graph.microsoft.com/v1.0/me/drive/root:".to_string(),
            max_upload_size_bytes: DEFAULT_MAX_UPLOAD_SIZE_BYTES,
        }
    }
}

/// Parse an env var, falling back to `default` when unset. Malformed values error.
fn parse_env<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value for {}: {}", name, raw)),
        Err(_) => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empties() {
        assert_eq!(
            split_list("https://a.example, https://b.example ,,"),
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert!(!config.webhook_allow_private_hosts);
        assert!(!config.is_production());
    }
}
