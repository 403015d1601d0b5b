//! Driveflow Infrastructure Library
//!
//! Shared infrastructure for the driveflow services:
//! - Webhook dispatch (single-shot delivery with SSRF validation)
//! - Request-id middleware

pub mod middleware;
pub mod webhook;

pub use middleware::{request_id_middleware, RequestId};
pub use webhook::{validate_http_url, WebhookService, WebhookServiceConfig};
