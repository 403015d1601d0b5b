//! Driveflow API Library
//!
//! HTTP API for the upload relay: webhook configuration, webhook trigger, and
//! upload history endpoints, plus application setup.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::ErrorResponse;
pub use state::AppState;
