//! Driveflow Core Library
//!
//! Shared types for the driveflow upload relay: the error taxonomy, runtime
//! configuration, and the data model (webhook configs, upload history,
//! client-side file entries, wire payloads).

pub mod config;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
