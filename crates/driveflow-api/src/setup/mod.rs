//! Application setup and initialization
//!
//! Initialization logic kept out of main.rs for organization and so
//! integration tests can build the same router against in-memory state.

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use driveflow_core::Config;
use std::sync::Arc;

/// Initialize the application: stores, services, and routes.
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let state = Arc::new(AppState::new(config).context("Failed to initialize services")?);
    let router = routes::setup_routes(state.clone())?;
    Ok((state, router))
}
