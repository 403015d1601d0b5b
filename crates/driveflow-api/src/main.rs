use driveflow_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    driveflow_api::telemetry::init_tracing(config.is_production());

    // Initialize the application (stores, services, routes)
    let (_state, router) = driveflow_api::setup::initialize_app(config.clone())?;

    // Start the server
    driveflow_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
