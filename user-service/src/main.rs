//! User Service entry point.

use service_core::observability::{init_metrics, init_tracing};
use service_core::startup::Application;
use user_service::startup::{route_group, supabase_repository, SERVICE_NAME};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = user_service::config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        SERVICE_NAME,
        &config.log_level,
        config.log_format,
        config.otlp_endpoint.as_deref(),
    )
    .map_err(|e| {
        eprintln!("Failed to initialize tracing: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    init_metrics();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        port = config.port,
        debug = config.debug,
        "Starting user-service"
    );

    let repo = supabase_repository(&config).map_err(|e| {
        tracing::error!(error = %e, "Failed to create Supabase client");
        std::io::Error::other(e.to_string())
    })?;

    let app = Application::build(&config, SERVICE_NAME, route_group(repo))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build application");
            std::io::Error::other(format!("Application build error: {}", e))
        })?;

    app.run_until_stopped().await.map_err(|e| {
        tracing::error!(error = %e, "Application error");
        e
    })
}
