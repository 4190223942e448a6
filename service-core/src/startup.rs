//! Shared bootstrap: every service is one route group mounted on the same
//! stack of middleware, CORS policy and probe endpoints.

use crate::config::Config;
use crate::error::AppError;
use crate::health::health_router;
use crate::middleware::{
    cors::cors_layer, metrics::metrics_middleware, tracing::request_id_middleware,
    tracing::request_span,
};
use crate::observability::get_metrics;
use axum::{
    Router,
    http::{StatusCode, Uri},
    middleware::from_fn,
    response::IntoResponse,
    routing::get,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// A named, independently registerable set of handlers. The health check is
/// always part of the group.
pub struct RouteGroup {
    name: &'static str,
    router: Router,
}

impl RouteGroup {
    pub fn new(name: &'static str, router: Router) -> Self {
        Self {
            name,
            router: router.merge(health_router()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

async fn not_found(uri: Uri) -> crate::error::AppError {
    AppError::not_found(format!("No route for {}", uri.path()))
}

/// Assemble the HTTP app for one service without binding or serving it.
pub fn build_router(config: &Config, group: RouteGroup) -> Router {
    tracing::debug!(route_group = group.name, origins = ?config.cors_origins, "Registering route group");

    Router::new()
        .merge(group.router)
        .route("/metrics", get(metrics_endpoint))
        .fallback(not_found)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_span::<axum::body::Body>))
        .layer(from_fn(request_id_middleware))
        .layer(cors_layer(&config.cors_origins))
}

/// Application container for managing server lifecycle.
pub struct Application {
    service_name: String,
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the router and bind the listener on the configured host and port.
    /// Nothing is served until [`Application::run_until_stopped`].
    pub async fn build(
        config: &Config,
        service_name: &str,
        group: RouteGroup,
    ) -> Result<Self, AppError> {
        let router = build_router(config, group);

        let addr = SocketAddr::new(config.host, config.port);
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, %addr, "Failed to bind TCP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(service = %service_name, port, "Listening");

        Ok(Self {
            service_name: service_name.to_string(),
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!(service = %self.service_name, "Service shutdown complete");
        Ok(())
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
