//! HTTP server implementation for the Folio API

use axum::{
    http::{header::CONTENT_TYPE, Method},
    Router,
};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::api_handlers;
use folio_core::{
    core::{AppState, ConfiguredAppState},
    log_info, log_warn,
    storage::StorageImpl,
};

/// Creates the application router with its middleware
///
/// There are no fixed routes: the fallback receives every request and the
/// core decides what the path addresses.
pub fn create_router<S: StorageImpl>(app_state: AppState<S>) -> Router {
    let cors = if app_state.config.server.cors_permissive {
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([CONTENT_TYPE])
            .allow_origin(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .fallback(api_handlers::handle_request::<S>)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(app_state)
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log_warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log_info!("Received Ctrl-C, shutting down"),
        _ = terminate => log_info!("Received SIGTERM, shutting down"),
    }
}

/// Internal function to serve the configured router until shutdown
async fn serve_api_server_with_app(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log_info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_info!("Server stopped");
    Ok(())
}

/// Start the HTTP server with the configured AppState
pub async fn start_api_server(configured_app_state: ConfiguredAppState) -> anyhow::Result<()> {
    let http_addr = configured_app_state.http_addr();

    log_info!("Starting Folio API server on {}", http_addr);

    // Match once on storage type to get concrete AppState, then start server
    match configured_app_state {
        ConfiguredAppState::File { app_state } => {
            log_info!("Starting server with FileStorage backend");
            serve_api_server_with_app(http_addr, create_router(app_state)).await
        }
        ConfiguredAppState::Memory { app_state } => {
            log_info!("Starting server with MemoryStorage backend");
            serve_api_server_with_app(http_addr, create_router(app_state)).await
        }
    }
}
