use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use handlers::{
    attribute_hierarchy_handler, category_subtree_handler, health_check, recursive_sql_handler,
    search_categories_handler,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer};

use crate::catalog::CatalogService;
use crate::config::ServerConfig;

pub mod handlers;
pub mod models;

#[derive(Clone)]
pub struct AppState {
    pub service: CatalogService,
    pub config: ServerConfig,
}

/// HTTP routes over the catalog use cases
pub fn router(app_state: AppState) -> Router {
    let timeout = Duration::from_secs(app_state.config.request_timeout_secs);

    Router::new()
        .route("/health", get(health_check))
        .route("/categories/search", get(search_categories_handler))
        .route(
            "/categories/{root_category_id}/{category_number}/subtree",
            get(category_subtree_handler),
        )
        .route("/attributes/hierarchy", post(attribute_hierarchy_handler))
        .route("/recursive-sql", post(recursive_sql_handler))
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::new())
                .layer(timeout_layer(timeout)),
        )
        .with_state(Arc::new(app_state))
}

/// Requests running longer than `timeout` are answered with 408
fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

pub async fn run_with_config(config: ServerConfig, service: CatalogService) -> std::io::Result<()> {
    log::info!(
        "Server configuration: http={}:{}, database={}, query_cache={} (max {})",
        config.http_host,
        config.http_port,
        config.database_path,
        config.query_cache_enabled,
        config.query_cache_max_entries
    );

    let http_bind_address = format!("{}:{}", config.http_host, config.http_port);
    let app = router(AppState {
        service,
        config: config.clone(),
    });

    let http_listener = match TcpListener::bind(&http_bind_address).await {
        Ok(listener) => {
            log::info!("Successfully bound HTTP listener to {}", http_bind_address);
            listener
        }
        Err(e) => {
            log::error!(
                "Failed to bind HTTP listener to {}: {}",
                http_bind_address,
                e
            );
            log::error!("  Is another process using port {}?", config.http_port);
            return Err(e);
        }
    };

    log::info!("catalogtree is running on http://{}", http_bind_address);
    axum::serve(http_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => log::info!("Received SIGTERM, shutting down..."),
                    _ = tokio::signal::ctrl_c() => log::info!("Received SIGINT, shutting down..."),
                }
            }
            Err(e) => {
                log::warn!("Failed to register SIGTERM handler: {}", e);
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::info!("Received SIGINT, shutting down...");
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Received shutdown signal, shutting down...");
        }
    }
}
