mod handlers;
mod state;

use axum::routing::{delete, get};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::checkout::CheckoutIntegration;
use crate::config::EngineConfig;

pub use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/quote", get(handlers::quote))
        .route("/api/resolve", get(handlers::resolve))
        .route("/api/provinces", get(handlers::province_list))
        .route("/api/cache", get(handlers::cache_status))
        .route("/api/cache/{province}", delete(handlers::forget))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, config: &EngineConfig, offline: bool) -> std::io::Result<()> {
    let checkout = CheckoutIntegration::from_config(config, offline);
    let state = Arc::new(AppState {
        checkout,
        default_origin: config.origin.clone(),
    });
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("shipping fee server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
