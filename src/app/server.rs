use axum::{
    http::StatusCode,
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::handlers::{metrics, rate, simulate};
use crate::services::SimulatorService;

pub fn build_router(service: Arc<SimulatorService>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/rate", get(rate::get_rate))
        .route(
            "/simulate",
            get(simulate::simulate_query).post(simulate::simulate_json),
        )
        .route("/metrics", get(metrics::get_metrics))
        .with_state(service)
}

pub async fn serve(service: Arc<SimulatorService>, port: u16) -> std::io::Result<()> {
    let app = build_router(service);

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

async fn health_handler() -> StatusCode {
    StatusCode::OK
}
