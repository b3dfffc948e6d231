//! HTTP Server
//!
//! Exposes the exporter to Prometheus.
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page with links to metrics and health
//! - `GET /metrics` - runs one collection cycle and returns Prometheus text format
//! - `GET /health` - 200 unless every device failed in the last cycle (503)
//!
//! # Metrics Collection
//!
//! There is no background loop: each `/metrics` request is one collection
//! cycle, so the exposed values are never older than the scrape itself.
//! Concurrent requests queue on the exporter's cycle lock.

use crate::config::Config;
use crate::error::ExporterError;
use crate::exporter::Exporter;
use crate::hub4::DeviceClient;
use crate::metrics::MetricsCollector;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Clone)]
struct AppState {
    exporter: Arc<Exporter>,
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    if config.instances.is_empty() {
        warn!("No instances configured, /metrics will be empty");
    }

    let client = DeviceClient::new(Duration::from_secs(config.timeout_seconds))?;
    let exporter = Arc::new(Exporter::new(config.instances.clone(), client));
    info!(
        "Polling {} instance(s) with a {}s timeout",
        exporter.devices().len(),
        config.timeout_seconds
    );

    let app = router(exporter);

    // Start the server
    let addr = format!("{}:{}", config.addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ExporterError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Metrics server listening on {}", addr);
    info!("Metrics available at http://{}/metrics", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| ExporterError::Server(e.to_string()))?;

    Ok(())
}

/// Build the router serving `exporter`.
pub fn router(exporter: Arc<Exporter>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(AppState { exporter })
}

async fn root_handler() -> impl IntoResponse {
    axum::response::Html(
        r#"<html>
<head><title>Hub 4 Exporter</title></head>
<body>
<h1>Hub 4 Prometheus Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
<p><a href="/health">Health</a></p>
</body>
</html>"#,
    )
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    let scrape = state.exporter.scrape().await;

    match MetricsCollector::from_samples(&scrape.samples).and_then(|m| m.render()) {
        Ok(metrics) => (
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            metrics,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.exporter.last_cycle().await {
        Some(summary) if !summary.is_healthy() => (
            StatusCode::SERVICE_UNAVAILABLE,
            "No device reachable in the last scrape",
        ),
        _ => (StatusCode::OK, "OK"),
    }
}
