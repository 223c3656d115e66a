//! Inbound HTTP surface
//!
//! - `GET /metrics`: refresh from the Up API, then serve the exposition. Refresh
//!   failures are logged and the scrape still succeeds with whatever state exists.
//! - `POST /webhook`: Up webhook deliveries. Only routed when a secret key is configured.

use crate::application::refresher::MetricsRefresher;
use crate::application::system::Application;
use crate::application::webhook::{SIGNATURE_HEADER, WebhookPipeline};
use crate::infrastructure::observability::Metrics;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tracing::{info, warn};

/// Upper bound on a buffered webhook body.
pub const MAX_WEBHOOK_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
struct MetricsState {
    refresher: Arc<MetricsRefresher>,
    metrics: Metrics,
}

pub fn router(app: &Application) -> Router {
    let mut router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(MetricsState {
            refresher: app.refresher.clone(),
            metrics: app.metrics.clone(),
        });

    match &app.webhook {
        Some(pipeline) => {
            info!("Registering /webhook handler");
            router = router.merge(
                Router::new()
                    .route("/webhook", post(webhook_handler))
                    .with_state(pipeline.clone()),
            );
        }
        None => info!("No webhook secret key configured, /webhook disabled"),
    }

    router
}

async fn metrics_handler(State(state): State<MetricsState>) -> impl IntoResponse {
    if let Err(e) = state.refresher.refresh().await {
        warn!("Failed to update metrics: {}", e);
    }
    (
        [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
        state.metrics.render(),
    )
}

async fn webhook_handler(
    State(pipeline): State<Arc<WebhookPipeline>>,
    headers: HeaderMap,
    body: Body,
) -> StatusCode {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    pipeline
        .ingest(
            signature,
            axum::body::to_bytes(body, MAX_WEBHOOK_BODY_BYTES),
        )
        .await
}
