//! Outbound request instrumentation.
//!
//! Every call to the Up API passes through [`InstrumentationMiddleware`], which keeps
//! the in-flight gauge and records per `(path, code)` request counts, latency and
//! response size. Failures are passed straight back to the caller; nothing is retried.

use crate::infrastructure::observability::{InFlightGuard, Metrics};
use async_trait::async_trait;
use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};
use std::time::Instant;
use tracing::{debug, warn};

pub struct InstrumentationMiddleware {
    metrics: Metrics,
}

impl InstrumentationMiddleware {
    pub fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }
}

#[async_trait]
impl Middleware for InstrumentationMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let _inflight = InFlightGuard::new(&self.metrics.outgoing_inflights);

        let path = req.url().path().to_string();
        let start = Instant::now();

        // No response means nothing to label with.
        let response = match next.run(req, extensions).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Up API request to {} failed: {}", path, e);
                return Err(e);
            }
        };
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        // Status and latency are final once headers are in, even if the body fails.
        let status = response.status();
        self.metrics
            .observe_request(&path, status.as_str(), latency_ms);

        let (response, size) = buffer_body(response).await;
        self.metrics
            .observe_response_size(&path, status.as_str(), size as f64);

        match &response {
            Ok(_) => debug!(
                "Up API {} -> {} ({:.1}ms, {} bytes)",
                path, status, latency_ms, size
            ),
            Err(e) => warn!(
                "Up API {} -> {} body failed after {} bytes: {}",
                path, status, size, e
            ),
        }
        response
    }
}

/// Reads the body so its real size is known, then hands back an equivalent response.
///
/// The byte count is returned even when reading fails part way.
async fn buffer_body(mut response: Response) -> (reqwest_middleware::Result<Response>, usize) {
    let mut builder = http::Response::builder()
        .status(response.status())
        .version(response.version());
    if let Some(headers) = builder.headers_mut() {
        *headers = response.headers().clone();
    }

    let mut body = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => body.extend_from_slice(&chunk),
            Ok(None) => break,
            Err(e) => return (Err(e.into()), body.len()),
        }
    }

    let size = body.len();
    let rebuilt = builder
        .body(body)
        .map(Response::from)
        .map_err(|e| reqwest_middleware::Error::Middleware(e.into()));

    (rebuilt, size)
}
