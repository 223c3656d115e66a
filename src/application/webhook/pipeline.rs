//! Webhook ingestion pipeline
//!
//! One delivery moves through:
//!
//! ```text
//! RECEIVED -> BODY_READ -> PARSED -> AUTHENTICATED -> TRANSACTION_RESOLVED | NO_TRANSACTION -> COMPLETED
//!     \___________\___________\____________\________________\____________________> FAILED(status)
//! ```
//!
//! Every delivery, completed or failed, increments `up_bank_webhook_requests`
//! exactly once with the response status. The payload is decoded only to learn the
//! webhook id and event type for labels; nothing is fetched or counted until the
//! signature over the raw bytes has been verified.

use crate::application::webhook::authenticator::WebhookAuthenticator;
use crate::domain::errors::WebhookError;
use crate::domain::events::WebhookEventCallback;
use crate::domain::ports::UpApi;
use crate::domain::types::Transaction;
use crate::infrastructure::observability::{InFlightGuard, Metrics};
use http::StatusCode;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Deadline for a whole delivery, transaction lookup included.
pub const WEBHOOK_DEADLINE: Duration = Duration::from_secs(60);

/// Labels attached to the delivery counter. Empty until the payload has been parsed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EventLabels {
    pub webhook_id: String,
    pub event_type: String,
}

/// Successful end states of a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    NoTransaction,
    Transaction(Transaction),
}

pub struct WebhookPipeline {
    api: Arc<dyn UpApi>,
    authenticator: WebhookAuthenticator,
    metrics: Metrics,
    deadline: Duration,
}

impl WebhookPipeline {
    pub fn new(api: Arc<dyn UpApi>, authenticator: WebhookAuthenticator, metrics: Metrics) -> Self {
        Self {
            api,
            authenticator,
            metrics,
            deadline: WEBHOOK_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Run one delivery and return the status to answer with.
    ///
    /// `body` resolves to the raw request body. Reading it counts against the
    /// deadline; when the deadline passes, whatever is still pending (including an
    /// outbound transaction lookup) is dropped.
    pub async fn ingest<B, T, E>(&self, signature: Option<&str>, body: B) -> StatusCode
    where
        B: Future<Output = Result<T, E>>,
        T: AsRef<[u8]>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let _inflight = InFlightGuard::new(&self.metrics.webhook_inflights);

        let mut labels = EventLabels::default();
        let result = tokio::time::timeout(self.deadline, self.process(signature, body, &mut labels))
            .await
            .unwrap_or_else(|_| {
                Err(WebhookError::DeadlineExceeded {
                    timeout_secs: self.deadline.as_secs(),
                })
            });

        let status = match &result {
            Ok(_) => StatusCode::OK,
            Err(e) => e.status_code(),
        };
        self.metrics
            .inc_webhook_request(&labels.webhook_id, &labels.event_type, status.as_str());

        match result {
            Ok(Resolution::Transaction(tx)) => {
                info!(
                    "Webhook {} {}: transaction {} on account {} ({} {} {})",
                    labels.webhook_id,
                    labels.event_type,
                    tx.id,
                    tx.account_id,
                    tx.status,
                    tx.amount.value_in_base_units,
                    tx.amount.currency_code
                );
                self.metrics.record_transaction(
                    &tx.account_id,
                    tx.status.as_label(),
                    tx.amount.as_f64(),
                );
            }
            Ok(Resolution::NoTransaction) => {
                info!("Webhook {} {}: no transaction", labels.webhook_id, labels.event_type);
            }
            Err(e) if status.is_server_error() => {
                error!(
                    "Webhook {} {} failed: {}",
                    labels.webhook_id, labels.event_type, e
                );
            }
            Err(e) => {
                warn!(
                    "Webhook {:?} {:?} rejected with {}: {}",
                    labels.webhook_id, labels.event_type, status, e
                );
            }
        }

        status
    }

    async fn process<B, T, E>(
        &self,
        signature: Option<&str>,
        body: B,
        labels: &mut EventLabels,
    ) -> Result<Resolution, WebhookError>
    where
        B: Future<Output = Result<T, E>>,
        T: AsRef<[u8]>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let body = body.await.map_err(|e| WebhookError::ReadBody(e.into()))?;
        let raw = body.as_ref();

        let event: WebhookEventCallback = serde_json::from_slice(raw)?;
        labels.webhook_id = event.webhook_id().to_string();
        labels.event_type = event.event_type().as_label().to_string();

        self.authenticator.verify(raw, signature)?;

        if let Some(created_at) = event.created_at() {
            let lag = chrono::Utc::now().signed_duration_since(created_at);
            debug!(
                "Webhook {} delivered {}ms after creation",
                labels.webhook_id,
                lag.num_milliseconds()
            );
        }

        let Some(id) = event.transaction_id() else {
            return Ok(Resolution::NoTransaction);
        };

        let transaction = self
            .api
            .get_transaction(id)
            .await
            .map_err(|source| WebhookError::TransactionFetch {
                id: id.to_string(),
                source,
            })?;

        Ok(Resolution::Transaction(transaction))
    }
}
