//! Prometheus metrics definitions for the Up Bank exporter
//!
//! All metrics use the `up_bank_` prefix. Names and label sets are kept stable so
//! existing dashboards keep working.

use prometheus::{CounterVec, Gauge, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Latency buckets in milliseconds.
const LATENCY_MS_RANGE: (f64, f64) = (1.0, 2000.0);
/// Response size buckets in bytes, up to 1 MiB.
const RESPONSE_SIZE_RANGE: (f64, f64) = (1.0, 1_048_576.0);
const BUCKET_COUNT: usize = 25;

/// Exporter metric set, bound to its own registry.
///
/// Cloning is cheap and every clone updates the same series, so one instance is
/// created at startup and handed to each component.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Number of accounts seen on the last refresh
    pub accounts_count: Gauge,
    /// Balance per account in base currency units
    pub account_balance: GaugeVec,
    /// Number of configured webhooks
    pub webhooks_count: Gauge,
    /// Outbound Up API requests in flight
    pub outgoing_inflights: Gauge,
    /// Outbound requests by path and status code
    pub request_total: CounterVec,
    /// Outbound request latency (ms)
    pub request_latency: HistogramVec,
    /// Outbound response body size (bytes)
    pub response_size: HistogramVec,
    /// Webhook deliveries by webhook, event type and response status
    pub webhook_requests: CounterVec,
    /// Webhook deliveries in flight
    pub webhook_inflights: Gauge,
    /// Transactions processed by the webhook handler
    pub transaction_count: CounterVec,
    /// Transaction amounts processed by the webhook handler, in base units
    pub transaction_amount: CounterVec,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges, counters and histograms registered
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let accounts_count = Gauge::with_opts(Opts::new(
            "up_bank_accounts_count",
            "Count of Up bank accounts",
        ))?;
        registry.register(Box::new(accounts_count.clone()))?;

        let account_balance = GaugeVec::new(
            Opts::new(
                "up_bank_account_balance",
                "Up bank account balance in base currency units (e.g. cents)",
            ),
            &[
                "id",
                "display_name",
                "account_type",
                "ownership_type",
                "currency_code",
            ],
        )?;
        registry.register(Box::new(account_balance.clone()))?;

        let webhooks_count = Gauge::with_opts(Opts::new(
            "up_bank_webhooks_count",
            "Count of configured Up webhooks",
        ))?;
        registry.register(Box::new(webhooks_count.clone()))?;

        let outgoing_inflights = Gauge::with_opts(Opts::new(
            "up_bank_http_outgoing_inflights",
            "Number of Up bank outgoing HTTP requests inflight",
        ))?;
        registry.register(Box::new(outgoing_inflights.clone()))?;

        let request_total = CounterVec::new(
            Opts::new("up_bank_http_request_total", "Total HTTP requests to the Up API"),
            &["path", "code"],
        )?;
        registry.register(Box::new(request_total.clone()))?;

        let request_latency = HistogramVec::new(
            HistogramOpts::new(
                "up_bank_http_request_latency",
                "Latency histogram of Up API requests (ms)",
            )
            .buckets(exponential_buckets_range(
                LATENCY_MS_RANGE.0,
                LATENCY_MS_RANGE.1,
                BUCKET_COUNT,
            )?),
            &["path", "code"],
        )?;
        registry.register(Box::new(request_latency.clone()))?;

        let response_size = HistogramVec::new(
            HistogramOpts::new(
                "up_bank_http_response_size",
                "Up bank API response size bytes",
            )
            .buckets(exponential_buckets_range(
                RESPONSE_SIZE_RANGE.0,
                RESPONSE_SIZE_RANGE.1,
                BUCKET_COUNT,
            )?),
            &["path", "code"],
        )?;
        registry.register(Box::new(response_size.clone()))?;

        let webhook_requests = CounterVec::new(
            Opts::new(
                "up_bank_webhook_requests",
                "Up bank webhook requests with full information labels",
            ),
            &["webhook_id", "event_type", "status"],
        )?;
        registry.register(Box::new(webhook_requests.clone()))?;

        let webhook_inflights = Gauge::with_opts(Opts::new(
            "up_bank_webhook_incoming_inflights",
            "Number of inflight incoming webhook requests",
        ))?;
        registry.register(Box::new(webhook_inflights.clone()))?;

        let transaction_count = CounterVec::new(
            Opts::new(
                "up_bank_transaction_count",
                "Up bank transaction count processed by the webhook handler",
            ),
            &["account_id", "status"],
        )?;
        registry.register(Box::new(transaction_count.clone()))?;

        let transaction_amount = CounterVec::new(
            Opts::new(
                "up_bank_transaction_amount",
                "Up bank transaction amount in base units processed by the webhook handler. \
                 For example, for an Australian dollar value of $10.56, this is 1056.",
            ),
            &["account_id", "status"],
        )?;
        registry.register(Box::new(transaction_amount.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            accounts_count,
            account_balance,
            webhooks_count,
            outgoing_inflights,
            request_total,
            request_latency,
            response_size,
            webhook_requests,
            webhook_inflights,
            transaction_count,
            transaction_amount,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    /// Record an outbound request once its response headers have arrived
    pub fn observe_request(&self, path: &str, code: &str, latency_ms: f64) {
        let labels = [path, code];
        self.request_total.with_label_values(&labels).inc();
        self.request_latency
            .with_label_values(&labels)
            .observe(latency_ms);
    }

    /// Record how many body bytes were read for an outbound request
    pub fn observe_response_size(&self, path: &str, code: &str, size_bytes: f64) {
        self.response_size
            .with_label_values(&[path, code])
            .observe(size_bytes);
    }

    /// Increment the webhook request counter for one finished delivery
    pub fn inc_webhook_request(&self, webhook_id: &str, event_type: &str, status: &str) {
        self.webhook_requests
            .with_label_values(&[webhook_id, event_type, status])
            .inc();
    }

    /// Count a resolved transaction and add its amount.
    ///
    /// Debits arrive as negative amounts; counters only go up, so the magnitude is added.
    pub fn record_transaction(&self, account_id: &str, status: &str, amount: f64) {
        let labels = [account_id, status];
        self.transaction_count.with_label_values(&labels).inc();
        self.transaction_amount
            .with_label_values(&labels)
            .inc_by(amount.abs());
    }
}

/// `count` exponentially spaced buckets from `min` to `max` inclusive.
pub fn exponential_buckets_range(
    min: f64,
    max: f64,
    count: usize,
) -> Result<Vec<f64>, prometheus::Error> {
    if count < 2 || min <= 0.0 || max <= min {
        return Err(prometheus::Error::Msg(format!(
            "invalid bucket range: min={min}, max={max}, count={count}"
        )));
    }
    let factor = (max / min).powf(1.0 / (count - 1) as f64);
    prometheus::exponential_buckets(min, factor, count)
}

/// Increments a gauge on creation and decrements it on drop.
pub struct InFlightGuard {
    gauge: Gauge,
}

impl InFlightGuard {
    pub fn new(gauge: &Gauge) -> Self {
        gauge.inc();
        Self {
            gauge: gauge.clone(),
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}
