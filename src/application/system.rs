use crate::application::pagination::Paginator;
use crate::application::refresher::MetricsRefresher;
use crate::application::webhook::{WebhookAuthenticator, WebhookPipeline};
use crate::config::ExporterConfig;
use crate::domain::errors::ConfigError;
use crate::domain::ports::UpApi;
use crate::infrastructure::observability::Metrics;
use crate::infrastructure::up::UpClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Fully wired exporter: one metric registry, one API client, and the components
/// that share them.
pub struct Application {
    pub metrics: Metrics,
    pub refresher: Arc<MetricsRefresher>,
    /// Present only when a webhook secret key is configured.
    pub webhook: Option<Arc<WebhookPipeline>>,
}

impl Application {
    pub fn build(config: &ExporterConfig) -> Result<Self, ConfigError> {
        let metrics = Metrics::new()?;
        let client = UpClient::new(
            &config.up_api_base_url,
            &config.bearer_token,
            metrics.clone(),
        )?;
        let paginator = Paginator::new(client.base_url().clone(), config.page_size);
        let api: Arc<dyn UpApi> = Arc::new(client);

        let app = Self::with_api(
            api,
            paginator,
            metrics,
            config.webhook_secret_key.as_deref(),
            config.webhook_timeout,
        );

        info!(
            "Exporter built: api={}, page_size={}, webhook={}",
            config.up_api_base_url,
            config.page_size,
            if config.webhook_enabled() { "enabled" } else { "disabled" }
        );
        Ok(app)
    }

    /// Wire the components around an arbitrary [`UpApi`].
    pub fn with_api(
        api: Arc<dyn UpApi>,
        paginator: Paginator,
        metrics: Metrics,
        webhook_secret_key: Option<&[u8]>,
        webhook_deadline: Duration,
    ) -> Self {
        let refresher = Arc::new(MetricsRefresher::new(
            api.clone(),
            paginator,
            metrics.clone(),
        ));
        let webhook = webhook_secret_key.map(|key| {
            Arc::new(
                WebhookPipeline::new(api, WebhookAuthenticator::new(key), metrics.clone())
                    .with_deadline(webhook_deadline),
            )
        });

        Self {
            metrics,
            refresher,
            webhook,
        }
    }
}
