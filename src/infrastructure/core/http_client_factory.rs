use crate::domain::errors::ConfigError;
use crate::infrastructure::core::auth::BearerAuthMiddleware;
use crate::infrastructure::core::instrumentation::InstrumentationMiddleware;
use crate::infrastructure::observability::Metrics;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use std::time::Duration;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates the Up API client: bearer auth and instrumentation, no retry.
    ///
    /// Upstream failures surface immediately as degraded metrics or a 500 to the
    /// webhook sender, which redelivers on its own schedule.
    pub fn create_client(
        bearer_token: &str,
        metrics: Metrics,
    ) -> Result<ClientWithMiddleware, ConfigError> {
        let auth = BearerAuthMiddleware::new(bearer_token)?;

        let client = Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(ClientBuilder::new(client)
            .with(auth)
            .with(InstrumentationMiddleware::new(metrics))
            .build())
    }
}
