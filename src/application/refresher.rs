//! Scrape-time refresh of account and webhook gauges.
//!
//! Each scrape recomputes the full gauge set from the Up API. Balance series are
//! overwritten per label set; series for accounts that have since disappeared are
//! left in place and keep their last value.

use crate::application::pagination::Paginator;
use crate::domain::errors::ApiError;
use crate::domain::ports::UpApi;
use crate::infrastructure::observability::Metrics;
use std::sync::Arc;
use tracing::{debug, info};

pub struct MetricsRefresher {
    api: Arc<dyn UpApi>,
    paginator: Paginator,
    metrics: Metrics,
}

impl MetricsRefresher {
    pub fn new(api: Arc<dyn UpApi>, paginator: Paginator, metrics: Metrics) -> Self {
        Self {
            api,
            paginator,
            metrics,
        }
    }

    /// Refresh accounts and webhooks concurrently.
    ///
    /// Both sides always run to completion; if either failed, the first error
    /// (accounts before webhooks) is returned.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let (accounts, webhooks) =
            tokio::join!(self.refresh_accounts(), self.refresh_webhooks());

        let accounts = accounts?;
        let webhooks = webhooks?;
        info!(
            "Refreshed metrics: {} accounts, {} webhooks",
            accounts, webhooks
        );
        Ok(())
    }

    /// Returns the number of accounts observed.
    pub async fn refresh_accounts(&self) -> Result<usize, ApiError> {
        let api = self.api.as_ref();
        let accounts = self
            .paginator
            .fetch_all(|request| api.list_accounts(request))
            .await?;

        self.metrics.accounts_count.set(accounts.len() as f64);
        for account in &accounts {
            debug!(
                "Account {} ({}): {} {}",
                account.id,
                account.display_name,
                account.balance.value_in_base_units,
                account.balance.currency_code
            );
            self.metrics
                .account_balance
                .with_label_values(&[
                    account.id.as_str(),
                    account.display_name.as_str(),
                    account.account_type.as_label(),
                    account.ownership_type.as_label(),
                    account.balance.currency_code.as_str(),
                ])
                .set(account.balance.as_f64());
        }

        Ok(accounts.len())
    }

    /// Returns the number of webhooks observed.
    pub async fn refresh_webhooks(&self) -> Result<usize, ApiError> {
        let api = self.api.as_ref();
        let webhooks = self
            .paginator
            .fetch_all(|request| api.list_webhooks(request))
            .await?;

        self.metrics.webhooks_count.set(webhooks.len() as f64);
        Ok(webhooks.len())
    }
}
