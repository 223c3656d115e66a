use crate::domain::errors::ApiError;
use crate::domain::ports::{PageRequest, UpApi};
use crate::domain::types::{Account, Page, Transaction, Webhook};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::Mutex;

/// In-memory Up API with scripted pages, for tests.
///
/// Pages are served in the order they were pushed. Once a collection runs out of
/// scripted pages it answers with an empty final page.
#[derive(Default)]
pub struct MockUpApi {
    account_pages: Mutex<VecDeque<Result<Page<Account>, ApiError>>>,
    webhook_pages: Mutex<VecDeque<Result<Page<Webhook>, ApiError>>>,
    transactions: Mutex<HashMap<String, Transaction>>,
    transaction_delay: Mutex<Option<Duration>>,
    account_requests: Mutex<Vec<PageRequest>>,
    webhook_requests: Mutex<Vec<PageRequest>>,
    transaction_requests: Mutex<Vec<String>>,
}

impl MockUpApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_account_page(&self, page: Result<Page<Account>, ApiError>) {
        self.account_pages.lock().await.push_back(page);
    }

    pub async fn push_webhook_page(&self, page: Result<Page<Webhook>, ApiError>) {
        self.webhook_pages.lock().await.push_back(page);
    }

    pub async fn insert_transaction(&self, transaction: Transaction) {
        self.transactions
            .lock()
            .await
            .insert(transaction.id.clone(), transaction);
    }

    /// Delay every transaction lookup, e.g. to exercise deadlines.
    pub async fn set_transaction_delay(&self, delay: Duration) {
        *self.transaction_delay.lock().await = Some(delay);
    }

    pub async fn account_requests(&self) -> Vec<PageRequest> {
        self.account_requests.lock().await.clone()
    }

    pub async fn webhook_requests(&self) -> Vec<PageRequest> {
        self.webhook_requests.lock().await.clone()
    }

    pub async fn transaction_requests(&self) -> Vec<String> {
        self.transaction_requests.lock().await.clone()
    }
}

#[async_trait]
impl UpApi for MockUpApi {
    async fn list_accounts(&self, request: PageRequest) -> Result<Page<Account>, ApiError> {
        self.account_requests.lock().await.push(request);
        self.account_pages
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Page::last(Vec::new())))
    }

    async fn list_webhooks(&self, request: PageRequest) -> Result<Page<Webhook>, ApiError> {
        self.webhook_requests.lock().await.push(request);
        self.webhook_pages
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Page::last(Vec::new())))
    }

    async fn get_transaction(&self, id: &str) -> Result<Transaction, ApiError> {
        self.transaction_requests.lock().await.push(id.to_string());

        let delay = *self.transaction_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.transactions
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::UnexpectedStatus {
                path: format!("/api/v1/transactions/{id}"),
                status: 404,
            })
    }
}
