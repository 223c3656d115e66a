use crate::domain::errors::ApiError;
use crate::domain::types::{Account, Page, Transaction, Webhook};
use async_trait::async_trait;
use url::Url;

/// How to request one page of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// First page, built from the collection endpoint and a page size.
    First { page_size: u32 },
    /// Follow-up page. The cursor is the entire request target; nothing is merged in.
    Cursor(Url),
}

// Need async_trait for async functions in traits
#[async_trait]
pub trait UpApi: Send + Sync {
    async fn list_accounts(&self, request: PageRequest) -> Result<Page<Account>, ApiError>;
    async fn list_webhooks(&self, request: PageRequest) -> Result<Page<Webhook>, ApiError>;
    async fn get_transaction(&self, id: &str) -> Result<Transaction, ApiError>;
}
