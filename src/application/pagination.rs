//! Cursor-following fetch loop shared by every paginated collection.

use crate::domain::errors::ApiError;
use crate::domain::ports::PageRequest;
use crate::domain::types::Page;
use std::future::Future;
use tracing::debug;
use url::Url;

/// Default page size for paginated requests.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct Paginator {
    base_url: Url,
    page_size: u32,
}

impl Paginator {
    /// `base_url` is only used to resolve relative cursors; absolute cursors replace it.
    pub fn new(base_url: Url, page_size: u32) -> Self {
        Self {
            base_url,
            page_size,
        }
    }

    /// Fetch every page in order and concatenate their items.
    ///
    /// Pages are fetched one after another, each from the previous page's cursor.
    /// The first failed page (or unparseable cursor) ends the traversal with that error.
    pub async fn fetch_all<T, F, Fut>(&self, mut fetch_page: F) -> Result<Vec<T>, ApiError>
    where
        F: FnMut(PageRequest) -> Fut,
        Fut: Future<Output = Result<Page<T>, ApiError>>,
    {
        let mut items = Vec::new();
        let mut request = PageRequest::First {
            page_size: self.page_size,
        };
        let mut pages = 0usize;

        loop {
            let page = fetch_page(request).await?;
            pages += 1;
            items.extend(page.items);

            match page.next.filter(|cursor| !cursor.is_empty()) {
                Some(cursor) => request = PageRequest::Cursor(self.resolve_cursor(&cursor)?),
                None => break,
            }
        }

        debug!("Fetched {} items across {} pages", items.len(), pages);
        Ok(items)
    }

    fn resolve_cursor(&self, cursor: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(cursor)
            .map_err(|source| ApiError::InvalidCursor {
                cursor: cursor.to_string(),
                source,
            })
    }
}
