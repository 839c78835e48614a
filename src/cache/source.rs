use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::{debug, warn};

use super::store::PageStore;
use crate::github::models::ResultPage;
use crate::metrics::report::{PullRequestSource, SearchQuery};

/// Serves pages from a `PageStore` while they are younger than `ttl`,
/// otherwise asks the wrapped source and remembers the answer.
pub struct CachedSource<S> {
    inner: S,
    store: PageStore,
    ttl: Duration,
}

impl<S: PullRequestSource> CachedSource<S> {
    pub fn new(inner: S, store: PageStore, ttl: Duration) -> Self {
        Self { inner, store, ttl }
    }
}

/// Identifies one page of one query.
pub fn page_key(query: &SearchQuery, after: Option<&str>) -> String {
    format!(
        "{}-{}-p{}-r{}-{}",
        query.repo.host,
        query.search_string(),
        query.page_size,
        query.review_limit,
        after.unwrap_or("first"),
    )
}

impl<S: PullRequestSource> PullRequestSource for CachedSource<S> {
    async fn fetch_page(&self, query: &SearchQuery, after: Option<&str>) -> Result<ResultPage> {
        let key = page_key(query, after);
        match self.store.load(&key) {
            Some(stored) if stored.is_fresh(self.ttl, Utc::now()) => {
                debug!(key = %key, fetched_at = %stored.fetched_at, "Page served from cache");
                return Ok(stored.page);
            }
            Some(stored) => debug!(key = %key, fetched_at = %stored.fetched_at, "Cached page is stale"),
            None => {}
        }

        let page = self.inner.fetch_page(query, after).await?;
        if let Err(e) = self.store.save(&key, &page) {
            warn!(key = %key, error = %e, "Failed to cache search page");
        }
        Ok(page)
    }
}
