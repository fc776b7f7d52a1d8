pub mod http_fetcher;

use std::time::Duration;

use async_trait::async_trait;

use crate::app::Result;
use crate::normalizer::FetchedFeed;

pub use http_fetcher::HttpFetcher;

/// Maximum fetch attempts per feed per run.
pub const FETCH_ATTEMPTS: u32 = 3;

#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedFeed>;
}

/// Fetch a feed with linear backoff: failed attempt k (k < 3) is followed
/// by a wait of `k * backoff_unit`. The last error is returned after the
/// third failure; callers skip the feed for the rest of the run.
pub async fn fetch_with_retry(
    fetcher: &(dyn Fetcher + Send + Sync),
    url: &str,
    backoff_unit: Duration,
) -> Result<FetchedFeed> {
    let mut attempt = 1;
    loop {
        match fetcher.fetch(url).await {
            Ok(feed) => return Ok(feed),
            Err(e) if attempt < FETCH_ATTEMPTS => {
                let wait = backoff_unit * attempt;
                tracing::warn!(
                    "Failed to fetch feed {} (attempt {}/{}): {}. Retrying in {:?}",
                    url,
                    attempt,
                    FETCH_ATTEMPTS,
                    e,
                    wait
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
