use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::app::Result;
use crate::fetcher::Fetcher;
use crate::normalizer::{FetchedFeed, Normalizer};

/// Fixed client signature so upstream operators can allow or deny us.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (compatible; Freshet/0.1; +https://github.com/freshet-rs/freshet)";

pub struct HttpFetcher {
    client: Client,
    normalizer: Normalizer,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            // Hobbyist blogs routinely serve incomplete certificate chains;
            // feed content is display-only, never executed.
            .danger_accept_invalid_certs(true)
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            normalizer: Normalizer::new(),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedFeed> {
        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;

        let body = response.bytes().await?;
        self.normalizer.normalize(&body)
    }
}
