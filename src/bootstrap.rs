//! One-time seeding of configured channels with the default feed catalog.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};

use crate::app::Result;
use crate::config::{CatalogEntry, DeliveryConfig};
use crate::domain::{Channel, FeedSubscription};
use crate::fetcher::Fetcher;
use crate::store::Store;

/// Concurrent seed fetches per channel. The stream stays ordered so the
/// stored feed list matches the catalog.
const SEED_WORKERS: usize = 5;

/// Create a channel document for every configured id the store has never
/// seen, seeded with the full default catalog. Idempotent: existing
/// channels are never touched.
///
/// Each catalog feed is fetched once so the subscription cursor starts at
/// the feed's current newest item; a channel's first run therefore delivers
/// nothing instead of replaying history.
pub async fn ensure_channels<S: Store>(
    store: &S,
    fetcher: &Arc<dyn Fetcher + Send + Sync>,
    catalog: &[CatalogEntry],
    channel_ids: &[String],
    delivery: &DeliveryConfig,
) -> Result<()> {
    for id in channel_ids {
        let id = id.trim();
        if id.is_empty() {
            continue;
        }
        if store.channel_exists(id)? {
            continue;
        }

        let mut channel = Channel::new(id.to_string());
        channel.feeds = seed_catalog(fetcher, catalog, delivery).await;

        match store.insert_channel(&channel) {
            Ok(()) => {
                tracing::info!(
                    "Initialized channel {} with {} default feeds",
                    id,
                    channel.feeds.len()
                );
            }
            Err(e) => {
                tracing::warn!("Failed to create channel document for {}: {}", id, e);
            }
        }
    }

    Ok(())
}

async fn seed_catalog(
    fetcher: &Arc<dyn Fetcher + Send + Sync>,
    catalog: &[CatalogEntry],
    delivery: &DeliveryConfig,
) -> Vec<FeedSubscription> {
    let pacing = Duration::from_millis(delivery.seed_pacing_ms);

    stream::iter(catalog.iter().cloned())
        .map(|entry| {
            let fetcher = fetcher.clone();
            async move { seed_subscription(fetcher.as_ref(), entry, pacing).await }
        })
        .buffered(SEED_WORKERS)
        .collect()
        .await
}

/// Build one subscription with its cursor at the feed's current newest
/// item. A single attempt; a feed that is down starts with an empty cursor
/// stamped at run time.
async fn seed_subscription(
    fetcher: &(dyn Fetcher + Send + Sync),
    entry: CatalogEntry,
    pacing: Duration,
) -> FeedSubscription {
    let mut sub = FeedSubscription::new(entry.name, entry.url);

    match fetcher.fetch(&sub.feed_url).await {
        Ok(feed) => match feed.items.first() {
            Some(newest) => {
                sub.last_delivered_id = Some(newest.link.clone());
                sub.last_delivered_at = Some(newest.published.unwrap_or_else(Utc::now));
            }
            None => sub.last_delivered_at = Some(Utc::now()),
        },
        Err(e) => {
            tracing::warn!("Failed to fetch {} during seeding: {}", sub.blog_name, e);
            sub.last_delivered_at = Some(Utc::now());
        }
    }

    tokio::time::sleep(pacing).await;
    sub
}
