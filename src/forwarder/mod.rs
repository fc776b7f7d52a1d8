pub mod parallel;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::config::DeliveryConfig;
use crate::domain::{Channel, FeedSubscription, RemoteItem};
use crate::fetcher::{fetch_with_retry, Fetcher, FETCH_ATTEMPTS};
use crate::notifier::Notifier;

pub use parallel::ParallelForwarder;

/// Result of processing one channel.
#[derive(Debug)]
pub struct ChannelOutcome {
    pub channel: Channel,
    pub new_items: usize,
    /// True when at least one item was delivered and the channel document
    /// must be written back.
    pub mutated: bool,
}

/// Fetches a channel's feeds, decides which items are new relative to each
/// subscription's cursor, and forwards them.
pub struct Forwarder {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    notifier: Arc<dyn Notifier + Send + Sync>,
    delivery: DeliveryConfig,
}

impl Forwarder {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
        delivery: DeliveryConfig,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            delivery,
        }
    }

    /// Process every subscription of one channel, in list order. Fetch and
    /// send failures are logged and contained; they never abort the
    /// remaining subscriptions.
    pub async fn process_channel(&self, mut channel: Channel) -> ChannelOutcome {
        let channel_id = channel.id.clone();
        let mut new_items = 0;
        let mut paced = false;

        for sub in &mut channel.feeds {
            new_items += self
                .process_subscription(&channel_id, sub, &mut paced)
                .await;
        }

        let mutated = new_items > 0;
        if mutated {
            channel.updated_at = Utc::now();
        }

        ChannelOutcome {
            channel,
            new_items,
            mutated,
        }
    }

    async fn process_subscription(
        &self,
        channel_id: &str,
        sub: &mut FeedSubscription,
        paced: &mut bool,
    ) -> usize {
        let backoff = Duration::from_millis(self.delivery.retry_backoff_ms);
        let feed = match fetch_with_retry(self.fetcher.as_ref(), &sub.feed_url, backoff).await {
            Ok(feed) => feed,
            Err(e) => {
                tracing::warn!(
                    "Skipping feed {} for channel {} after {} attempts: {}",
                    sub.blog_name,
                    channel_id,
                    FETCH_ATTEMPTS,
                    e
                );
                return 0;
            }
        };

        let mut delivered = 0;

        for item in select_new_items(sub, &feed.items) {
            // Pace successive sends to the same channel, failed ones
            // included: the API call happened either way.
            if *paced {
                tokio::time::sleep(Duration::from_millis(self.delivery.send_pacing_ms)).await;
            }
            *paced = true;

            let content = render_message(&sub.blog_name, &item);
            match self.notifier.notify(channel_id, &content).await {
                Ok(()) => {
                    sub.last_delivered_id = Some(item.link.clone());
                    sub.last_delivered_at = Some(item.published.unwrap_or_else(Utc::now));
                    sub.total_delivered += 1;
                    delivered += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to deliver \"{}\" from {} to channel {}: {}",
                        item.title,
                        sub.blog_name,
                        channel_id,
                        e
                    );
                }
            }
        }

        delivered
    }
}

/// Walk fetched items newest-first, stopping at the stored cursor link and
/// dropping items published before the cursor timestamp. The survivors are
/// returned oldest-first, ready to send in chronological order.
fn select_new_items(sub: &FeedSubscription, items: &[RemoteItem]) -> Vec<RemoteItem> {
    let mut fresh = Vec::new();

    for item in items {
        if let Some(cursor) = sub.last_delivered_id.as_deref() {
            if !cursor.is_empty() && cursor == item.link {
                break;
            }
        }

        // Out-of-order reposts are skipped, but the walk continues: a
        // missing timestamp never disqualifies an item.
        if let (Some(published), Some(last)) = (item.published, sub.last_delivered_at) {
            if published < last {
                continue;
            }
        }

        fresh.push(item.clone());
    }

    fresh.reverse();
    fresh
}

pub fn render_message(blog_name: &str, item: &RemoteItem) -> String {
    format!("{}\n{}\n{}", blog_name, item.title, item.link)
}
