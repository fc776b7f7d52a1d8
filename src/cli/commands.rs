use chrono::Utc;

use crate::app::{AppContext, FreshetError, Result};
use crate::domain::{Channel, FeedSubscription};
use crate::fetcher::Fetcher;
use crate::runner;
use crate::store::Store;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let report = runner::run_once(ctx).await?;
    println!("{}", report.summary());
    Ok(())
}

/// Subscribe a channel to a feed. The URL must resolve to a parseable feed
/// with a non-empty title, which becomes the subscription's display name.
/// The new subscription starts with no delivery cursor, so the next run
/// delivers whatever history the feed still serves.
pub async fn add_feed(ctx: &AppContext, channel_id: &str, url: &str) -> Result<()> {
    url::Url::parse(url)?;

    let feed = ctx.fetcher.fetch(url).await?;
    let blog_name = feed
        .title
        .filter(|t| !t.is_empty())
        .ok_or_else(|| FreshetError::FeedParse(format!("feed at {} has no title", url)))?;

    let mut channel = match ctx.store.get_channel(channel_id)? {
        Some(channel) => channel,
        None => Channel::new(channel_id.to_string()),
    };

    if channel.contains_url(url) {
        println!("Feed already subscribed: {}", url);
        return Ok(());
    }

    channel
        .feeds
        .push(FeedSubscription::new(blog_name.clone(), url.to_string()));
    channel.updated_at = Utc::now();

    if channel.version == 0 {
        ctx.store.insert_channel(&channel)?;
    } else {
        ctx.store.replace_channel(&channel)?;
    }

    println!("Subscribed channel {} to {}\n  {}", channel_id, blog_name, url);
    Ok(())
}

pub fn remove_feed(ctx: &AppContext, channel_id: &str, identifier: &str) -> Result<()> {
    let mut channel = ctx
        .store
        .get_channel(channel_id)?
        .ok_or_else(|| FreshetError::ChannelNotFound(channel_id.to_string()))?;

    let index = channel
        .resolve_subscription(identifier)
        .ok_or_else(|| FreshetError::FeedNotFound(identifier.to_string()))?;

    let removed = channel.feeds.remove(index);
    channel.updated_at = Utc::now();
    ctx.store.replace_channel(&channel)?;

    println!("Unsubscribed from {}", removed.blog_name);
    Ok(())
}

pub fn list_feeds(ctx: &AppContext, channel_id: &str) -> Result<()> {
    let feeds = ctx
        .store
        .get_channel(channel_id)?
        .map(|channel| channel.feeds)
        .unwrap_or_default();

    if feeds.is_empty() {
        println!("No feeds registered for channel {}", channel_id);
        return Ok(());
    }

    for (i, feed) in feeds.iter().enumerate() {
        println!(
            "{}. {}\n   {}\n   {} items delivered",
            i + 1,
            feed.blog_name,
            feed.feed_url,
            feed.total_delivered
        );
    }

    Ok(())
}
