use chrono::{DateTime, Utc};

/// One entry from a fetched feed. Never persisted; the delivery cursor on
/// [`FeedSubscription`](super::FeedSubscription) is the only durable trace.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteItem {
    pub title: String,
    /// The item's canonical identifier for dedup. Empty when the upstream
    /// entry carries no link.
    pub link: String,
    /// Feeds frequently omit this; absence never disqualifies an item.
    pub published: Option<DateTime<Utc>>,
}
