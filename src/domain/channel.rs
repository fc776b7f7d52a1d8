use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One feed tracked for one channel, with its delivery cursor.
///
/// Field names are serialized in camelCase to match the persisted
/// channel document layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSubscription {
    pub blog_name: String,
    pub feed_url: String,
    pub added_at: DateTime<Utc>,
    /// Published time of the last delivered item (send time when the item
    /// carried none). `None` means no delivery history yet.
    pub last_delivered_at: Option<DateTime<Utc>>,
    /// Link of the last delivered item. `None` means no delivery history.
    pub last_delivered_id: Option<String>,
    pub total_delivered: i64,
}

impl FeedSubscription {
    pub fn new(blog_name: String, feed_url: String) -> Self {
        Self {
            blog_name,
            feed_url,
            added_at: Utc::now(),
            last_delivered_at: None,
            last_delivered_id: None,
            total_delivered: 0,
        }
    }
}

/// One delivery target (a Discord channel) and its subscription list.
#[derive(Debug, Clone)]
pub struct Channel {
    pub id: String,
    pub feeds: Vec<FeedSubscription>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Monotonic document version used for compare-and-swap on write-back.
    /// 0 means the channel has never been persisted.
    pub version: i64,
}

impl Channel {
    pub fn new(id: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            feeds: Vec::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.feeds.iter().any(|f| f.feed_url == url)
    }

    /// Resolve a user-supplied identifier to a subscription index.
    ///
    /// Precedence: 1-based list position, then case/space-insensitive exact
    /// blog name, then exact feed URL.
    pub fn resolve_subscription(&self, identifier: &str) -> Option<usize> {
        if let Ok(position) = identifier.parse::<usize>() {
            if position >= 1 && position <= self.feeds.len() {
                return Some(position - 1);
            }
        }

        let normalized = normalize_name(identifier);
        self.feeds
            .iter()
            .position(|f| normalize_name(&f.blog_name) == normalized)
            .or_else(|| self.feeds.iter().position(|f| f.feed_url == identifier))
    }
}

fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_with(names_and_urls: &[(&str, &str)]) -> Channel {
        let mut channel = Channel::new("123".into());
        for (name, url) in names_and_urls {
            channel
                .feeds
                .push(FeedSubscription::new((*name).into(), (*url).into()));
        }
        channel
    }

    #[test]
    fn test_new_subscription_has_no_history() {
        let sub = FeedSubscription::new("Blog".into(), "https://example.com/rss".into());
        assert!(sub.last_delivered_at.is_none());
        assert!(sub.last_delivered_id.is_none());
        assert_eq!(sub.total_delivered, 0);
    }

    #[test]
    fn test_subscription_serializes_camel_case() {
        let sub = FeedSubscription::new("Blog".into(), "https://example.com/rss".into());
        let json = serde_json::to_string(&sub).unwrap();
        assert!(json.contains("\"blogName\""));
        assert!(json.contains("\"feedUrl\""));
        assert!(json.contains("\"lastDeliveredId\""));
        assert!(json.contains("\"totalDelivered\""));
    }

    #[test]
    fn test_contains_url() {
        let channel = channel_with(&[("A", "https://a.example/feed")]);
        assert!(channel.contains_url("https://a.example/feed"));
        assert!(!channel.contains_url("https://b.example/feed"));
    }

    #[test]
    fn test_resolve_by_index() {
        let channel = channel_with(&[("A", "https://a.example"), ("B", "https://b.example")]);
        assert_eq!(channel.resolve_subscription("1"), Some(0));
        assert_eq!(channel.resolve_subscription("2"), Some(1));
        assert_eq!(channel.resolve_subscription("0"), None);
        assert_eq!(channel.resolve_subscription("3"), None);
    }

    #[test]
    fn test_resolve_by_name_ignores_case_and_spaces() {
        let channel = channel_with(&[("Netflix TechBlog", "https://a.example")]);
        assert_eq!(channel.resolve_subscription("netflixtechblog"), Some(0));
        assert_eq!(channel.resolve_subscription("NETFLIX TECH BLOG"), Some(0));
        assert_eq!(channel.resolve_subscription("netflix"), None);
    }

    #[test]
    fn test_resolve_by_url() {
        let channel = channel_with(&[("A", "https://a.example/feed")]);
        assert_eq!(channel.resolve_subscription("https://a.example/feed"), Some(0));
    }

    #[test]
    fn test_resolve_index_takes_precedence_over_name() {
        // A blog literally named "2" cannot shadow list position 2.
        let channel = channel_with(&[("2", "https://a.example"), ("B", "https://b.example")]);
        assert_eq!(channel.resolve_subscription("2"), Some(1));
    }
}
