use html_escape::decode_html_entities;

use crate::app::{FreshetError, Result};
use crate::domain::RemoteItem;

/// A parsed feed: its display title plus entries in upstream order
/// (newest first by feed convention).
#[derive(Debug, Clone)]
pub struct FetchedFeed {
    pub title: Option<String>,
    pub items: Vec<RemoteItem>,
}

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, body: &[u8]) -> Result<FetchedFeed> {
        let feed = feed_rs::parser::parse(body)
            .map_err(|e| FreshetError::FeedParse(e.to_string()))?;

        let title = feed
            .title
            .map(|t| decode_html_entities(&t.content).to_string());

        let items: Vec<RemoteItem> = feed
            .entries
            .into_iter()
            .map(|entry| RemoteItem {
                title: entry
                    .title
                    .map(|t| decode_html_entities(&t.content).to_string())
                    .unwrap_or_default(),
                link: entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_default(),
                published: entry
                    .published
                    .or(entry.updated)
                    .map(|dt| dt.with_timezone(&chrono::Utc)),
            })
            .collect();

        Ok(FetchedFeed { title, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test &amp; Feed</title>
    <item>
      <title>Newest Item</title>
      <link>https://example.com/item2</link>
      <guid>item-2</guid>
      <pubDate>Tue, 02 Jan 2024 00:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Older Item</title>
      <link>https://example.com/item1</link>
      <guid>item-1</guid>
    </item>
  </channel>
</rss>"#;

    const ATOM_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Test Feed</title>
  <entry>
    <title>Atom Entry 1</title>
    <link href="https://example.com/atom1"/>
    <id>atom-entry-1</id>
    <updated>2024-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss() {
        let normalizer = Normalizer::new();
        let feed = normalizer.normalize(RSS_SAMPLE.as_bytes()).unwrap();

        assert_eq!(feed.title, Some("Test & Feed".into()));
        assert_eq!(feed.items.len(), 2);
        assert_eq!(feed.items[0].title, "Newest Item");
        assert_eq!(feed.items[0].link, "https://example.com/item2");
        assert!(feed.items[0].published.is_some());
    }

    #[test]
    fn test_parse_atom_falls_back_to_updated() {
        let normalizer = Normalizer::new();
        let feed = normalizer.normalize(ATOM_SAMPLE.as_bytes()).unwrap();

        assert_eq!(feed.title, Some("Atom Test Feed".into()));
        assert_eq!(feed.items.len(), 1);
        assert_eq!(feed.items[0].link, "https://example.com/atom1");
        assert!(feed.items[0].published.is_some());
    }

    #[test]
    fn test_missing_pub_date_stays_none() {
        let normalizer = Normalizer::new();
        let feed = normalizer.normalize(RSS_SAMPLE.as_bytes()).unwrap();

        assert!(feed.items[1].published.is_none());
    }

    #[test]
    fn test_upstream_order_preserved() {
        let normalizer = Normalizer::new();
        let feed = normalizer.normalize(RSS_SAMPLE.as_bytes()).unwrap();

        assert_eq!(feed.items[0].title, "Newest Item");
        assert_eq!(feed.items[1].title, "Older Item");
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let normalizer = Normalizer::new();
        assert!(normalizer.normalize(b"not a feed").is_err());
    }
}
