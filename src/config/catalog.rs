//! The default feed catalog used to seed newly encountered channels.
//!
//! Changing this list never touches channels that were already seeded.

/// One (display name, feed URL) pair in the default catalog.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub name: String,
    pub url: String,
}

const DEFAULT_FEEDS: &[(&str, &str)] = &[
    ("NAVER D2", "https://d2.naver.com/d2.atom"),
    ("토스 테크", "https://toss.tech/rss.xml"),
    ("컬리 기술 블로그", "https://helloworld.kurly.com/feed.xml"),
    ("MUSINSA tech", "https://medium.com/feed/musinsa-tech"),
    ("당근 테크 블로그", "https://medium.com/feed/daangn"),
    ("뱅크샐러드 블로그", "https://blog.banksalad.com/rss.xml"),
    ("요기요 기술블로그", "https://techblog.yogiyo.co.kr/feed"),
    ("Hyperconnect Tech Blog", "https://hyperconnect.github.io/feed.xml"),
    (
        "LY Corporation Tech Blog",
        "https://techblog.lycorp.co.jp/ko/feed/index.xml",
    ),
    ("강남언니 블로그", "https://blog.gangnamunni.com/feed.xml"),
    ("데브시스터즈 기술 블로그", "https://tech.devsisters.com/rss.xml"),
    ("SOCAR Tech Blog", "https://tech.socarcorp.kr/feed"),
    ("NHN Cloud Meetup", "https://meetup.nhncloud.com/rss"),
    ("ByteByteGo Newsletter", "https://blog.bytebytego.com/feed"),
    ("Netflix TechBlog", "https://netflixtechblog.com/feed"),
    ("The GitHub Blog", "https://github.blog/feed"),
    ("Engineering at Slack", "https://slack.engineering/feed"),
    (
        "The Airbnb Tech Blog",
        "https://medium.com/feed/airbnb-engineering",
    ),
    ("Spotify Engineering", "https://engineering.atspotify.com/feed"),
    (
        "Pinterest Engineering",
        "https://medium.com/feed/@Pinterest_Engineering",
    ),
];

/// The built-in catalog. Callers receive an owned copy so tests can pass a
/// smaller list instead.
pub fn default_catalog() -> Vec<CatalogEntry> {
    DEFAULT_FEEDS
        .iter()
        .map(|(name, url)| CatalogEntry {
            name: (*name).to_string(),
            url: (*url).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_urls_are_unique() {
        let catalog = default_catalog();
        let mut urls: Vec<&str> = catalog.iter().map(|e| e.url.as_str()).collect();
        let before = urls.len();
        urls.sort_unstable();
        urls.dedup();
        assert_eq!(urls.len(), before);
    }

    #[test]
    fn test_catalog_is_nonempty_and_named() {
        let catalog = default_catalog();
        assert!(!catalog.is_empty());
        assert!(catalog.iter().all(|e| !e.name.is_empty() && !e.url.is_empty()));
    }
}
