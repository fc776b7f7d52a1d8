use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};

use crate::app::{FreshetError, Result};
use crate::domain::{Channel, FeedSubscription};
use crate::store::Store;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn.lock().map_err(|e| {
            FreshetError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })?;

        migrations
            .to_latest(&mut conn)
            .map_err(|_| FreshetError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }

    fn row_to_channel(row: &rusqlite::Row<'_>) -> rusqlite::Result<(Channel, String)> {
        let id: String = row.get(0)?;
        let feeds_doc: String = row.get(1)?;
        let channel = Channel {
            id,
            feeds: Vec::new(),
            created_at: row
                .get::<_, String>(2)
                .ok()
                .and_then(|s| Self::parse_datetime(&s))
                .unwrap_or_else(Utc::now),
            updated_at: row
                .get::<_, String>(3)
                .ok()
                .and_then(|s| Self::parse_datetime(&s))
                .unwrap_or_else(Utc::now),
            version: row.get(4)?,
        };
        Ok((channel, feeds_doc))
    }

    fn decode_feeds(doc: &str) -> Result<Vec<FeedSubscription>> {
        Ok(serde_json::from_str(doc)?)
    }
}

impl Store for SqliteStore {
    fn insert_channel(&self, channel: &Channel) -> Result<()> {
        let feeds_doc = serde_json::to_string(&channel.feeds)?;

        let conn = self.conn.lock().map_err(|e| {
            FreshetError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })?;

        conn.execute(
            "INSERT INTO channels (id, feeds, created_at, updated_at, version)
             VALUES (?1, ?2, ?3, ?4, 1)",
            params![
                channel.id,
                feeds_doc,
                channel.created_at.to_rfc3339(),
                channel.updated_at.to_rfc3339()
            ],
        )?;

        Ok(())
    }

    fn get_channel(&self, id: &str) -> Result<Option<Channel>> {
        let conn = self.conn.lock().map_err(|e| {
            FreshetError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })?;

        let result = conn
            .query_row(
                "SELECT id, feeds, created_at, updated_at, version
                 FROM channels WHERE id = ?1",
                params![id],
                Self::row_to_channel,
            )
            .optional()?;

        match result {
            Some((mut channel, feeds_doc)) => {
                channel.feeds = Self::decode_feeds(&feeds_doc)?;
                Ok(Some(channel))
            }
            None => Ok(None),
        }
    }

    fn all_channels(&self) -> Result<Vec<Channel>> {
        let conn = self.conn.lock().map_err(|e| {
            FreshetError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })?;

        let mut stmt = conn.prepare(
            "SELECT id, feeds, created_at, updated_at, version
             FROM channels ORDER BY id",
        )?;

        let rows = stmt
            .query_map([], Self::row_to_channel)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut channels = Vec::with_capacity(rows.len());
        for (mut channel, feeds_doc) in rows {
            channel.feeds = Self::decode_feeds(&feeds_doc)?;
            channels.push(channel);
        }

        Ok(channels)
    }

    fn channel_exists(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().map_err(|e| {
            FreshetError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM channels WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn replace_channel(&self, channel: &Channel) -> Result<i64> {
        let feeds_doc = serde_json::to_string(&channel.feeds)?;

        let conn = self.conn.lock().map_err(|e| {
            FreshetError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })?;

        let updated = conn.execute(
            "UPDATE channels SET feeds = ?1, updated_at = ?2, version = version + 1
             WHERE id = ?3 AND version = ?4",
            params![
                feeds_doc,
                channel.updated_at.to_rfc3339(),
                channel.id,
                channel.version
            ],
        )?;

        if updated == 0 {
            let exists: i64 = conn.query_row(
                "SELECT COUNT(*) FROM channels WHERE id = ?1",
                params![channel.id],
                |row| row.get(0),
            )?;

            return if exists > 0 {
                Err(FreshetError::WriteConflict(channel.id.clone()))
            } else {
                Err(FreshetError::ChannelNotFound(channel.id.clone()))
            };
        }

        Ok(channel.version + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_channel(id: &str) -> Channel {
        let mut channel = Channel::new(id.into());
        channel.feeds.push(FeedSubscription::new(
            "Example Blog".into(),
            "https://example.com/feed.xml".into(),
        ));
        channel
    }

    #[test]
    fn test_insert_and_get_roundtrip() {
        let store = SqliteStore::in_memory().unwrap();
        store.insert_channel(&sample_channel("123")).unwrap();

        let channel = store.get_channel("123").unwrap().unwrap();
        assert_eq!(channel.id, "123");
        assert_eq!(channel.version, 1);
        assert_eq!(channel.feeds.len(), 1);
        assert_eq!(channel.feeds[0].blog_name, "Example Blog");
        assert!(channel.feeds[0].last_delivered_id.is_none());
    }

    #[test]
    fn test_get_missing_channel() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get_channel("nope").unwrap().is_none());
    }

    #[test]
    fn test_channel_exists() {
        let store = SqliteStore::in_memory().unwrap();
        store.insert_channel(&sample_channel("123")).unwrap();

        assert!(store.channel_exists("123").unwrap());
        assert!(!store.channel_exists("456").unwrap());
    }

    #[test]
    fn test_all_channels() {
        let store = SqliteStore::in_memory().unwrap();
        store.insert_channel(&sample_channel("b")).unwrap();
        store.insert_channel(&sample_channel("a")).unwrap();

        let channels = store.all_channels().unwrap();
        assert_eq!(channels.len(), 2);
    }

    #[test]
    fn test_replace_advances_version() {
        let store = SqliteStore::in_memory().unwrap();
        store.insert_channel(&sample_channel("123")).unwrap();

        let mut channel = store.get_channel("123").unwrap().unwrap();
        channel.feeds[0].total_delivered = 5;
        let new_version = store.replace_channel(&channel).unwrap();
        assert_eq!(new_version, 2);

        let reread = store.get_channel("123").unwrap().unwrap();
        assert_eq!(reread.version, 2);
        assert_eq!(reread.feeds[0].total_delivered, 5);
    }

    #[test]
    fn test_replace_with_stale_version_conflicts() {
        let store = SqliteStore::in_memory().unwrap();
        store.insert_channel(&sample_channel("123")).unwrap();

        let stale = store.get_channel("123").unwrap().unwrap();
        let fresh = store.get_channel("123").unwrap().unwrap();
        store.replace_channel(&fresh).unwrap();

        let result = store.replace_channel(&stale);
        assert!(matches!(result, Err(FreshetError::WriteConflict(id)) if id == "123"));
    }

    #[test]
    fn test_replace_missing_channel() {
        let store = SqliteStore::in_memory().unwrap();
        let channel = sample_channel("ghost");

        let result = store.replace_channel(&channel);
        assert!(matches!(result, Err(FreshetError::ChannelNotFound(_))));
    }

    #[test]
    fn test_on_disk_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("freshet.db");

        {
            let store = SqliteStore::new(&path).unwrap();
            store.insert_channel(&sample_channel("123")).unwrap();
        }

        let store = SqliteStore::new(&path).unwrap();
        assert!(store.channel_exists("123").unwrap());
    }
}
