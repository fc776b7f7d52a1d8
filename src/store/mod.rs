pub mod sqlite;

use crate::app::Result;
use crate::domain::Channel;

pub use sqlite::SqliteStore;

pub trait Store {
    fn insert_channel(&self, channel: &Channel) -> Result<()>;
    fn get_channel(&self, id: &str) -> Result<Option<Channel>>;
    fn all_channels(&self) -> Result<Vec<Channel>>;
    fn channel_exists(&self, id: &str) -> Result<bool>;

    /// Full-document replace guarded by the channel's version: the row is
    /// only updated when the stored version still matches, and the stored
    /// version is advanced by one. Returns the new version, or
    /// [`FreshetError::WriteConflict`](crate::app::FreshetError::WriteConflict)
    /// when a concurrent writer got there first.
    fn replace_channel(&self, channel: &Channel) -> Result<i64>;
}
