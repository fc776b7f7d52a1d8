pub mod channel;
pub mod item;

pub use channel::{Channel, FeedSubscription};
pub use item::RemoteItem;
