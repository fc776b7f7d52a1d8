pub mod discord;

use async_trait::async_trait;

use crate::app::Result;

pub use discord::DiscordNotifier;

#[async_trait]
pub trait Notifier {
    /// Deliver one rendered message to one channel. Failures are
    /// per-message; callers log and move on.
    async fn notify(&self, channel_id: &str, content: &str) -> Result<()>;
}
