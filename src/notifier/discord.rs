use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::app::{FreshetError, Result};
use crate::notifier::Notifier;

const API_BASE: &str = "https://discord.com/api/v10";

pub struct DiscordNotifier {
    client: Client,
    bot_token: Option<String>,
}

impl DiscordNotifier {
    /// A missing token only fails at send time, so read-only commands work
    /// without one.
    pub fn new(bot_token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, bot_token }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(&self, channel_id: &str, content: &str) -> Result<()> {
        let token = self
            .bot_token
            .as_deref()
            .ok_or_else(|| FreshetError::Config("Discord bot token is not configured".into()))?;

        let url = format!("{}/channels/{}/messages", API_BASE, channel_id);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", token))
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await?;

        response.error_for_status()?;
        Ok(())
    }
}
