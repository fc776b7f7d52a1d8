//! Configuration for the freshet binary.
//!
//! Settings are read from `~/.config/freshet/config.toml` at startup. If
//! the file doesn't exist, a default configuration with comments is
//! created. `DISCORD_BOT_TOKEN` and `DEFAULT_CHANNEL_IDS` environment
//! variables override the file, which keeps secrets out of it in
//! deployments.

pub mod catalog;

pub use catalog::{default_catalog, CatalogEntry};

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SQLite database path. Defaults to `<data dir>/freshet/freshet.db`.
    pub db_path: Option<PathBuf>,
    /// Discord bot token used for message delivery.
    pub bot_token: Option<String>,
    /// Channel ids seeded with the default catalog on first sight.
    pub channels: Vec<String>,
    pub delivery: DeliveryConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: None,
            bot_token: None,
            channels: Vec::new(),
            delivery: DeliveryConfig::default(),
        }
    }
}

/// Tuning knobs for fetching and delivery pacing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Channels processed simultaneously.
    pub max_in_flight: usize,
    /// Per-request timeout for feed fetches.
    pub fetch_timeout_secs: u64,
    /// Linear backoff unit between fetch retries.
    pub retry_backoff_ms: u64,
    /// Pause between successive sends to the same channel.
    pub send_pacing_ms: u64,
    /// Pause per feed while seeding a new channel.
    pub seed_pacing_ms: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 3,
            fetch_timeout_secs: 30,
            retry_backoff_ms: 2000,
            send_pacing_ms: 500,
            seed_pacing_ms: 100,
        }
    }
}

impl Settings {
    /// Load configuration from the given path, or the default path.
    ///
    /// Creates a commented default file when none exists. Missing fields
    /// use default values; environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()?,
        };

        let mut settings = if config_path.exists() {
            let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
                path: config_path.clone(),
                source: e,
            })?;

            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: config_path,
                source: e,
            })?
        } else {
            Self::create_default_config(&config_path)?;
            Self::default()
        };

        settings.apply_env_overrides();
        Ok(settings)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("DISCORD_BOT_TOKEN") {
            if !token.is_empty() {
                self.bot_token = Some(token);
            }
        }
        if let Ok(ids) = std::env::var("DEFAULT_CHANNEL_IDS") {
            self.channels = parse_channel_list(&ids);
        }
    }

    /// Get the default config file path: `~/.config/freshet/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("freshet").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> String {
        r##"# Freshet configuration
#
# The DISCORD_BOT_TOKEN and DEFAULT_CHANNEL_IDS environment variables
# override the values in this file.

# SQLite database location (defaults to the platform data directory).
# db_path = "/var/lib/freshet/freshet.db"

# Discord bot token used to post messages.
# bot_token = ""

# Channel ids seeded with the default feed catalog on first run.
# channels = ["123456789012345678"]

[delivery]
# Channels processed simultaneously.
max_in_flight = 3

# Per-request timeout for feed fetches, in seconds.
fetch_timeout_secs = 30

# Linear backoff unit between fetch retries, in milliseconds.
retry_backoff_ms = 2000

# Pause between successive sends to the same channel, in milliseconds.
send_pacing_ms = 500

# Pause per feed while seeding a new channel, in milliseconds.
seed_pacing_ms = 100
"##
        .to_string()
    }
}

fn parse_channel_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Settings::default_config_content();
        let settings: Settings =
            toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(settings.delivery.max_in_flight, 3);
        assert_eq!(settings.delivery.fetch_timeout_secs, 30);
        assert!(settings.bot_token.is_none());
    }

    #[test]
    fn test_partial_config() {
        let content = r#"
channels = ["111", "222"]

[delivery]
max_in_flight = 5
"#;
        let settings: Settings = toml::from_str(content).expect("Partial config should work");

        assert_eq!(settings.channels, vec!["111", "222"]);
        assert_eq!(settings.delivery.max_in_flight, 5);
        // Defaults fill the rest.
        assert_eq!(settings.delivery.send_pacing_ms, 500);
    }

    #[test]
    fn test_empty_config() {
        let settings: Settings = toml::from_str("").expect("Empty config should work");

        assert!(settings.channels.is_empty());
        assert_eq!(settings.delivery.retry_backoff_ms, 2000);
    }

    #[test]
    fn test_parse_channel_list_trims_and_drops_empties() {
        assert_eq!(
            parse_channel_list(" 111 , ,222,"),
            vec!["111".to_string(), "222".to_string()]
        );
        assert!(parse_channel_list("").is_empty());
    }
}
