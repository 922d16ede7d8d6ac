//! Credentials and bot settings.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable holding the homework API OAuth token.
pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";

/// Environment variable holding the Telegram bot token.
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";

/// Environment variable holding the chat that receives notifications.
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Secrets required to run the bot.
#[derive(Clone, Default)]
pub struct Credentials {
    /// OAuth token for the homework status API.
    pub practicum_token: String,

    /// Telegram bot token.
    pub telegram_token: String,

    /// Chat ID (or `@channel` username) that receives notifications.
    pub telegram_chat_id: String,
}

impl Credentials {
    /// Creates credentials from explicit values.
    #[must_use]
    pub fn new(
        practicum_token: impl Into<String>,
        telegram_token: impl Into<String>,
        telegram_chat_id: impl Into<String>,
    ) -> Self {
        Self {
            practicum_token: practicum_token.into(),
            telegram_token: telegram_token.into(),
            telegram_chat_id: telegram_chat_id.into(),
        }
    }

    /// Reads credentials from the process environment.
    ///
    /// Missing variables become empty strings; use [`check_tokens`] to find out
    /// whether the result is usable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads credentials through an arbitrary lookup function.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_owned()).unwrap_or_default();

        Self {
            practicum_token: read(PRACTICUM_TOKEN_VAR),
            telegram_token: read(TELEGRAM_TOKEN_VAR),
            telegram_chat_id: read(TELEGRAM_CHAT_ID_VAR),
        }
    }

    /// Names of the variables that are missing or empty.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (PRACTICUM_TOKEN_VAR, &self.practicum_token),
            (TELEGRAM_TOKEN_VAR, &self.telegram_token),
            (TELEGRAM_CHAT_ID_VAR, &self.telegram_chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Returns the credentials, or an error naming every missing variable.
    pub fn require(self) -> Result<Self, ConfigError> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::MissingCredentials(missing.join(", ")))
        }
    }
}

/// Returns `true` iff all three credentials are present and non-empty.
#[must_use]
pub fn check_tokens(credentials: &Credentials) -> bool {
    credentials.missing().is_empty()
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &mask_secret(&self.practicum_token))
            .field("telegram_token", &mask_secret(&self.telegram_token))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

/// Masks a secret for logging (shows last 4 characters).
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count > 8 {
        let tail: String = secret.chars().skip(count - 4).collect();
        format!("***{tail}")
    } else {
        "****".to_owned()
    }
}

/// Bot-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSettings {
    /// Homework status API endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Pause between two polls in seconds.
    #[serde(default = "default_retry_secs")]
    pub retry_secs: u64,

    /// Timeout for a single request to the status API in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Alternative Telegram Bot API base URL.
    #[serde(default)]
    pub telegram_api_url: Option<String>,

    /// Optional log file that receives a copy of the console output.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Default homework status endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_owned()
}

fn default_retry_secs() -> u64 {
    600 // 10 minutes between polls
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            retry_secs: default_retry_secs(),
            request_timeout_secs: default_request_timeout(),
            telegram_api_url: None,
            log_file: None,
        }
    }
}

impl BotSettings {
    /// Creates bot settings from environment variables with defaults.
    #[must_use]
    pub fn from_env_with_defaults() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Creates bot settings through an arbitrary lookup function.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            endpoint: non_empty("PRACTICUM_ENDPOINT").unwrap_or_else(default_endpoint),
            retry_secs: parse_secs("RETRY_TIME", non_empty("RETRY_TIME"), default_retry_secs()),
            request_timeout_secs: parse_secs(
                "REQUEST_TIMEOUT",
                non_empty("REQUEST_TIMEOUT"),
                default_request_timeout(),
            ),
            telegram_api_url: non_empty("TELEGRAM_API_URL"),
            log_file: non_empty("LOG_FILE").map(PathBuf::from),
        }
    }

    /// Pause between two polls.
    #[must_use]
    pub const fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_secs)
    }

    /// Timeout for a single status API request.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Checks that the settings can be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "RETRY_TIME",
                reason: "must be greater than zero".to_owned(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "REQUEST_TIMEOUT",
                reason: "must be greater than zero".to_owned(),
            });
        }
        reqwest::Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidSetting {
            name: "PRACTICUM_ENDPOINT",
            reason: e.to_string(),
        })?;
        if let Some(url) = &self.telegram_api_url {
            reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidSetting {
                name: "TELEGRAM_API_URL",
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

/// Parses a number of seconds, falling back to `default` on a bad value.
fn parse_secs(name: &str, value: Option<String>, default: u64) -> u64 {
    let Some(value) = value else {
        return default;
    };
    value.trim().parse().unwrap_or_else(|_| {
        warn!("Ignoring invalid {}={:?}, using {} seconds", name, value, default);
        default
    })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {0}")]
    MissingCredentials(String),

    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}
