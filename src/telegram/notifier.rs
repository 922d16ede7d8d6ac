//! Telegram delivery of notification messages.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Recipient};
use thiserror::Error;
use tracing::{error, info};

use crate::config::{BotSettings, Credentials};

/// Errors that can occur while delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Failed to send Telegram message: {0}")]
    Delivery(#[from] teloxide::RequestError),

    #[error("Invalid Telegram API URL: {0}")]
    InvalidApiUrl(String),
}

/// Destination for user-facing messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a text message to the configured chat.
    async fn send_message(&self, text: &str) -> Result<(), NotifyError>;
}

/// Bot API notifier bound to a single chat.
pub struct TelegramNotifier {
    bot: Bot,
    recipient: Recipient,
}

impl TelegramNotifier {
    /// Creates a notifier for the given bot token and chat.
    ///
    /// `chat_id` is either a numeric chat ID or a `@channel` username.
    #[must_use]
    pub fn new(token: impl Into<String>, chat_id: &str) -> Self {
        Self {
            bot: Bot::new(token),
            recipient: parse_recipient(chat_id),
        }
    }

    /// Points the bot at an alternative Bot API server.
    #[must_use]
    pub fn with_api_url(mut self, url: reqwest::Url) -> Self {
        self.bot = self.bot.set_api_url(url);
        self
    }

    /// Creates a notifier from the loaded configuration.
    pub fn from_config(settings: &BotSettings, credentials: &Credentials) -> Result<Self, NotifyError> {
        let notifier = Self::new(
            credentials.telegram_token.clone(),
            &credentials.telegram_chat_id,
        );

        match &settings.telegram_api_url {
            Some(url) => {
                let url = reqwest::Url::parse(url)
                    .map_err(|e| NotifyError::InvalidApiUrl(format!("{url}: {e}")))?;
                Ok(notifier.with_api_url(url))
            }
            None => Ok(notifier),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
        match self.bot.send_message(self.recipient.clone(), text).await {
            Ok(_message) => {
                info!("Message sent to {:?}", self.recipient);
                Ok(())
            }
            Err(e) => {
                error!("Failed to send message to {:?}: {}", self.recipient, e);
                Err(e.into())
            }
        }
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("recipient", &self.recipient)
            .finish_non_exhaustive()
    }
}

/// Parses a chat identifier into a Bot API recipient.
fn parse_recipient(chat_id: &str) -> Recipient {
    let chat_id = chat_id.trim();
    chat_id.parse::<i64>().map_or_else(
        |_| Recipient::ChannelUsername(chat_id.to_owned()),
        |id| Recipient::Id(ChatId(id)),
    )
}
