//! Configuration module for the homework status bot.
//!
//! Handles loading and validation of credentials and runtime settings.
//! Values are read once at startup and passed into each component.

mod settings;

pub use settings::{
    BotSettings, ConfigError, Credentials, DEFAULT_ENDPOINT, PRACTICUM_TOKEN_VAR,
    TELEGRAM_CHAT_ID_VAR, TELEGRAM_TOKEN_VAR, check_tokens, mask_secret,
};
