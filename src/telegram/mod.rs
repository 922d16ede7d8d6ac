//! Telegram delivery module.
//!
//! Sends status notifications and error reports through the Bot API.

mod notifier;

pub use notifier::{Notifier, NotifyError, TelegramNotifier};
