//! Errors raised inside one poll iteration.

use thiserror::Error;

use crate::api::PollError;
use crate::homework::{ResponseError, StatusError};
use crate::telegram::NotifyError;

/// Any recoverable failure of a poll iteration.
///
/// The scheduler logs it, reports it to the chat and retries on the next tick.
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Poll(#[from] PollError),

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}
