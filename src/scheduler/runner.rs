//! Homework status polling loop.
//!
//! Every iteration runs the same chain:
//! 1. Poll the status API with the current cursor
//! 2. Validate the reply (`homeworks` list, optional `current_date`)
//! 3. If a submission changed → translate the most recent one and send it
//! 4. Advance the cursor to the server timestamp
//!
//! Any failure in the chain is logged, reported to the chat and retried on
//! the next iteration. The loop itself never returns.

use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::Cursor;
use crate::api::StatusSource;
use crate::error::BotError;
use crate::homework::{PollResponse, parse_status};
use crate::telegram::Notifier;

/// Default pause between two polls.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(600);

/// Prefix of the message reporting a failed iteration.
pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// Result of a successful iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A status change was sent to the chat.
    Notified(String),
    /// Nothing changed since the previous poll.
    NoChange,
}

/// Polls the status API and forwards changes to the chat.
pub struct HomeworkPoller<S, N> {
    /// Status API client.
    source: S,

    /// Chat notifier.
    notifier: N,

    /// Cursor for the next poll.
    cursor: Cursor,

    /// Pause between iterations.
    retry_interval: Duration,
}

impl<S, N> HomeworkPoller<S, N>
where
    S: StatusSource,
    N: Notifier,
{
    /// Creates a poller starting from the current time.
    #[must_use]
    pub fn new(source: S, notifier: N) -> Self {
        Self {
            source,
            notifier,
            cursor: Cursor::now(),
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }

    /// Sets the pause between iterations.
    #[must_use]
    pub const fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Sets the starting cursor.
    #[must_use]
    pub const fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = cursor;
        self
    }

    /// Runs the polling loop forever.
    pub async fn run(&mut self) {
        info!(
            "Homework poller started (interval: {:?}, from: {})",
            self.retry_interval, self.cursor
        );

        loop {
            // Failures are already logged and reported.
            let _ = self.run_once().await;
            tokio::time::sleep(self.retry_interval).await;
        }
    }

    /// Runs one iteration and reports a failure to the chat.
    pub async fn run_once(&mut self) -> Result<TickOutcome, BotError> {
        let result = self.tick().await;
        if let Err(e) = &result {
            self.report_failure(e).await;
        }
        result
    }

    /// Single poll → validate → notify → advance chain.
    pub async fn tick(&mut self) -> Result<TickOutcome, BotError> {
        let body = self.source.get_api_answer(self.cursor.from_date()).await?;
        let response = PollResponse::from_value(&body)?;

        let outcome = match response.latest() {
            Some(record) => {
                let message = parse_status(record)?;
                self.notifier.send_message(&message).await?;
                TickOutcome::Notified(message)
            }
            None => {
                info!("No status change since {}", self.cursor);
                TickOutcome::NoChange
            }
        };

        if self.cursor.advance(response.current_date) {
            debug!("Cursor advanced to {}", self.cursor);
        }

        Ok(outcome)
    }

    async fn report_failure(&self, err: &BotError) {
        error!("{}: {}", FAILURE_PREFIX, err);

        let message = format!("{FAILURE_PREFIX}: {err}");
        if let Err(e) = self.notifier.send_message(&message).await {
            warn!("Could not report failure to the chat: {}", e);
        }
    }

    /// Cursor for the next poll.
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Pause between iterations.
    #[must_use]
    pub const fn retry_interval(&self) -> Duration {
        self.retry_interval
    }
}

impl<S, N> std::fmt::Debug for HomeworkPoller<S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomeworkPoller")
            .field("cursor", &self.cursor)
            .field("retry_interval", &self.retry_interval)
            .finish_non_exhaustive()
    }
}
