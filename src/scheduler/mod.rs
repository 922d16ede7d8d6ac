//! Polling scheduler module.
//!
//! Drives the poll → validate → translate → notify chain on a fixed
//! interval and keeps the cursor between iterations.

mod runner;
mod state;

pub use runner::{DEFAULT_RETRY_INTERVAL, FAILURE_PREFIX, HomeworkPoller, TickOutcome};
pub use state::Cursor;
