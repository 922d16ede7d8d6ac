//! Poll cursor carried between iterations.

use chrono::{DateTime, Utc};

/// Server-provided timestamp bounding the next poll to "since last check".
///
/// Lives in memory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    from_date: i64,
}

impl Cursor {
    /// Creates a cursor starting at the given unix timestamp.
    #[must_use]
    pub const fn new(from_date: i64) -> Self {
        Self { from_date }
    }

    /// Creates a cursor starting at the current time.
    #[must_use]
    pub fn now() -> Self {
        Self::new(Utc::now().timestamp())
    }

    /// Unix timestamp to send as `from_date`.
    #[must_use]
    pub const fn from_date(&self) -> i64 {
        self.from_date
    }

    /// Moves the cursor to the server timestamp, if the reply carried one.
    ///
    /// Returns true if the cursor changed.
    pub fn advance(&mut self, current_date: Option<i64>) -> bool {
        match current_date {
            Some(date) if date != self.from_date => {
                self.from_date = date;
                true
            }
            _ => false,
        }
    }

    /// Cursor as a UTC date time, for logging.
    #[must_use]
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.from_date, 0)
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_datetime() {
            Some(at) => write!(f, "{} ({})", self.from_date, at.to_rfc3339()),
            None => write!(f, "{}", self.from_date),
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::now()
    }
}
