//! Homework review statuses and their translation into messages.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

/// Key holding the homework name in a submission record.
pub const NAME_KEY: &str = "homework_name";

/// Key holding the review status in a submission record.
pub const STATUS_KEY: &str = "status";

/// Errors that can occur while translating a submission record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("Submission record is missing the `{0}` field")]
    MissingField(&'static str),

    #[error("Submission field `{field}` must be a string, got {found}")]
    WrongType { field: &'static str, found: &'static str },

    #[error("Submission has an empty `homework_name`")]
    EmptyName,

    #[error("Unknown homework status: {0}")]
    UnknownStatus(String),
}

/// Review status reported by the homework API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    /// The reviewer has taken the work.
    Reviewing,
    /// The work passed review.
    Approved,
    /// The reviewer left remarks.
    Rejected,
}

impl HomeworkStatus {
    /// All known statuses.
    pub const ALL: [Self; 3] = [Self::Reviewing, Self::Approved, Self::Rejected];

    /// Status code as sent by the API.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Reviewing => "reviewing",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Human-readable verdict for this status.
    #[must_use]
    pub const fn verdict(self) -> &'static str {
        match self {
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == s)
            .ok_or_else(|| StatusError::UnknownStatus(s.to_owned()))
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One homework submission at poll time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Homework {
    /// Name of the submitted work.
    pub name: String,

    /// Current review status.
    pub status: HomeworkStatus,
}

impl Homework {
    /// Extracts a submission from a raw record.
    pub fn from_value(record: &Value) -> Result<Self, StatusError> {
        let name = string_field(record, NAME_KEY)?;
        let status = string_field(record, STATUS_KEY)?;

        if name.trim().is_empty() {
            return Err(StatusError::EmptyName);
        }

        Ok(Self {
            name: name.to_owned(),
            status: status.parse()?,
        })
    }

    /// Notification text announcing this submission's status.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Изменился статус проверки работы \"{}\". {}",
            self.name,
            self.status.verdict()
        )
    }
}

/// Translates a raw submission record into a notification message.
pub fn parse_status(record: &Value) -> Result<String, StatusError> {
    Homework::from_value(record).map(|homework| homework.message())
}

fn string_field<'a>(record: &'a Value, field: &'static str) -> Result<&'a str, StatusError> {
    match record.get(field) {
        None | Some(Value::Null) => Err(StatusError::MissingField(field)),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(StatusError::WrongType {
            field,
            found: super::json_type_name(other),
        }),
    }
}
