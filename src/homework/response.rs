//! Validation of status API replies.

use serde_json::Value;
use thiserror::Error;

use super::json_type_name;

/// Key holding the list of submissions.
pub const HOMEWORKS_KEY: &str = "homeworks";

/// Key holding the server timestamp for the next poll.
pub const CURRENT_DATE_KEY: &str = "current_date";

/// Errors that can occur while validating an API reply.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    #[error("API response must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("API response is missing the `{0}` key")]
    MissingKey(&'static str),

    #[error("API response field `{key}` must be a list, got {found}")]
    NotAList { key: &'static str, found: &'static str },

    #[error("API response field `{key}` must be an integer timestamp, got {found}")]
    NotAnInteger { key: &'static str, found: &'static str },
}

/// Returns the submissions list from a decoded reply.
///
/// Elements are not inspected here.
pub fn check_response(response: &Value) -> Result<&[Value], ResponseError> {
    let object = response
        .as_object()
        .ok_or_else(|| ResponseError::NotAnObject(json_type_name(response)))?;

    match object.get(HOMEWORKS_KEY) {
        None => Err(ResponseError::MissingKey(HOMEWORKS_KEY)),
        Some(Value::Array(homeworks)) => Ok(homeworks),
        Some(other) => Err(ResponseError::NotAList {
            key: HOMEWORKS_KEY,
            found: json_type_name(other),
        }),
    }
}

/// Returns the cursor for the next poll, if the reply carries one.
pub fn current_date(response: &Value) -> Result<Option<i64>, ResponseError> {
    match response.get(CURRENT_DATE_KEY) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_i64().map(Some).ok_or(ResponseError::NotAnInteger {
            key: CURRENT_DATE_KEY,
            found: json_type_name(value),
        }),
    }
}

/// A validated status API reply.
#[derive(Debug, Clone, PartialEq)]
pub struct PollResponse {
    /// Raw submission records, most recent first.
    pub homeworks: Vec<Value>,

    /// Server timestamp to use as `from_date` next time.
    pub current_date: Option<i64>,
}

impl PollResponse {
    /// Validates a decoded reply.
    pub fn from_value(response: &Value) -> Result<Self, ResponseError> {
        let homeworks = check_response(response)?.to_vec();
        let current_date = current_date(response)?;

        Ok(Self {
            homeworks,
            current_date,
        })
    }

    /// The most recent submission, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&Value> {
        self.homeworks.first()
    }

    /// Returns true if nothing changed since the last poll.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.homeworks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_check_response_returns_list() {
        let body = json!({
            "homeworks": [{"homework_name": "hw", "status": "approved"}],
            "current_date": 1_700_000_000
        });
        let homeworks = check_response(&body).unwrap();
        assert_eq!(homeworks.len(), 1);
        assert_eq!(homeworks[0]["status"], "approved");
    }

    #[test]
    fn test_check_response_missing_key() {
        for body in [json!({}), json!({"current_date": 1}), json!({"homework": []})] {
            assert_eq!(
                check_response(&body),
                Err(ResponseError::MissingKey("homeworks"))
            );
        }
    }

    #[test]
    fn test_check_response_not_a_list() {
        let cases = [
            (json!({"homeworks": {"homework_name": "hw"}}), "object"),
            (json!({"homeworks": "hw"}), "string"),
            (json!({"homeworks": 3}), "number"),
            (json!({"homeworks": null}), "null"),
        ];
        for (body, found) in cases {
            assert_eq!(
                check_response(&body),
                Err(ResponseError::NotAList {
                    key: "homeworks",
                    found
                })
            );
        }
    }

    #[test]
    fn test_check_response_not_an_object() {
        assert_eq!(
            check_response(&json!([])),
            Err(ResponseError::NotAnObject("array"))
        );
    }

    #[test]
    fn test_current_date() {
        assert_eq!(current_date(&json!({"current_date": 42})), Ok(Some(42)));
        assert_eq!(current_date(&json!({"homeworks": []})), Ok(None));
        assert_eq!(
            current_date(&json!({"current_date": "yesterday"})),
            Err(ResponseError::NotAnInteger {
                key: "current_date",
                found: "string"
            })
        );
    }

    #[test]
    fn test_poll_response_from_value() {
        let body = json!({
            "homeworks": [
                {"homework_name": "second", "status": "reviewing"},
                {"homework_name": "first", "status": "approved"}
            ],
            "current_date": 1_700_000_600
        });
        let response = PollResponse::from_value(&body).unwrap();
        assert_eq!(response.current_date, Some(1_700_000_600));
        assert_eq!(response.latest().unwrap()["homework_name"], "second");

        let empty = PollResponse::from_value(&json!({"homeworks": []})).unwrap();
        assert!(empty.is_empty());
        assert!(empty.latest().is_none());
    }
}
