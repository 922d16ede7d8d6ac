//! Homework API data model.
//!
//! Validates decoded replies from the status API and translates
//! submission records into notification messages.

mod response;
mod status;

pub use response::{
    CURRENT_DATE_KEY, HOMEWORKS_KEY, PollResponse, ResponseError, check_response, current_date,
};
pub use status::{Homework, HomeworkStatus, NAME_KEY, STATUS_KEY, StatusError, parse_status};

use serde_json::Value;

/// Name of a JSON value's type, for error messages.
pub(crate) const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
