//! Homework status API client module.

mod client;

pub use client::{FROM_DATE_PARAM, HomeworkClient, PollError, RequestInfo, StatusSource};
