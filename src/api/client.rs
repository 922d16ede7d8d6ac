//! HTTP client for the homework status API.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::{BotSettings, Credentials, mask_secret};

/// Query parameter carrying the poll cursor.
pub const FROM_DATE_PARAM: &str = "from_date";

/// Description of an outgoing request, attached to errors for diagnostics.
///
/// The OAuth token is masked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    /// Endpoint that was queried.
    pub endpoint: String,

    /// Masked authorization header value.
    pub authorization: String,

    /// Value of the `from_date` parameter.
    pub from_date: i64,
}

impl fmt::Display for RequestInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "endpoint: {}, authorization: {}, params: {}={}",
            self.endpoint, self.authorization, FROM_DATE_PARAM, self.from_date
        )
    }
}

/// Errors that can occur while polling the status API.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("Status API is unreachable ({request}): {source}")]
    Connectivity {
        request: RequestInfo,
        #[source]
        source: reqwest::Error,
    },

    #[error("Status API returned HTTP {status} ({request})")]
    ServerStatus { request: RequestInfo, status: u16 },

    #[error("Status API returned a body that is not valid JSON ({request}): {source}")]
    Decode {
        request: RequestInfo,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Source of homework status replies.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetches submissions changed since `from_date` (unix seconds, 0 means now).
    async fn get_api_answer(&self, from_date: i64) -> Result<Value, PollError>;
}

/// Status API client.
pub struct HomeworkClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HomeworkClient {
    /// Creates a client for the given endpoint and OAuth token.
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PollError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }

    /// Creates a client from the loaded configuration.
    pub fn from_config(settings: &BotSettings, credentials: &Credentials) -> Result<Self, PollError> {
        Self::new(
            settings.endpoint.clone(),
            credentials.practicum_token.clone(),
            settings.request_timeout(),
        )
    }

    fn request_info(&self, from_date: i64) -> RequestInfo {
        RequestInfo {
            endpoint: self.endpoint.clone(),
            authorization: format!("OAuth {}", mask_secret(&self.token)),
            from_date,
        }
    }
}

#[async_trait]
impl StatusSource for HomeworkClient {
    async fn get_api_answer(&self, from_date: i64) -> Result<Value, PollError> {
        let from_date = if from_date == 0 {
            Utc::now().timestamp()
        } else {
            from_date
        };
        let request = self.request_info(from_date);

        debug!("Polling status API: {}", request);

        let response = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[(FROM_DATE_PARAM, from_date)])
            .send()
            .await
            .map_err(|source| PollError::Connectivity {
                request: request.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(PollError::ServerStatus {
                request,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| PollError::Connectivity {
                request: request.clone(),
                source,
            })?;

        serde_json::from_str(&body).map_err(|source| PollError::Decode { request, source })
    }
}

impl fmt::Debug for HomeworkClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HomeworkClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
