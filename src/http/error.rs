//! Errors surfaced by the HTTP pipeline.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::http::response::ApiResponse;

/// Boxed error carried by transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which side of the pipeline an interceptor rejected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Request,
    Response,
}

/// A rejected outcome of [`HttpClient::send`](crate::http::HttpClient::send).
///
/// Request errors: invalid request, transport failure, timeout, request-stage
/// rejection. Response errors: failing status, response-stage rejection,
/// body decode failure.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request could not be built (bad header, unserializable body, bad URL).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The transport failed before a response arrived.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The transport call exceeded the client deadline and was aborted.
    #[error("request to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    /// The server answered with a non-2xx status.
    #[error("server responded with status {}", .0.status)]
    Status(Box<ApiResponse>),

    /// An interceptor rejected the value explicitly.
    #[error("{stage:?} interceptor rejected: {reason}")]
    Rejected { stage: Stage, reason: String },

    /// The response body did not decode as expected.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl HttpError {
    /// Rejection raised by an interceptor.
    pub fn rejected(stage: Stage, reason: impl Into<String>) -> Self {
        HttpError::Rejected {
            stage,
            reason: reason.into(),
        }
    }

    /// True for failures that happened before a response was received.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            HttpError::InvalidRequest(_)
                | HttpError::Transport { .. }
                | HttpError::Timeout { .. }
                | HttpError::Rejected {
                    stage: Stage::Request,
                    ..
                }
        )
    }

    /// True for failures concerning a received response.
    pub fn is_response_error(&self) -> bool {
        !self.is_request_error()
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::Timeout { .. })
    }

    /// Status of the failing response, if there was one.
    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(|r| r.status)
    }

    /// The failing response, if there was one.
    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            HttpError::Status(response) => Some(response),
            _ => None,
        }
    }
}
