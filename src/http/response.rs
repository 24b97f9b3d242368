//! Incoming response description.
//!
//! # Responsibilities
//! - Carry status, headers and the buffered body back through the pipeline
//! - Remember which request produced it (method, resolved URL, request ID)
//! - Decode JSON bodies
//!
//! # Design Decisions
//! - Bodies are buffered; log pages are small and interceptors may need to
//!   read them more than once
//! - Interceptors may fabricate responses (e.g., to recover from an error)

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::http::error::HttpError;

/// Metadata about the request that produced a response.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub method: Method,
    /// Fully resolved URL, including the query.
    pub url: String,
    pub request_id: Option<String>,
    /// When the request was handed to the transport.
    pub sent_at: Instant,
}

/// A response travelling through the interceptor pipeline.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    /// Set by the client after dispatch; `None` for fabricated responses.
    pub request: Option<RequestMeta>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            request: None,
        }
    }

    /// A `200 OK` response with `value` as its JSON body.
    pub fn from_json<T: Serialize + ?Sized>(value: &T) -> Result<Self, HttpError> {
        let mut response = Self::new(StatusCode::OK, serde_json::to_vec(value)?);
        response
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(response)
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Time since the request was dispatched.
    pub fn elapsed(&self) -> Option<Duration> {
        self.request.as_ref().map(|meta| meta.sent_at.elapsed())
    }
}
