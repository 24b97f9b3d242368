//! Outgoing request description.
//!
//! # Responsibilities
//! - Describe a call relative to the client base URL (method, path, query,
//!   headers, body)
//! - Defer builder errors until the request is sent
//!
//! # Design Decisions
//! - Fields are public so interceptors can rewrite any part of the request
//! - Builder errors do not panic; the request enters the pipeline rejected

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;

use crate::http::error::HttpError;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// A request travelling through the interceptor pipeline.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL, or an absolute URL.
    pub path: String,
    /// Query pairs appended to the resolved URL, in order.
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    error: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            error: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query pair.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query pair when `value` is set.
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Set a header. An invalid name or value is reported when the request is sent.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set a header in place. Same deferred error rules as [`ApiRequest::header`].
    pub fn set_header(&mut self, name: &str, value: &str) {
        let parsed = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| format!("invalid header name `{}`: {}", name, e))
            .and_then(|header| match HeaderValue::from_str(value) {
                Ok(value) => Ok((header, value)),
                Err(e) => Err(format!("invalid value for header `{}`: {}", name, e)),
            });

        match parsed {
            Ok((name, value)) => {
                self.headers.insert(name, value);
            }
            Err(reason) => self.record_error(reason),
        }
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => {
                self.headers
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                self.body = Some(bytes);
            }
            Err(e) => self.record_error(format!("failed to serialize body: {}", e)),
        }
        self
    }

    /// Set a raw request body.
    pub fn body(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.body = Some(bytes.into());
        self
    }

    /// Header value as a string, if present and valid UTF-8.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn request_id(&self) -> Option<&str> {
        self.header_value(X_REQUEST_ID)
    }

    /// Surface the first builder error, if any.
    pub fn validate(mut self) -> Result<Self, HttpError> {
        match self.error.take() {
            Some(reason) => Err(HttpError::InvalidRequest(reason)),
            None => Ok(self),
        }
    }

    fn record_error(&mut self, reason: String) {
        if self.error.is_none() {
            self.error = Some(reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let request = ApiRequest::get("/api/logs")
            .query("limit", 50)
            .query_opt("ip", None::<String>)
            .query_opt("status", Some(404))
            .header("Accept", "application/json");

        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.query,
            vec![
                ("limit".to_string(), "50".to_string()),
                ("status".to_string(), "404".to_string())
            ]
        );
        assert_eq!(request.header_value("accept"), Some("application/json"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_invalid_header_is_deferred() {
        let request = ApiRequest::get("/").header("bad header", "x").header("ok", "bad\nvalue");
        let err = request.validate().unwrap_err();
        assert!(matches!(err, HttpError::InvalidRequest(ref reason) if reason.contains("bad header")));
    }

    #[test]
    fn test_json_body() {
        let request = ApiRequest::post("/items").json(&serde_json::json!({ "name": "a" }));
        assert_eq!(request.header_value("content-type"), Some("application/json"));
        assert_eq!(request.body.as_deref(), Some(br#"{"name":"a"}"#.as_slice()));
    }
}
