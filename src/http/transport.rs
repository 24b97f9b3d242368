//! Transport abstraction.
//!
//! # Responsibilities
//! - Carry a fully resolved request over the network
//! - Return the raw response, whatever its status
//!
//! # Design Decisions
//! - Status validation is the client's job, not the transport's
//! - The pipeline only sees this trait; reqwest is one implementation

use std::future::Future;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};

use crate::http::error::HttpError;
use crate::http::response::ApiResponse;

/// A request after interception and URL resolution.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// Sends prepared requests.
pub trait Transport: Send + Sync {
    fn dispatch(&self, request: PreparedRequest) -> BoxFuture<'_, Result<ApiResponse, HttpError>>;
}

/// Transport backed by an async closure.
pub struct FnTransport<F>(F);

/// Wrap an async closure as a transport.
pub fn transport_fn<F, Fut>(f: F) -> FnTransport<F>
where
    F: Fn(PreparedRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ApiResponse, HttpError>> + Send + 'static,
{
    FnTransport(f)
}

impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn(PreparedRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ApiResponse, HttpError>> + Send + 'static,
{
    fn dispatch(&self, request: PreparedRequest) -> BoxFuture<'_, Result<ApiResponse, HttpError>> {
        (self.0)(request).boxed()
    }
}

/// HTTP transport using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with default settings.
    pub fn new() -> Result<Self, HttpError> {
        let client = Client::builder()
            .user_agent(concat!("logview-client/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Create a transport around an existing reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn execute(&self, request: PreparedRequest) -> Result<ApiResponse, HttpError> {
        let PreparedRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(method, url.as_str()).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| map_error(&url, e))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| map_error(&url, e))?;

        Ok(ApiResponse {
            status,
            headers,
            body: body.to_vec(),
            request: None,
        })
    }
}

impl Transport for ReqwestTransport {
    fn dispatch(&self, request: PreparedRequest) -> BoxFuture<'_, Result<ApiResponse, HttpError>> {
        self.execute(request).boxed()
    }
}

fn map_error(url: &str, error: reqwest::Error) -> HttpError {
    if error.is_builder() {
        return HttpError::InvalidRequest(format!("cannot send to `{}`: {}", url, error));
    }
    HttpError::Transport {
        url: url.to_string(),
        source: Box::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[tokio::test]
    async fn test_fn_transport() {
        let transport = transport_fn(|request: PreparedRequest| async move {
            Ok(ApiResponse::new(StatusCode::OK, request.url.into_bytes()))
        });

        let response = transport
            .dispatch(PreparedRequest {
                method: Method::GET,
                url: "http://example.com/x".into(),
                headers: HeaderMap::new(),
                body: None,
            })
            .await
            .unwrap();
        assert_eq!(response.text(), "http://example.com/x");
    }

    #[tokio::test]
    async fn test_relative_url_is_invalid_request() {
        let transport = ReqwestTransport::new().unwrap();
        let err = transport
            .dispatch(PreparedRequest {
                method: Method::GET,
                url: "/api/logs".into(),
                headers: HeaderMap::new(),
                body: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let transport = ReqwestTransport::new().unwrap();
        let err = transport
            .dispatch(PreparedRequest {
                method: Method::GET,
                url: "http://127.0.0.1:9/".into(),
                headers: HeaderMap::new(),
                body: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Transport { .. }));
    }
}
