//! HTTP client with request/response interception.
//!
//! # Responsibilities
//! - Resolve relative paths against the configured base URL
//! - Run the request chain, dispatch, run the response chain
//! - Turn non-2xx statuses into rejections
//! - Abort transport calls that exceed the configured deadline
//!
//! # Pipeline
//! ```text
//! send(request)
//!     → request chain (in registration order, first rejection skips the rest)
//!     → transport dispatch (skipped if the request chain rejected)
//!     → response chain (in registration order, sees value or rejection)
//!     → caller
//! ```
//!
//! # Design Decisions
//! - Configuration and registration take `&mut self`; `send` takes `&self`.
//!   Share the finished client through `Arc` once startup is complete
//! - Without a base URL, relative paths are passed to the transport unchanged
//! - The pipeline does not log; interceptors do

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::http::error::HttpError;
use crate::http::interceptor::{Interceptor, InterceptorChain, InterceptorHandle};
use crate::http::request::ApiRequest;
use crate::http::response::{ApiResponse, RequestMeta};
use crate::http::transport::{PreparedRequest, Transport};

/// Client owning its base URL, deadline and interceptor chains.
pub struct HttpClient {
    base_url: Option<String>,
    timeout: Option<Duration>,
    transport: Arc<dyn Transport>,
    request_chain: InterceptorChain<ApiRequest>,
    response_chain: InterceptorChain<ApiResponse>,
}

impl HttpClient {
    /// Create a client with no base URL, no deadline and empty chains.
    pub fn new<T: Transport + 'static>(transport: T) -> Self {
        Self {
            base_url: None,
            timeout: None,
            transport: Arc::new(transport),
            request_chain: InterceptorChain::new(),
            response_chain: InterceptorChain::new(),
        }
    }

    /// Create a client from the `[api]` configuration section.
    pub fn from_config<T: Transport + 'static>(config: &ApiConfig, transport: T) -> Self {
        let mut client = Self::new(transport);
        if let Some(base_url) = &config.base_url {
            client.configure(base_url.as_str());
        }
        client.set_timeout(config.timeout_ms.map(Duration::from_millis));
        client
    }

    /// Set the base URL used for relative paths.
    pub fn configure(&mut self, base_url: impl Into<String>) {
        self.base_url = Some(base_url.into());
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Set the deadline for each transport call.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Append a request stage.
    pub fn add_request_interceptor<I>(&mut self, interceptor: I) -> InterceptorHandle
    where
        I: Interceptor<ApiRequest> + 'static,
    {
        self.request_chain.add(interceptor)
    }

    /// Append a response stage.
    pub fn add_response_interceptor<I>(&mut self, interceptor: I) -> InterceptorHandle
    where
        I: Interceptor<ApiResponse> + 'static,
    {
        self.response_chain.add(interceptor)
    }

    pub fn eject_request_interceptor(&mut self, handle: InterceptorHandle) -> bool {
        self.request_chain.eject(handle)
    }

    pub fn eject_response_interceptor(&mut self, handle: InterceptorHandle) -> bool {
        self.response_chain.eject(handle)
    }

    pub fn request_interceptors(&mut self) -> &mut InterceptorChain<ApiRequest> {
        &mut self.request_chain
    }

    pub fn response_interceptors(&mut self) -> &mut InterceptorChain<ApiResponse> {
        &mut self.response_chain
    }

    /// The URL a request would be dispatched to, including its query.
    pub fn target_url(&self, request: &ApiRequest) -> String {
        let mut url = resolve_url(self.base_url.as_deref(), &request.path);
        if !request.query.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&request.query)
                .finish();
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }
        url
    }

    /// Send a request through the pipeline.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, HttpError> {
        let outcome = match self.request_chain.fold_short_circuit(request.validate()).await {
            Ok(request) => self.dispatch(request).await,
            Err(error) => Err(error),
        };
        self.response_chain.fold(outcome).await
    }

    /// Send a request and decode the final response body as JSON.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, HttpError> {
        self.send(request).await?.json()
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse, HttpError> {
        // Interceptors may have recorded builder errors while rewriting.
        let request = request.validate()?;
        let url = self.target_url(&request);

        let meta = RequestMeta {
            method: request.method.clone(),
            url: url.clone(),
            request_id: request.request_id().map(str::to_string),
            sent_at: Instant::now(),
        };
        let prepared = PreparedRequest {
            method: request.method,
            url,
            headers: request.headers,
            body: request.body,
        };

        let call = self.transport.dispatch(prepared);
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(HttpError::Timeout {
                    url: meta.url.clone(),
                    after: limit,
                }),
            },
            None => call.await,
        };

        let mut response = result?;
        response.request = Some(meta);
        if response.status.is_success() {
            Ok(response)
        } else {
            Err(HttpError::Status(Box::new(response)))
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("request_chain", &self.request_chain)
            .field("response_chain", &self.response_chain)
            .finish()
    }
}

/// Join `path` onto `base_url`.
///
/// Absolute URLs (`scheme://...` or `//host/...`) and a missing base leave
/// `path` untouched. Otherwise trailing slashes of the base and leading
/// slashes of the path collapse into one.
pub fn resolve_url(base_url: Option<&str>, path: &str) -> String {
    match base_url {
        Some(base) if !is_absolute_url(path) => {
            if path.is_empty() {
                base.to_string()
            } else {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    path.trim_start_matches('/')
                )
            }
        }
        _ => path.to_string(),
    }
}

fn is_absolute_url(path: &str) -> bool {
    if path.starts_with("//") {
        return true;
    }
    match path.split_once("://") {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::error::Stage;
    use crate::http::interceptor::{map, recover};
    use crate::http::transport::transport_fn;
    use futures_util::future;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    /// Transport that records dispatched URLs and answers with a fixed status.
    fn recording(status: StatusCode) -> (impl Transport, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let transport = transport_fn(move |request: PreparedRequest| {
            log.lock().unwrap().push(request.url.clone());
            future::ready(Ok(ApiResponse::new(status, b"[1,2]".to_vec())))
        });
        (transport, seen)
    }

    #[test]
    fn test_resolve_url() {
        let base = Some("https://api.example.com");
        assert_eq!(resolve_url(base, "/items"), "https://api.example.com/items");
        assert_eq!(resolve_url(Some("https://api.example.com/"), "items"), "https://api.example.com/items");
        assert_eq!(resolve_url(Some("https://api.example.com/v1/"), "//cdn.example.com/x"), "//cdn.example.com/x");
        assert_eq!(resolve_url(base, "http://other.example.com/a"), "http://other.example.com/a");
        assert_eq!(resolve_url(base, ""), "https://api.example.com");
        assert_eq!(resolve_url(None, "/items"), "/items");
        assert_eq!(resolve_url(base, "/search?q=a://b"), "https://api.example.com/search?q=a://b");
    }

    #[tokio::test]
    async fn test_passthrough_to_base_url() {
        let (transport, seen) = recording(StatusCode::OK);
        let mut client = HttpClient::new(transport);
        client.configure("https://api.example.com");

        let response = client.send(ApiRequest::get("/items")).await.unwrap();
        assert_eq!(response.body, b"[1,2]");
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.request.as_ref().unwrap().url, "https://api.example.com/items");
        assert_eq!(*seen.lock().unwrap(), vec!["https://api.example.com/items".to_string()]);
    }

    #[tokio::test]
    async fn test_configure_is_idempotent() {
        let (transport, _) = recording(StatusCode::OK);
        let mut client = HttpClient::new(transport);
        let request = ApiRequest::get("/items").query("limit", 5);

        client.configure("https://api.example.com");
        let first = client.target_url(&request);
        client.configure("https://api.example.com");
        assert_eq!(client.target_url(&request), first);
        assert_eq!(first, "https://api.example.com/items?limit=5");
    }

    #[tokio::test]
    async fn test_non_success_status_rejects() {
        let (transport, _) = recording(StatusCode::INTERNAL_SERVER_ERROR);
        let mut client = HttpClient::new(transport);
        client.configure("http://localhost:8080");

        let err = client.send(ApiRequest::get("/api/logs")).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.response().unwrap().request.as_ref().unwrap().url, "http://localhost:8080/api/logs");
    }

    #[tokio::test]
    async fn test_request_rejection_skips_transport() {
        let (transport, seen) = recording(StatusCode::OK);
        let mut client = HttpClient::new(transport);
        client.add_request_interceptor(map(|_: ApiRequest| {
            future::ready(Err::<ApiRequest, _>(HttpError::rejected(Stage::Request, "offline")))
        }));

        let err = client.send(ApiRequest::get("/items")).await.unwrap_err();
        assert!(err.is_request_error());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_request_enters_chain_rejected() {
        let (transport, seen) = recording(StatusCode::OK);
        let mut client = HttpClient::new(transport);
        client.configure("http://localhost");
        client.add_request_interceptor(recover(|_err: HttpError| {
            future::ready(Ok::<_, HttpError>(ApiRequest::get("/fallback")))
        }));

        let response = client
            .send(ApiRequest::get("/items").header("bad header", "x"))
            .await
            .unwrap();
        assert!(response.is_success());
        assert_eq!(*seen.lock().unwrap(), vec!["http://localhost/fallback".to_string()]);
    }

    #[tokio::test]
    async fn test_timeout_reaches_response_chain() {
        let transport = transport_fn(|_request: PreparedRequest| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(ApiResponse::new(StatusCode::OK, Vec::new()))
        });
        let mut client = HttpClient::new(transport);
        client.configure("http://localhost");
        client.set_timeout(Some(Duration::from_millis(20)));

        let observed = Arc::new(Mutex::new(None));
        let slot = observed.clone();
        client.add_response_interceptor(recover(move |err: HttpError| {
            *slot.lock().unwrap() = Some(err.is_timeout());
            future::ready(Err::<ApiResponse, _>(err))
        }));

        let err = client.send(ApiRequest::get("/slow")).await.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(*observed.lock().unwrap(), Some(true));
    }

    #[tokio::test]
    async fn test_from_config() {
        let (transport, _) = recording(StatusCode::OK);
        let config = ApiConfig {
            base_url: Some("http://localhost:8080".into()),
            timeout_ms: Some(1500),
        };
        let client = HttpClient::from_config(&config, transport);
        assert_eq!(client.base_url(), Some("http://localhost:8080"));
        assert_eq!(client.timeout(), Some(Duration::from_millis(1500)));
    }
}
