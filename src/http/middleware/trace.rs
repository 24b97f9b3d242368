//! Logging interceptors.

use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;

use crate::http::error::HttpError;
use crate::http::interceptor::Interceptor;
use crate::http::request::ApiRequest;
use crate::http::response::ApiResponse;

/// Logs each outgoing request at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestTracing;

impl Interceptor<ApiRequest> for RequestTracing {
    fn on_fulfilled(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiRequest, HttpError>> {
        tracing::debug!(
            request_id = request.request_id().unwrap_or("unknown"),
            method = %request.method,
            path = %request.path,
            "Sending request"
        );
        future::ready(Ok(request)).boxed()
    }

    fn on_rejected(&self, error: HttpError) -> BoxFuture<'_, Result<ApiRequest, HttpError>> {
        tracing::warn!(error = %error, "Request rejected before dispatch");
        future::ready(Err(error)).boxed()
    }
}

/// Logs each response and every rejection that reaches the response chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseTracing;

impl Interceptor<ApiResponse> for ResponseTracing {
    fn on_fulfilled(&self, response: ApiResponse) -> BoxFuture<'_, Result<ApiResponse, HttpError>> {
        match &response.request {
            Some(meta) => tracing::debug!(
                request_id = meta.request_id.as_deref().unwrap_or("unknown"),
                method = %meta.method,
                url = %meta.url,
                status = %response.status,
                elapsed = ?meta.sent_at.elapsed(),
                "Response received"
            ),
            None => tracing::debug!(status = %response.status, "Response received"),
        }
        future::ready(Ok(response)).boxed()
    }

    fn on_rejected(&self, error: HttpError) -> BoxFuture<'_, Result<ApiResponse, HttpError>> {
        match error.response().and_then(|r| r.request.as_ref()) {
            Some(meta) => tracing::warn!(
                request_id = meta.request_id.as_deref().unwrap_or("unknown"),
                url = %meta.url,
                error = %error,
                "Request failed"
            ),
            None => tracing::warn!(error = %error, "Request failed"),
        }
        future::ready(Err(error)).boxed()
    }
}
