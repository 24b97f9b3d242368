//! Metrics interceptor.

use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;

use crate::http::error::HttpError;
use crate::http::interceptor::Interceptor;
use crate::http::response::ApiResponse;
use crate::observability::metrics;

/// Records every call that reaches the response chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseMetrics;

impl Interceptor<ApiResponse> for ResponseMetrics {
    fn on_fulfilled(&self, response: ApiResponse) -> BoxFuture<'_, Result<ApiResponse, HttpError>> {
        let method = response
            .request
            .as_ref()
            .map(|meta| meta.method.as_str())
            .unwrap_or("UNKNOWN");
        metrics::record_response(method, response.status.as_u16(), "success", response.elapsed());
        future::ready(Ok(response)).boxed()
    }

    fn on_rejected(&self, error: HttpError) -> BoxFuture<'_, Result<ApiResponse, HttpError>> {
        let outcome = match &error {
            HttpError::Timeout { .. } => "timeout",
            HttpError::Status(_) => "status",
            HttpError::Transport { .. } => "transport",
            _ => "rejected",
        };
        match error.response() {
            Some(response) => {
                let method = response
                    .request
                    .as_ref()
                    .map(|meta| meta.method.as_str())
                    .unwrap_or("UNKNOWN");
                metrics::record_response(method, response.status.as_u16(), outcome, response.elapsed());
            }
            None => metrics::record_response("UNKNOWN", 0, outcome, None),
        }
        future::ready(Err(error)).boxed()
    }
}
