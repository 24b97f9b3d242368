//! Request ID interceptor.

use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;
use uuid::Uuid;

use crate::http::error::HttpError;
use crate::http::interceptor::Interceptor;
use crate::http::request::{ApiRequest, X_REQUEST_ID};

/// Adds a UUID v4 `x-request-id` header unless the request already has one.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestId;

impl Interceptor<ApiRequest> for RequestId {
    fn on_fulfilled(&self, mut request: ApiRequest) -> BoxFuture<'_, Result<ApiRequest, HttpError>> {
        if !request.headers.contains_key(X_REQUEST_ID) {
            request.set_header(X_REQUEST_ID, &Uuid::new_v4().to_string());
        }
        future::ready(Ok(request)).boxed()
    }
}
