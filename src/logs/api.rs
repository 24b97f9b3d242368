//! Logs API calls.

use std::sync::Arc;

use crate::http::client::HttpClient;
use crate::http::error::HttpError;
use crate::logs::types::{LogFilter, LogsPage};

/// Path of the log listing endpoint, relative to the base URL.
pub const LOGS_PATH: &str = "/api/logs";

/// Typed access to the log backend.
#[derive(Debug, Clone)]
pub struct LogsApi {
    client: Arc<HttpClient>,
}

impl LogsApi {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Fetch one page of log entries.
    pub async fn fetch(&self, filter: &LogFilter) -> Result<LogsPage, HttpError> {
        let page: LogsPage = self.client.send_json(filter.to_request()).await?;
        tracing::debug!(total = page.total, returned = page.logs.len(), "Fetched logs");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::ApiResponse;
    use crate::http::transport::{transport_fn, PreparedRequest};
    use futures_util::future;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_fetch_encodes_filter() {
        let seen = Arc::new(Mutex::new(String::new()));
        let log = seen.clone();
        let mut client = HttpClient::new(transport_fn(move |request: PreparedRequest| {
            *log.lock().unwrap() = request.url;
            future::ready(ApiResponse::from_json(&serde_json::json!({ "total": 0, "logs": [] })))
        }));
        client.configure("http://logs.internal:8080/");

        let api = LogsApi::new(Arc::new(client));
        let filter = LogFilter {
            ip: Some("10.1.2.3".into()),
            status: Some(502),
            limit: 20,
            ..Default::default()
        };
        let page = api.fetch(&filter).await.unwrap();

        assert_eq!(page, LogsPage::empty());
        assert_eq!(
            *seen.lock().unwrap(),
            "http://logs.internal:8080/api/logs?ip=10.1.2.3&status=502&limit=20"
        );
    }
}
