//! Log query and result types.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

use crate::http::request::ApiRequest;
use crate::logs::api::LOGS_PATH;

/// Page size the backend uses when none is given.
pub const DEFAULT_LIMIT: u32 = 200;

/// Filters accepted by `GET /api/logs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    /// Substring of the client IP.
    pub ip: Option<String>,
    /// Substring of the request path.
    pub path: Option<String>,
    pub status: Option<u16>,
    pub limit: u32,
    pub offset: u32,
    pub from: Option<DateTime<FixedOffset>>,
    pub to: Option<DateTime<FixedOffset>>,
}

impl Default for LogFilter {
    fn default() -> Self {
        Self {
            ip: None,
            path: None,
            status: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
            from: None,
            to: None,
        }
    }
}

impl LogFilter {
    /// Read a filter from decoded query parameters.
    ///
    /// Values that do not parse are ignored, as the backend does: a zero
    /// limit or status, a non-numeric offset and non-RFC 3339 times all fall
    /// back to defaults.
    pub fn from_query(query: &BTreeMap<String, String>) -> Self {
        let text = |key: &str| {
            query
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let time = |key: &str| {
            query
                .get(key)
                .and_then(|v| DateTime::parse_from_rfc3339(v.trim()).ok())
        };

        Self {
            ip: text("ip"),
            path: text("path"),
            status: query
                .get("status")
                .and_then(|v| v.trim().parse::<u16>().ok())
                .filter(|s| *s > 0),
            limit: query
                .get("limit")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|l| *l > 0)
                .unwrap_or(DEFAULT_LIMIT),
            offset: query
                .get("offset")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(0),
            from: time("from"),
            to: time("to"),
        }
    }

    /// Set fields as query pairs. Default paging is omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ip) = &self.ip {
            pairs.push(("ip", ip.clone()));
        }
        if let Some(path) = &self.path {
            pairs.push(("path", path.clone()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        if self.limit != DEFAULT_LIMIT {
            pairs.push(("limit", self.limit.to_string()));
        }
        if self.offset != 0 {
            pairs.push(("offset", self.offset.to_string()));
        }
        if let Some(from) = &self.from {
            pairs.push(("from", from.to_rfc3339()));
        }
        if let Some(to) = &self.to {
            pairs.push(("to", to.to_rfc3339()));
        }
        pairs
    }

    /// Build the API request for this filter.
    pub fn to_request(&self) -> ApiRequest {
        self.query_pairs()
            .into_iter()
            .fold(ApiRequest::get(LOGS_PATH), |request, (key, value)| request.query(key, value))
    }
}

/// One parsed access-log line, with the backend's field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogEntry {
    pub time: DateTime<FixedOffset>,
    #[serde(rename = "ClientIP", default)]
    pub client_ip: String,
    #[serde(default)]
    pub client_port: String,
    #[serde(rename = "XFF", default)]
    pub xff: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub server_port: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "HTTPVer", default)]
    pub http_ver: String,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub body_bytes: i64,
    #[serde(default)]
    pub req_bytes: i64,
    #[serde(default)]
    pub req_time: f64,
    #[serde(default, deserialize_with = "null_float64")]
    pub up_conn_time: Option<f64>,
    #[serde(default, deserialize_with = "null_float64")]
    pub up_resp_time: Option<f64>,
    #[serde(default, deserialize_with = "null_int64")]
    pub up_status: Option<i64>,
    #[serde(default, deserialize_with = "null_string")]
    pub up_addr: Option<String>,
    #[serde(default)]
    pub referer: String,
    #[serde(rename = "UA", default)]
    pub ua: String,
    #[serde(rename = "TLSProto", default)]
    pub tls_proto: String,
    #[serde(rename = "TLSCipher", default)]
    pub tls_cipher: String,
    #[serde(rename = "ReqID", default)]
    pub req_id: String,
}

/// One page of `GET /api/logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogsPage {
    pub total: u64,
    /// The backend sends `null` for an empty page.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub logs: Vec<LogEntry>,
}

impl LogsPage {
    pub fn empty() -> Self {
        Self {
            total: 0,
            logs: Vec::new(),
        }
    }
}

// SQL-nullable columns arrive as `{"Float64": 1.5, "Valid": true}` and so on.
// A bare value or `null` is accepted too.

#[derive(Deserialize)]
#[serde(untagged)]
enum Nullable<T> {
    NullFloat64 {
        #[serde(rename = "Float64")]
        value: T,
        #[serde(rename = "Valid")]
        valid: bool,
    },
    NullInt64 {
        #[serde(rename = "Int64")]
        value: T,
        #[serde(rename = "Valid")]
        valid: bool,
    },
    NullString {
        #[serde(rename = "String")]
        value: T,
        #[serde(rename = "Valid")]
        valid: bool,
    },
    Bare(T),
}

impl<T> Nullable<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Nullable::NullFloat64 { value, valid }
            | Nullable::NullInt64 { value, valid }
            | Nullable::NullString { value, valid } => valid.then_some(value),
            Nullable::Bare(value) => Some(value),
        }
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Nullable<T>>::deserialize(deserializer)?.and_then(Nullable::into_option))
}

fn null_float64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    nullable(deserializer)
}

fn null_int64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    nullable(deserializer)
}

fn null_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    nullable(deserializer)
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<LogEntry>, D::Error> {
    Ok(Option::<Vec<LogEntry>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_filter_defaults() {
        let filter = LogFilter::from_query(&BTreeMap::new());
        assert_eq!(filter, LogFilter::default());
        assert_eq!(filter.limit, 200);
        assert!(filter.query_pairs().is_empty());
    }

    #[test]
    fn test_filter_ignores_invalid_values() {
        let filter = LogFilter::from_query(&query(&[
            ("status", "abc"),
            ("limit", "0"),
            ("offset", "-5"),
            ("from", "yesterday"),
            ("ip", "  "),
        ]));
        assert_eq!(filter, LogFilter::default());
    }

    #[test]
    fn test_filter_from_query() {
        let filter = LogFilter::from_query(&query(&[
            ("ip", "10.0.0"),
            ("status", "404"),
            ("limit", "50"),
            ("offset", "100"),
            ("from", "2024-05-01T00:00:00Z"),
            ("to", "2024-05-02T00:00:00+08:00"),
        ]));
        assert_eq!(filter.ip.as_deref(), Some("10.0.0"));
        assert_eq!(filter.status, Some(404));
        assert_eq!(filter.limit, 50);
        assert_eq!(filter.offset, 100);
        assert_eq!(filter.from.unwrap().to_rfc3339(), "2024-05-01T00:00:00+00:00");
        assert_eq!(filter.to.unwrap().offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_to_request() {
        let filter = LogFilter {
            path: Some("/api".into()),
            status: Some(500),
            offset: 200,
            ..Default::default()
        };
        let request = filter.to_request();
        assert_eq!(request.path, "/api/logs");
        assert_eq!(
            request.query,
            vec![
                ("path".to_string(), "/api".to_string()),
                ("status".to_string(), "500".to_string()),
                ("offset".to_string(), "200".to_string()),
            ]
        );
    }

    #[test]
    fn test_decode_page() {
        let body = r#"{
            "total": 1,
            "logs": [{
                "Time": "2024-05-01T12:30:45+08:00",
                "ClientIP": "203.0.113.9", "ClientPort": "51234", "XFF": "-",
                "Host": "example.com", "ServerPort": "443",
                "Method": "GET", "Path": "/index.html", "HTTPVer": "HTTP/1.1",
                "Status": 200, "BodyBytes": 612, "ReqBytes": 389, "ReqTime": 0.004,
                "UpConnTime": {"Float64": 0.001, "Valid": true},
                "UpRespTime": {"Float64": 0, "Valid": false},
                "UpStatus": {"Int64": 200, "Valid": true},
                "UpAddr": {"String": "", "Valid": false},
                "Referer": "-", "UA": "curl/8.0", "TLSProto": "TLSv1.3",
                "TLSCipher": "TLS_AES_128_GCM_SHA256", "ReqID": "abc"
            }]
        }"#;
        let page: LogsPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.total, 1);

        let entry = &page.logs[0];
        assert_eq!(entry.client_ip, "203.0.113.9");
        assert_eq!(entry.status, 200);
        assert_eq!(entry.up_conn_time, Some(0.001));
        assert_eq!(entry.up_resp_time, None);
        assert_eq!(entry.up_status, Some(200));
        assert_eq!(entry.up_addr, None);
        assert_eq!(entry.http_ver, "HTTP/1.1");
    }

    #[test]
    fn test_null_logs_decode_as_empty() {
        let page: LogsPage = serde_json::from_str(r#"{"total": 0, "logs": null}"#).unwrap();
        assert_eq!(page, LogsPage::empty());
    }
}
