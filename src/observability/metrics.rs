//! Metrics collection.
//!
//! # Metrics
//! - `logview_requests_total` (counter): API calls by method, status, outcome
//! - `logview_request_duration_seconds` (histogram): dispatch-to-response latency
//! - `logview_navigations_total` (counter): router navigations by outcome
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade
//! - The binary installs a Prometheus recorder; embedders may install their own
//! - Status `0` labels failures that never produced a response

use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub const REQUESTS_TOTAL: &str = "logview_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "logview_request_duration_seconds";
pub const NAVIGATIONS_TOTAL: &str = "logview_navigations_total";

/// Record one completed API call.
pub fn record_response(method: &str, status: u16, outcome: &'static str, elapsed: Option<Duration>) {
    metrics::counter!(
        REQUESTS_TOTAL,
        "method" => method.to_string(),
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    if let Some(elapsed) = elapsed {
        metrics::histogram!(REQUEST_DURATION_SECONDS, "method" => method.to_string())
            .record(elapsed.as_secs_f64());
    }
}

/// Record one navigation attempt.
pub fn record_navigation(outcome: &'static str) {
    metrics::counter!(NAVIGATIONS_TOTAL, "outcome" => outcome).increment(1);
}

/// Install a process-wide Prometheus recorder.
///
/// The handle renders the text exposition format on demand.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_values_render() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_response("GET", 200, "success", Some(Duration::from_millis(12)));
            record_response("GET", 0, "timeout", None);
            record_navigation("activated");
        });

        let text = handle.render();
        assert!(text.contains("logview_requests_total{"));
        assert!(text.contains("outcome=\"success\""));
        assert!(text.contains("outcome=\"timeout\""));
        assert!(text.contains("logview_request_duration_seconds"));
        assert!(text.contains("logview_navigations_total{outcome=\"activated\"} 1"));
    }
}
