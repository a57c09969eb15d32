//! Prometheus metrics exposition
//!
//! - `http_requests_total` (counter): labels `route`, `status`
//! - `http_request_duration_seconds` (histogram): label `route`
//!
//! The library crates emit `upstream_attempts_total`, `upstream_failures_total`,
//! `key_rotations_total` and `images_generated_total` through the same recorder.

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

const DURATION_METRIC: &str = "http_request_duration_seconds";

/// Image synthesis can take tens of seconds, so the buckets reach 120s.
const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0,
];

fn builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(DURATION_METRIC.to_string()), DURATION_BUCKETS)
}

/// Install the global recorder and return the handle `/metrics` renders from.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    builder()?.install_recorder()
}

/// Record a completed API request.
pub fn record_request(route: &'static str, status: u16, duration_secs: f64) {
    metrics::counter!("http_requests_total", "route" => route, "status" => status.to_string())
        .increment(1);
    metrics::histogram!(DURATION_METRIC, "route" => route).record(duration_secs);
}

#[cfg(test)]
pub(crate) fn test_handle() -> PrometheusHandle {
    builder().unwrap().build_recorder().handle()
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusRecorder;

    fn isolated_recorder() -> (PrometheusRecorder, PrometheusHandle) {
        let recorder = builder().unwrap().build_recorder();
        let handle = recorder.handle();
        (recorder, handle)
    }

    #[test]
    fn record_request_without_recorder_is_a_no_op() {
        record_request("generate", 200, 0.05);
    }

    #[test]
    fn record_request_increments_counter_and_histogram() {
        let (recorder, handle) = isolated_recorder();
        let _guard = metrics::set_default_local_recorder(&recorder);

        record_request("generate", 200, 4.2);
        record_request("enhance", 200, 0.8);
        record_request("generate", 403, 0.3);

        let output = handle.render();
        assert!(output.contains("http_requests_total"));
        assert!(output.contains("route=\"generate\""));
        assert!(output.contains("route=\"enhance\""));
        assert!(output.contains("status=\"403\""));
        assert!(
            output.contains("http_request_duration_seconds_bucket"),
            "histogram must render _bucket lines"
        );
        assert!(output.contains("le=\"120\""), "slow synthesis bucket must exist");
    }

    #[test]
    fn library_counters_render_through_the_same_recorder() {
        let (recorder, handle) = isolated_recorder();
        let _guard = metrics::set_default_local_recorder(&recorder);

        metrics::counter!("key_rotations_total").increment(2);

        assert!(handle.render().contains("key_rotations_total 2"));
    }
}
