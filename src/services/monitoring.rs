use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use anyhow::Result;

/// Outcome label values for `source_requests_total`.
pub const OUTCOME_OK: &str = "ok";
pub const OUTCOME_BAD_REQUEST: &str = "bad_request";
pub const OUTCOME_UPSTREAM_ERROR: &str = "upstream_error";

// Per-process metrics; each registry is private so tests can build many.
#[derive(Clone)]
pub struct ServiceMetrics {
    pub requests_total: IntCounterVec,
    pub rows_profiled_total: IntCounter,
    pub columns_profiled_total: IntCounter,
    pub fetch_duration: Histogram,

    registry: Registry,
}

impl ServiceMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("source_requests_total", "Source profiling requests by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let rows_profiled_total = IntCounter::with_opts(
            Opts::new("source_rows_profiled_total", "Total number of records profiled"),
        )?;
        registry.register(Box::new(rows_profiled_total.clone()))?;

        let columns_profiled_total = IntCounter::with_opts(
            Opts::new("source_columns_profiled_total", "Total number of columns profiled"),
        )?;
        registry.register(Box::new(columns_profiled_total.clone()))?;

        let fetch_duration = Histogram::with_opts(
            HistogramOpts::new(
                "source_fetch_duration_seconds",
                "Duration of remote source fetches in seconds",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        )?;
        registry.register(Box::new(fetch_duration.clone()))?;

        // Pre-create the outcome series so they show up before first use.
        for outcome in [OUTCOME_OK, OUTCOME_BAD_REQUEST, OUTCOME_UPSTREAM_ERROR] {
            requests_total.with_label_values(&[outcome]);
        }

        Ok(Self {
            requests_total,
            rows_profiled_total,
            columns_profiled_total,
            fetch_duration,
            registry,
        })
    }

    pub fn record_outcome(&self, outcome: &str) {
        self.requests_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_profile(&self, rows: usize, columns: usize) {
        self.rows_profiled_total.inc_by(rows as u64);
        self.columns_profiled_total.inc_by(columns as u64);
    }

    pub fn render_metrics(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_series() {
        let metrics = ServiceMetrics::new().unwrap();
        metrics.record_outcome(OUTCOME_OK);
        metrics.record_profile(10, 3);

        let text = metrics.render_metrics().unwrap();
        assert!(text.contains("source_requests_total{outcome=\"ok\"} 1"));
        assert!(text.contains("source_requests_total{outcome=\"bad_request\"} 0"));
        assert!(text.contains("source_rows_profiled_total 10"));
        assert!(text.contains("source_columns_profiled_total 3"));
    }
}
