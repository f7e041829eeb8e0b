use anyhow::Context;
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder and describe the evaluator series.
    /// Fails if a recorder is already installed.
    pub fn init() -> anyhow::Result<Self> {
        // Use default buckets to avoid API differences across crate versions.
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_counter!("evaluations_total", "Articles evaluated successfully.");
        describe_counter!(
            "evaluations_worthy_total",
            "Evaluations that passed the worthiness threshold."
        );
        describe_counter!(
            "evaluation_errors_total",
            "Failed evaluations, labelled by error kind."
        );
        describe_histogram!("evaluation_ms", "Single-article evaluation time in milliseconds.");
        crate::ingest::ensure_metrics_described();

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
