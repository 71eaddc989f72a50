use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use pricecast_api::metrics::{PREDICTION_BUCKETS, PREDICTION_DURATION_SECONDS, describe};

/// Installs the global Prometheus recorder. Rendering happens on `GET /metrics`.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(PREDICTION_DURATION_SECONDS.to_string()),
            PREDICTION_BUCKETS,
        )?
        .install_recorder()?;

    describe();
    tracing::info!("Prometheus metrics initialized");
    Ok(handle)
}
