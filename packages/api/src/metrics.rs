use pricecast_ml::ModelKind;
use std::time::Duration;

pub const PREDICTIONS_TOTAL: &str = "predictions_total";
pub const PREDICTION_DURATION_SECONDS: &str = "prediction_duration_seconds";

pub const PREDICTION_BUCKETS: &[f64] = &[0.000_05, 0.000_1, 0.000_25, 0.000_5, 0.001, 0.005, 0.01, 0.05];

pub fn describe() {
    metrics::describe_counter!(PREDICTIONS_TOTAL, "Prediction requests by model and outcome");
    metrics::describe_histogram!(
        PREDICTION_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Time spent encoding and predicting"
    );
}

pub fn record_prediction(kind: ModelKind, outcome: &'static str, elapsed: Duration) {
    metrics::counter!(PREDICTIONS_TOTAL, "model" => kind.as_str(), "outcome" => outcome).increment(1);
    metrics::histogram!(PREDICTION_DURATION_SECONDS, "model" => kind.as_str())
        .record(elapsed.as_secs_f64());
}
