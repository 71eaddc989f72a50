use crate::error::ApiError;
use crate::metrics::record_prediction;
use crate::routes::Success;
use crate::state::AppState;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Json, Router, routing::post};
use pricecast_ml::pricing::{
    self, CarFeatures, HouseFeatures, LaptopFeatures, LaptopQuote, Quote,
};
use pricecast_ml::{ModelKind, PricingError};
use std::time::Instant;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/car", post(car))
        .route("/house", post(house))
        .route("/laptop", post(laptop))
}

#[tracing::instrument(name = "POST /predict/car", skip(state, payload))]
pub async fn car(
    State(state): State<AppState>,
    payload: Result<Json<CarFeatures>, JsonRejection>,
) -> Result<Json<Success<Quote>>, ApiError> {
    let Json(features) = payload?;
    let quote = measured(ModelKind::Car, || {
        pricing::predict_car(&state.registry, &features)
    })?;
    Ok(Json(Success::new(quote)))
}

#[tracing::instrument(name = "POST /predict/house", skip(state, payload))]
pub async fn house(
    State(state): State<AppState>,
    payload: Result<Json<HouseFeatures>, JsonRejection>,
) -> Result<Json<Success<Quote>>, ApiError> {
    let Json(features) = payload?;
    let quote = measured(ModelKind::House, || {
        pricing::predict_house(&state.registry, &features)
    })?;
    Ok(Json(Success::new(quote)))
}

#[tracing::instrument(name = "POST /predict/laptop", skip(state, payload))]
pub async fn laptop(
    State(state): State<AppState>,
    payload: Result<Json<LaptopFeatures>, JsonRejection>,
) -> Result<Json<Success<LaptopQuote>>, ApiError> {
    let Json(features) = payload?;
    let quote = measured(ModelKind::Laptop, || {
        pricing::predict_laptop(&state.registry, &features)
    })?;
    Ok(Json(Success::new(quote)))
}

fn measured<T>(
    kind: ModelKind,
    predict: impl FnOnce() -> Result<T, PricingError>,
) -> Result<T, PricingError> {
    let started = Instant::now();
    let result = predict();
    let outcome = match &result {
        Ok(_) => "ok",
        Err(PricingError::Validation(_) | PricingError::SchemaMismatch { .. }) => "rejected",
        Err(PricingError::ModelUnavailable(_)) => "unavailable",
        Err(PricingError::Prediction(_)) => "error",
    };
    record_prediction(kind, outcome, started.elapsed());
    result
}
