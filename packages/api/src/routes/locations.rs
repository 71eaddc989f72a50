use crate::error::ApiError;
use crate::routes::Success;
use crate::state::AppState;
use axum::extract::State;
use axum::{Json, Router, routing::get};
use pricecast_ml::pricing;
use serde::{Deserialize, Serialize};

pub fn routes() -> Router<AppState> {
    Router::new().route("/locations", get(locations))
}

#[derive(Serialize, Deserialize)]
pub struct LocationsResponse {
    pub locations: Vec<String>,
}

#[tracing::instrument(name = "GET /locations", skip(state))]
pub async fn locations(
    State(state): State<AppState>,
) -> Result<Json<Success<LocationsResponse>>, ApiError> {
    let locations = pricing::locations(&state.registry)?;
    Ok(Json(Success::new(LocationsResponse { locations })))
}
