//! HTTP surface of the price prediction service.

use axum::Router;
use state::AppState;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;

pub use axum;

/// Prediction routes, mounted both at the root and under `/api`.
fn prediction_routes() -> Router<AppState> {
    Router::new()
        .nest("/predict", routes::predict::routes())
        .merge(routes::locations::routes())
}

pub fn construct_router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(prediction_routes())
        .nest("/api", prediction_routes())
        .nest("/health", routes::health::routes())
        .nest("/metrics", routes::metrics::routes());

    if let Some(dir) = state.static_dir.as_ref() {
        tracing::info!(dir = %dir.display(), "serving static files");
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
}
