#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use pricecast_api::{construct_router, state::State};
use pricecast_ml::ModelRegistry;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod metrics;

#[tokio::main]
async fn main() -> pricecast_types::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting pricecast server");

    let config = config::Config::from_env()?;
    tracing::info!(model_dir = %config.model_dir.display(), "Loaded configuration");

    let registry = ModelRegistry::load_dir(&config.model_dir)?;
    if registry.is_empty() {
        tracing::warn!("No models loaded, every prediction will report MODEL_UNAVAILABLE");
    }

    let mut state = State::new(registry).with_prometheus(metrics::init_metrics()?);
    if let Some(dir) = &config.static_dir {
        state = state.with_static_dir(dir);
    }

    let app = construct_router(std::sync::Arc::new(state));

    let addr = config.addr();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
