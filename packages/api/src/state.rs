use metrics_exporter_prometheus::PrometheusHandle;
use pricecast_ml::ModelRegistry;
use std::path::PathBuf;
use std::sync::Arc;

pub type AppState = Arc<State>;

pub struct State {
    /// Built once at startup, read-only afterwards.
    pub registry: Arc<ModelRegistry>,
    pub prometheus: Option<PrometheusHandle>,
    /// Front-end files served as the router fallback.
    pub static_dir: Option<PathBuf>,
}

impl State {
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            prometheus: None,
            static_dir: None,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }
}
