//! Immutable set of models available to the service.
//!
//! Built once at startup, then shared read-only behind an `Arc`. A model that
//! was not registered is reported per request as
//! [`PricingError::ModelUnavailable`], never substituted.

use crate::encoder::FeatureLayout;
use crate::error::PricingError;
use crate::model::{PersistedModel, PredictError, Predictor};
use crate::schema::{ColumnSchema, SchemaError};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Width of the car model's conventional input vector.
pub const CAR_ARITY: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Car,
    House,
    Laptop,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Car, ModelKind::House, ModelKind::Laptop];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Car => "car",
            ModelKind::House => "house",
            ModelKind::Laptop => "laptop",
        }
    }

    pub fn model_file(&self) -> &'static str {
        match self {
            ModelKind::Car => "car_model.json",
            ModelKind::House => "house_model.json",
            ModelKind::Laptop => "laptop_model.json",
        }
    }

    /// Column schema file; `None` for fixed positional models.
    pub fn columns_file(&self) -> Option<&'static str> {
        match self {
            ModelKind::Car => None,
            ModelKind::House => Some("house_columns.json"),
            ModelKind::Laptop => Some("laptop_columns.json"),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid column schema in {}: {source}", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },
    #[error("{kind} model found but its column file {} is missing", path.display())]
    MissingColumns { kind: ModelKind, path: PathBuf },
    #[error("{kind} model expects {model} features but its layout has {layout}")]
    Incompatible {
        kind: ModelKind,
        model: usize,
        layout: usize,
    },
}

/// A loaded model and the layout its inputs follow.
#[derive(Clone)]
pub struct ModelAsset {
    kind: ModelKind,
    predictor: Arc<dyn Predictor>,
    layout: FeatureLayout,
}

impl ModelAsset {
    pub fn new(kind: ModelKind, predictor: impl Predictor + 'static, layout: FeatureLayout) -> Self {
        Self {
            kind,
            predictor: Arc::new(predictor),
            layout,
        }
    }

    /// Rejects a model whose fitted width disagrees with its layout.
    pub fn checked(
        kind: ModelKind,
        predictor: impl Predictor + 'static,
        layout: FeatureLayout,
    ) -> Result<Self, LoadError> {
        if let Some(model) = predictor.n_features() {
            if model != layout.width() {
                return Err(LoadError::Incompatible {
                    kind,
                    model,
                    layout: layout.width(),
                });
            }
        }
        Ok(Self::new(kind, predictor, layout))
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    pub fn schema(&self) -> Option<&ColumnSchema> {
        self.layout.schema()
    }

    pub fn predict(&self, features: &Array1<f64>) -> Result<f64, PredictError> {
        self.predictor.predict(features)
    }
}

impl fmt::Debug for ModelAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelAsset")
            .field("kind", &self.kind)
            .field("strategy", &self.layout.strategy())
            .field("width", &self.layout.width())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct ModelRegistryBuilder {
    assets: BTreeMap<ModelKind, ModelAsset>,
}

impl ModelRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an asset, replacing any earlier one of the same kind.
    pub fn register(mut self, asset: ModelAsset) -> Self {
        self.assets.insert(asset.kind(), asset);
        self
    }

    pub fn build(self) -> ModelRegistry {
        ModelRegistry {
            assets: self.assets,
        }
    }
}

#[derive(Debug, Default)]
pub struct ModelRegistry {
    assets: BTreeMap<ModelKind, ModelAsset>,
}

impl ModelRegistry {
    pub fn builder() -> ModelRegistryBuilder {
        ModelRegistryBuilder::new()
    }

    pub fn get(&self, kind: ModelKind) -> Result<&ModelAsset, PricingError> {
        self.assets
            .get(&kind)
            .ok_or(PricingError::ModelUnavailable(kind))
    }

    pub fn contains(&self, kind: ModelKind) -> bool {
        self.assets.contains_key(&kind)
    }

    /// Registered kinds in stable order.
    pub fn loaded(&self) -> Vec<ModelKind> {
        self.assets.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Loads every model found in `dir`. Absent model files are skipped so
    /// the service can run with a reduced set; unreadable ones are errors.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        let mut builder = ModelRegistry::builder();

        for kind in ModelKind::ALL {
            let model_path = dir.join(kind.model_file());
            if !model_path.exists() {
                tracing::warn!(model = %kind, path = %model_path.display(), "model file not found, skipping");
                continue;
            }

            let persisted: PersistedModel = read_json(&model_path)?;
            tracing::info!(model = %kind, kind = %persisted, path = %model_path.display(), "loaded model");
            let predictor = persisted.into_predictor();

            let layout = match kind.columns_file() {
                None => FeatureLayout::Fixed { arity: CAR_ARITY },
                Some(file) => {
                    let columns_path = dir.join(file);
                    if !columns_path.exists() {
                        return Err(LoadError::MissingColumns {
                            kind,
                            path: columns_path,
                        });
                    }
                    let columns: Vec<String> = read_json(&columns_path)?;
                    let schema = ColumnSchema::new(columns).map_err(|source| LoadError::Schema {
                        path: columns_path.clone(),
                        source,
                    })?;
                    tracing::debug!(model = %kind, columns = schema.len(), "loaded column schema");
                    FeatureLayout::Schema(schema)
                }
            };

            builder = builder.register(ModelAsset::checked(kind, predictor, layout)?);
        }

        let registry = builder.build();
        tracing::info!(models = ?registry.loaded(), "model registry ready");
        Ok(registry)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}
