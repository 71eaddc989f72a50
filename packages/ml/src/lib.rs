//! Price prediction core.
//!
//! Loads fitted linear models together with their column layout and turns
//! named request values into predictions. The HTTP surface lives in
//! `pricecast-api`; this crate knows nothing about transport.

pub mod dataset;
pub mod encoder;
pub mod error;
pub mod model;
pub mod pricing;
pub mod registry;
pub mod schema;

mod tests;

pub use encoder::{
    CategoricalInput, EncodeError, EncodingStrategy, FeatureLayout, FeatureValues, encode,
    encode_fixed, encode_lenient,
};
pub use error::PricingError;
pub use model::{LinearModel, PersistedModel, PredictError, PredictFn, Predictor};
pub use registry::{LoadError, ModelAsset, ModelKind, ModelRegistry, ModelRegistryBuilder};
pub use schema::{ColumnSchema, SchemaError};
