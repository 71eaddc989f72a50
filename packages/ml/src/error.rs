use crate::encoder::EncodeError;
use crate::model::PredictError;
use crate::registry::ModelKind;

/// Everything a single pricing request can fail with.
///
/// An unknown category is deliberately absent: it encodes as the baseline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("{0}")]
    Validation(String),
    #[error("feature `{feature}` is not part of the model's column schema")]
    SchemaMismatch { feature: String },
    #[error("{0} model is not available")]
    ModelUnavailable(ModelKind),
    /// The registered model needs a column schema but was loaded without one.
    #[error("{0} model has no column schema")]
    MissingSchema(ModelKind),
    #[error("prediction failed: {0}")]
    Prediction(#[from] PredictError),
}

impl PricingError {
    pub fn validation(msg: impl Into<String>) -> Self {
        PricingError::Validation(msg.into())
    }
}

impl From<EncodeError> for PricingError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::SchemaMismatch { feature } => PricingError::SchemaMismatch { feature },
        }
    }
}
