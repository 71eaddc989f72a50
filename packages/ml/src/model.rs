//! Prediction capability and the linear regression behind it.

use linfa::DatasetBase;
use linfa::traits::{Fit, Predict};
use linfa_linear::{FittedLinearRegression, LinearRegression};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    #[error("model expects {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("model produced no output")]
    EmptyOutput,
    #[error("model produced a non-finite value")]
    NonFinite,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("training failed: {0}")]
pub struct TrainError(pub String);

/// Maps one feature vector to one scalar. Shared read-only across requests.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &Array1<f64>) -> Result<f64, PredictError>;

    /// Number of inputs the model was fitted on, when known.
    fn n_features(&self) -> Option<usize> {
        None
    }
}

/// Adapts a plain function into a [`Predictor`].
pub struct PredictFn<F>(pub F);

impl<F> Predictor for PredictFn<F>
where
    F: Fn(&Array1<f64>) -> f64 + Send + Sync,
{
    fn predict(&self, features: &Array1<f64>) -> Result<f64, PredictError> {
        Ok((self.0)(features))
    }
}

/// Coefficients of a fitted linear model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearCoefficients {
    /// One coefficient per input column
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub n_features: usize,
}

pub struct LinearModel {
    model: FittedLinearRegression<f64>,
}

impl LinearModel {
    pub fn new(model: FittedLinearRegression<f64>) -> Self {
        Self { model }
    }

    /// Ordinary least squares with an intercept.
    pub fn fit(records: Array2<f64>, targets: Array1<f64>) -> Result<Self, TrainError> {
        if records.nrows() != targets.len() {
            return Err(TrainError(format!(
                "{} records but {} targets",
                records.nrows(),
                targets.len()
            )));
        }
        let dataset = DatasetBase::from(records).with_targets(targets);
        let model = LinearRegression::default()
            .fit(&dataset)
            .map_err(|e| TrainError(e.to_string()))?;
        Ok(Self { model })
    }

    pub fn coefficients(&self) -> LinearCoefficients {
        let coefficients = self.model.params().to_vec();
        LinearCoefficients {
            n_features: coefficients.len(),
            coefficients,
            intercept: self.model.intercept(),
        }
    }

    pub fn fitted(&self) -> &FittedLinearRegression<f64> {
        &self.model
    }

    pub fn into_fitted(self) -> FittedLinearRegression<f64> {
        self.model
    }
}

impl Predictor for LinearModel {
    fn predict(&self, features: &Array1<f64>) -> Result<f64, PredictError> {
        let expected = self.model.params().len();
        if features.len() != expected {
            return Err(PredictError::DimensionMismatch {
                expected,
                actual: features.len(),
            });
        }

        let records = features.clone().insert_axis(Axis(0));
        let predictions: Array1<f64> = self.model.predict(&records);
        let value = predictions.get(0).copied().ok_or(PredictError::EmptyOutput)?;
        if !value.is_finite() {
            return Err(PredictError::NonFinite);
        }
        Ok(value)
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.model.params().len())
    }
}

impl fmt::Debug for LinearModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearModel")
            .field("n_features", &self.model.params().len())
            .field("intercept", &self.model.intercept())
            .finish()
    }
}

/// A fitted model together with what it predicts.
#[derive(Serialize, Deserialize)]
pub struct ModelWithMeta<M> {
    pub model: M,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// On-disk form of a model file.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PersistedModel {
    LinearRegression(ModelWithMeta<FittedLinearRegression<f64>>),
}

impl PersistedModel {
    pub fn linear(model: LinearModel, target: impl Into<String>) -> Self {
        PersistedModel::LinearRegression(ModelWithMeta {
            model: model.into_fitted(),
            target: Some(target.into()),
        })
    }

    pub fn to_json_vec(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }

    pub fn from_json_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    pub fn into_predictor(self) -> LinearModel {
        match self {
            PersistedModel::LinearRegression(meta) => LinearModel::new(meta.model),
        }
    }
}

impl fmt::Display for PersistedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistedModel::LinearRegression(_) => write!(f, "Linear Regression"),
        }
    }
}
