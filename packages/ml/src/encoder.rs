//! Turns named request values into the dense vector a model expects.
//!
//! Two layouts exist side by side:
//!
//! * [`EncodingStrategy::FixedPositional`]: the caller already knows the order
//!   the model was trained with and hands over the values in that order. No
//!   schema is consulted, so a model trained on a different layout cannot be
//!   detected here.
//! * [`EncodingStrategy::SchemaIndirected`]: every value is placed by exact
//!   name lookup in a stored [`ColumnSchema`]. Names the schema does not know
//!   surface as [`EncodeError::SchemaMismatch`], and one categorical input may
//!   switch on a single one-hot indicator column.

use crate::schema::ColumnSchema;
use ahash::AHashMap;
use ndarray::Array1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("feature `{feature}` is not part of the model's column schema")]
    SchemaMismatch { feature: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingStrategy {
    FixedPositional,
    SchemaIndirected,
}

/// How a registered model lays out its input vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureLayout {
    /// Order fixed by convention between caller and model.
    Fixed { arity: usize },
    /// Order read from the model's stored column schema.
    Schema(ColumnSchema),
}

impl FeatureLayout {
    pub fn strategy(&self) -> EncodingStrategy {
        match self {
            FeatureLayout::Fixed { .. } => EncodingStrategy::FixedPositional,
            FeatureLayout::Schema(_) => EncodingStrategy::SchemaIndirected,
        }
    }

    pub fn width(&self) -> usize {
        match self {
            FeatureLayout::Fixed { arity } => *arity,
            FeatureLayout::Schema(schema) => schema.len(),
        }
    }

    pub fn schema(&self) -> Option<&ColumnSchema> {
        match self {
            FeatureLayout::Fixed { .. } => None,
            FeatureLayout::Schema(schema) => Some(schema),
        }
    }
}

/// Named numeric inputs of a single request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureValues {
    values: AHashMap<String, f64>,
}

impl FeatureValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for FeatureValues {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        let mut values = FeatureValues::new();
        for (name, value) in iter {
            values.insert(name, value);
        }
        values
    }
}

/// A categorical request field encoded one-hot through `prefix + value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalInput {
    pub field: String,
    pub value: String,
    pub prefix: String,
}

impl CategoricalInput {
    pub fn new(
        field: impl Into<String>,
        value: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            prefix: prefix.into(),
        }
    }

    pub fn column_name(&self) -> String {
        format!("{}{}", self.prefix, self.value)
    }
}

/// Fixed positional layout: the values already are the vector.
pub fn encode_fixed(values: &[f64]) -> Array1<f64> {
    Array1::from(values.to_vec())
}

/// Schema-indirected layout. Every value must name a schema column.
pub fn encode(
    schema: &ColumnSchema,
    values: &FeatureValues,
    categorical: Option<&CategoricalInput>,
) -> Result<Array1<f64>, EncodeError> {
    let mut vector: Array1<f64> = Array1::zeros(schema.len());
    for (name, value) in values.iter() {
        let position = schema
            .position(name)
            .ok_or_else(|| EncodeError::SchemaMismatch {
                feature: name.to_string(),
            })?;
        vector[position] = value;
    }
    set_indicator(schema, &mut vector, categorical);
    Ok(vector)
}

/// Schema-indirected layout that drops values whose column is absent
/// instead of failing.
pub fn encode_lenient(
    schema: &ColumnSchema,
    values: &FeatureValues,
    categorical: Option<&CategoricalInput>,
) -> Array1<f64> {
    let mut vector: Array1<f64> = Array1::zeros(schema.len());
    for (name, value) in values.iter() {
        match schema.position(name) {
            Some(position) => vector[position] = value,
            None => tracing::debug!(feature = name, "skipping feature absent from schema"),
        }
    }
    set_indicator(schema, &mut vector, categorical);
    vector
}

fn set_indicator(
    schema: &ColumnSchema,
    vector: &mut Array1<f64>,
    categorical: Option<&CategoricalInput>,
) {
    let Some(input) = categorical else {
        return;
    };
    let column = input.column_name();
    match schema.position(&column) {
        Some(position) => vector[position] = 1.0,
        // unknown category: baseline, all indicators stay zero
        None => tracing::debug!(
            field = input.field.as_str(),
            value = input.value.as_str(),
            "no indicator column for category"
        ),
    }
}
