//! Ordered column layout a model was trained against.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("column schema must contain at least one column")]
    Empty,
    #[error("duplicate column `{0}` in schema")]
    Duplicate(String),
}

/// Ordered, unique feature names. Position `i` of a feature vector holds the
/// value of `columns[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ColumnSchema {
    columns: Vec<String>,
    index: AHashMap<String, usize>,
}

impl ColumnSchema {
    pub fn new<I, S>(columns: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut index = AHashMap::with_capacity(columns.len());
        for (position, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), position).is_some() {
                return Err(SchemaError::Duplicate(name.clone()));
            }
        }

        Ok(Self { columns, index })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Exact-match lookup of a column's position.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Category values that have an indicator column `prefix + value`,
    /// sorted and without the prefix.
    pub fn categories(&self, prefix: &str) -> Vec<String> {
        self.columns
            .iter()
            .filter_map(|column| column.strip_prefix(prefix))
            .map(ToOwned::to_owned)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl PartialEq for ColumnSchema {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl Eq for ColumnSchema {}

impl TryFrom<Vec<String>> for ColumnSchema {
    type Error = SchemaError;

    fn try_from(columns: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(columns)
    }
}

impl From<ColumnSchema> for Vec<String> {
    fn from(schema: ColumnSchema) -> Self {
        schema.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_follow_declaration_order() {
        let schema = ColumnSchema::new(["total_sqft", "bath", "bhk"]).unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.position("total_sqft"), Some(0));
        assert_eq!(schema.position("bhk"), Some(2));
        assert_eq!(schema.position("Bath"), None);
    }

    #[test]
    fn rejects_empty_schema() {
        let columns: Vec<String> = Vec::new();
        assert_eq!(ColumnSchema::new(columns), Err(SchemaError::Empty));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = ColumnSchema::new(["a", "b", "a"]).unwrap_err();
        assert_eq!(err, SchemaError::Duplicate("a".to_string()));
    }

    #[test]
    fn categories_are_sorted_and_stripped() {
        let schema = ColumnSchema::new([
            "total_sqft",
            "bath",
            "bhk",
            "location_Whitefield",
            "location_Indiranagar",
        ])
        .unwrap();
        assert_eq!(schema.categories("location_"), vec!["Indiranagar", "Whitefield"]);
    }

    #[test]
    fn categories_empty_without_indicator_columns() {
        let schema = ColumnSchema::new(["Ram", "Weight", "Inches"]).unwrap();
        assert!(schema.categories("location_").is_empty());
    }

    #[test]
    fn deserializes_from_plain_array() {
        let schema: ColumnSchema =
            serde_json::from_str(r#"["total_sqft","bath","location_Hebbal"]"#).unwrap();
        assert_eq!(schema.position("location_Hebbal"), Some(2));

        let json = serde_json::to_string(&schema).unwrap();
        assert_eq!(json, r#"["total_sqft","bath","location_Hebbal"]"#);
    }

    #[test]
    fn deserialization_rejects_duplicates() {
        let result: Result<ColumnSchema, _> = serde_json::from_str(r#"["a","a"]"#);
        assert!(result.is_err());
    }
}
