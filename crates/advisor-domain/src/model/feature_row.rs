//! Tabular view of one observation, keyed by column name

use advisor_types::columns;
use advisor_types::SchemaError;

/// A single cell of a feature row
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Categorical(String),
    Numeric(f64),
}

/// One row of named columns, in insertion order.
///
/// Encoders look columns up by name, so the order only matters for display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureRow {
    columns: Vec<(String, FeatureValue)>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: FeatureValue) -> Self {
        self.set(name, value);
        self
    }

    /// Insert a column, replacing any existing value under the same name
    pub fn set(&mut self, name: &str, value: FeatureValue) {
        match self.columns.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.columns.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Read a numeric column
    pub fn numeric(&self, name: &str) -> Result<f64, SchemaError> {
        match self.get(name) {
            Some(FeatureValue::Numeric(v)) => Ok(*v),
            Some(FeatureValue::Categorical(_)) => Err(SchemaError::WrongKind {
                field: name.to_string(),
                expected: "numeric",
            }),
            None => Err(SchemaError::MissingField(name.to_string())),
        }
    }

    /// Read a categorical column
    pub fn categorical(&self, name: &str) -> Result<&str, SchemaError> {
        match self.get(name) {
            Some(FeatureValue::Categorical(v)) => Ok(v.as_str()),
            Some(FeatureValue::Numeric(_)) => Err(SchemaError::WrongKind {
                field: name.to_string(),
                expected: "categorical",
            }),
            None => Err(SchemaError::MissingField(name.to_string())),
        }
    }

    /// Copy of this row with the candidate crop attached
    pub fn with_crop(&self, crop: &str) -> FeatureRow {
        self.clone()
            .with(columns::CROP, FeatureValue::Categorical(crop.to_string()))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> FeatureRow {
        FeatureRow::new()
            .with("State", FeatureValue::Categorical("Kerala".to_string()))
            .with("Area", FeatureValue::Numeric(2.0))
    }

    #[test]
    fn test_lookup_by_kind() {
        let row = sample_row();
        assert_eq!(row.categorical("State").unwrap(), "Kerala");
        assert!((row.numeric("Area").unwrap() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wrong_kind_and_missing() {
        let row = sample_row();
        assert_eq!(
            row.numeric("State"),
            Err(SchemaError::WrongKind {
                field: "State".to_string(),
                expected: "numeric"
            })
        );
        assert_eq!(
            row.categorical("Season"),
            Err(SchemaError::MissingField("Season".to_string()))
        );
    }

    #[test]
    fn test_with_crop_leaves_original_untouched() {
        let row = sample_row();
        let with_crop = row.with_crop("Rice");
        assert_eq!(row.len(), 2);
        assert_eq!(with_crop.len(), 3);
        assert_eq!(with_crop.categorical("Crop").unwrap(), "Rice");

        // attaching twice replaces rather than duplicates
        let again = with_crop.with_crop("Wheat");
        assert_eq!(again.len(), 3);
        assert_eq!(again.categorical("Crop").unwrap(), "Wheat");
    }
}
