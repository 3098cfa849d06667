//! Column transformer artifact
//!
//! A preprocessor is an ordered list of named transformers. Each one reads
//! its columns from the row and appends its output; the final vector is the
//! concatenation in transformer order.

use serde::{Deserialize, Serialize};

use advisor_domain::model::FeatureRow;
use advisor_domain::predictor::FeatureEncoder;
use advisor_types::SchemaError;

/// What a one-hot transformer does with a value it never saw in training
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Error,
    /// Emit an all-zero block
    Ignore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transformer {
    StandardScaler {
        name: String,
        columns: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    OneHot {
        name: String,
        columns: Vec<String>,
        categories: Vec<Vec<String>>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
    Passthrough {
        name: String,
        columns: Vec<String>,
    },
}

impl Transformer {
    pub fn name(&self) -> &str {
        match self {
            Transformer::StandardScaler { name, .. }
            | Transformer::OneHot { name, .. }
            | Transformer::Passthrough { name, .. } => name,
        }
    }

    pub fn columns(&self) -> &[String] {
        match self {
            Transformer::StandardScaler { columns, .. }
            | Transformer::OneHot { columns, .. }
            | Transformer::Passthrough { columns, .. } => columns,
        }
    }

    /// Number of output features
    pub fn width(&self) -> usize {
        match self {
            Transformer::OneHot { categories, .. } => categories.iter().map(Vec::len).sum(),
            other => other.columns().len(),
        }
    }

    fn validate(&self) -> Result<(), String> {
        let columns = self.columns().len();
        match self {
            Transformer::StandardScaler { name, mean, scale, .. } => {
                if mean.len() != columns || scale.len() != columns {
                    return Err(format!(
                        "transformer '{}': {} columns but {} means and {} scales",
                        name,
                        columns,
                        mean.len(),
                        scale.len()
                    ));
                }
                if mean.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
                    return Err(format!("transformer '{}': non-finite parameter", name));
                }
            }
            Transformer::OneHot { name, categories, .. } => {
                if categories.len() != columns {
                    return Err(format!(
                        "transformer '{}': {} columns but {} category lists",
                        name,
                        columns,
                        categories.len()
                    ));
                }
            }
            Transformer::Passthrough { .. } => {}
        }
        Ok(())
    }

    fn transform_into(&self, row: &FeatureRow, out: &mut Vec<f64>) -> Result<(), SchemaError> {
        match self {
            Transformer::StandardScaler { columns, mean, scale, .. } => {
                for ((column, mean), scale) in columns.iter().zip(mean).zip(scale) {
                    let value = row.numeric(column)?;
                    // zero variance in training
                    let scale = if *scale == 0.0 { 1.0 } else { *scale };
                    out.push((value - mean) / scale);
                }
            }
            Transformer::OneHot {
                columns,
                categories,
                handle_unknown,
                ..
            } => {
                for (column, known) in columns.iter().zip(categories) {
                    let value = row.categorical(column)?;
                    let position = known.iter().position(|c| c == value);
                    if position.is_none() && *handle_unknown == HandleUnknown::Error {
                        return Err(SchemaError::UnknownCategory {
                            field: column.clone(),
                            value: value.to_string(),
                        });
                    }
                    out.extend((0..known.len()).map(|i| if Some(i) == position { 1.0 } else { 0.0 }));
                }
            }
            Transformer::Passthrough { columns, .. } => {
                for column in columns {
                    out.push(row.numeric(column)?);
                }
            }
        }
        Ok(())
    }
}

/// Column transformer deserialized from a preprocessor artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabularPreprocessor {
    pub transformers: Vec<Transformer>,
}

impl TabularPreprocessor {
    /// Check internal consistency after deserialization
    pub fn validate(&self) -> Result<(), String> {
        if self.transformers.is_empty() {
            return Err("preprocessor has no transformers".to_string());
        }
        for transformer in &self.transformers {
            transformer.validate()?;
        }
        Ok(())
    }

    pub fn named_transformer(&self, name: &str) -> Option<&Transformer> {
        self.transformers.iter().find(|t| t.name() == name)
    }

    /// Every input column, in transformer order
    pub fn input_columns(&self) -> Vec<&str> {
        self.transformers
            .iter()
            .flat_map(|t| t.columns().iter().map(String::as_str))
            .collect()
    }
}

impl FeatureEncoder for TabularPreprocessor {
    fn transform(&self, row: &FeatureRow) -> Result<Vec<f64>, SchemaError> {
        let mut out = Vec::with_capacity(self.output_width());
        for transformer in &self.transformers {
            transformer.transform_into(row, &mut out)?;
        }
        Ok(out)
    }

    fn output_width(&self) -> usize {
        self.transformers.iter().map(Transformer::width).sum()
    }

    fn categories(&self, field: &str) -> Option<&[String]> {
        self.transformers.iter().find_map(|t| match t {
            Transformer::OneHot {
                columns,
                categories,
                ..
            } => columns
                .iter()
                .position(|c| c == field)
                .map(|i| categories[i].as_slice()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_domain::model::FeatureValue;

    fn preprocessor_json() -> &'static str {
        r#"{
            "transformers": [
                {"kind": "standard_scaler", "name": "num",
                 "columns": ["Area", "Annual_Rainfall"],
                 "mean": [1.0, 1000.0], "scale": [2.0, 0.0]},
                {"kind": "one_hot", "name": "cat",
                 "columns": ["Season", "State"],
                 "categories": [["Kharif", "Rabi"], ["Kerala", "Punjab", "Assam"]]},
                {"kind": "passthrough", "name": "raw", "columns": ["Crop_Year"]}
            ]
        }"#
    }

    fn row(state: &str) -> FeatureRow {
        FeatureRow::new()
            .with("Crop_Year", FeatureValue::Numeric(2020.0))
            .with("Season", FeatureValue::Categorical("Rabi".to_string()))
            .with("State", FeatureValue::Categorical(state.to_string()))
            .with("Area", FeatureValue::Numeric(3.0))
            .with("Annual_Rainfall", FeatureValue::Numeric(1200.0))
    }

    fn load() -> TabularPreprocessor {
        let p: TabularPreprocessor = serde_json::from_str(preprocessor_json()).unwrap();
        p.validate().unwrap();
        p
    }

    #[test]
    fn test_transform_concatenates_in_order() {
        let p = load();
        assert_eq!(p.output_width(), 2 + 5 + 1);
        let encoded = p.transform(&row("Punjab")).unwrap();
        // zero scale is treated as 1
        assert_eq!(
            encoded,
            vec![1.0, 200.0, 0.0, 1.0, 0.0, 1.0, 0.0, 2020.0]
        );
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let p = load();
        let err = p.transform(&row("Atlantis")).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownCategory {
                field: "State".to_string(),
                value: "Atlantis".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_category_ignored_when_configured() {
        let mut p = load();
        if let Transformer::OneHot { handle_unknown, .. } = &mut p.transformers[1] {
            *handle_unknown = HandleUnknown::Ignore;
        }
        let encoded = p.transform(&row("Atlantis")).unwrap();
        assert_eq!(&encoded[4..7], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let p = load();
        let partial = FeatureRow::new().with("Area", FeatureValue::Numeric(1.0));
        assert_eq!(
            p.transform(&partial),
            Err(SchemaError::MissingField("Annual_Rainfall".to_string()))
        );
    }

    #[test]
    fn test_categories_accessor() {
        let p = load();
        assert_eq!(
            p.categories("State").unwrap(),
            &["Kerala".to_string(), "Punjab".to_string(), "Assam".to_string()]
        );
        assert!(p.categories("Area").is_none());
        assert!(p.named_transformer("cat").is_some());
        assert_eq!(
            p.input_columns(),
            vec!["Area", "Annual_Rainfall", "Season", "State", "Crop_Year"]
        );
    }

    #[test]
    fn test_validate_rejects_shape_mismatch() {
        let json = r#"{"transformers": [
            {"kind": "standard_scaler", "name": "num", "columns": ["Area"],
             "mean": [1.0, 2.0], "scale": [1.0]}
        ]}"#;
        let p: TabularPreprocessor = serde_json::from_str(json).unwrap();
        assert!(p.validate().is_err());
    }
}
