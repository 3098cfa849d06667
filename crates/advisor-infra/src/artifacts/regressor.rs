//! Yield regressor artifacts

use serde::{Deserialize, Serialize};

use super::classifier::{check_width, dot};
use super::tree::DecisionTree;
use advisor_domain::predictor::YieldRegressor;
use advisor_types::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

/// Random forest regressor: mean of the per-tree leaf values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestRegressor {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorArtifact {
    Linear(LinearRegressor),
    Forest(ForestRegressor),
}

impl RegressorArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            RegressorArtifact::Linear(_) => "linear",
            RegressorArtifact::Forest(_) => "forest",
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            RegressorArtifact::Linear(m) => m.coef.len(),
            RegressorArtifact::Forest(m) => m.n_features,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            RegressorArtifact::Linear(m) => {
                if m.coef.is_empty() {
                    return Err("linear model has no coefficients".to_string());
                }
                if m.coef.iter().chain(std::iter::once(&m.intercept)).any(|v| !v.is_finite()) {
                    return Err("non-finite coefficient".to_string());
                }
                Ok(())
            }
            RegressorArtifact::Forest(m) => {
                if m.trees.is_empty() {
                    return Err("forest has no trees".to_string());
                }
                for (i, tree) in m.trees.iter().enumerate() {
                    tree.validate(m.n_features, 1)
                        .map_err(|e| format!("tree {}: {}", i, e))?;
                }
                Ok(())
            }
        }
    }
}

impl YieldRegressor for RegressorArtifact {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        check_width(features, self.n_features())?;
        let estimate = match self {
            RegressorArtifact::Linear(m) => dot(&m.coef, features) + m.intercept,
            RegressorArtifact::Forest(m) => {
                let total: f64 = m.trees.iter().map(|t| t.leaf(features)[0]).sum();
                total / m.trees.len() as f64
            }
        };
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_types::Error;

    #[test]
    fn test_linear_prediction() {
        let model: RegressorArtifact = serde_json::from_str(
            r#"{"kind": "linear", "coef": [0.5, -1.0, 2.0], "intercept": 1.5}"#,
        )
        .unwrap();
        model.validate().unwrap();
        assert_eq!(model.kind(), "linear");
        let y = model.predict(&[2.0, 1.0, 0.25]).unwrap();
        assert!((y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_forest_prediction_is_mean_of_leaves() {
        let model: RegressorArtifact = serde_json::from_str(
            r#"{"kind": "forest", "n_features": 2, "trees": [
                {"nodes": [
                    {"split": {"feature": 0, "threshold": 0.5, "left": 1, "right": 2}},
                    {"leaf": {"value": [1.0]}},
                    {"leaf": {"value": [3.0]}}
                ]},
                {"nodes": [{"leaf": {"value": [5.0]}}]}
            ]}"#,
        )
        .unwrap();
        model.validate().unwrap();
        assert!((model.predict(&[1.0, 0.0]).unwrap() - 4.0).abs() < 1e-12);
        assert!((model.predict(&[0.0, 0.0]).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_width_is_model_error() {
        let model: RegressorArtifact =
            serde_json::from_str(r#"{"kind": "linear", "coef": [1.0], "intercept": 0.0}"#).unwrap();
        assert!(matches!(model.predict(&[1.0, 2.0]), Err(Error::Model(_))));
    }
}
