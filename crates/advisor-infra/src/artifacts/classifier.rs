//! Crop classifier artifacts

use serde::{Deserialize, Serialize};

use super::tree::DecisionTree;
use advisor_domain::predictor::CropClassifier;
use advisor_types::{Error, Result};

/// Multinomial logistic regression.
///
/// Two classes with a single coefficient row is the binary form: the row
/// scores the second class against the first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub classes: Vec<String>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LogisticClassifier {
    fn is_binary(&self) -> bool {
        self.classes.len() == 2 && self.coef.len() == 1
    }

    fn n_features(&self) -> usize {
        self.coef.first().map(Vec::len).unwrap_or(0)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let rows = if self.is_binary() { 1 } else { self.classes.len() };
        if self.coef.len() != rows || self.intercept.len() != rows {
            return Err(format!(
                "{} classes need {} coefficient rows and intercepts, found {} and {}",
                self.classes.len(),
                rows,
                self.coef.len(),
                self.intercept.len()
            ));
        }
        let width = self.n_features();
        if self.coef.iter().any(|row| row.len() != width) {
            return Err("coefficient rows differ in length".to_string());
        }
        if self
            .coef
            .iter()
            .flatten()
            .chain(self.intercept.iter())
            .any(|v| !v.is_finite())
        {
            return Err("non-finite coefficient".to_string());
        }
        Ok(())
    }

    fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let logits: Vec<f64> = self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| dot(row, features) + b)
            .collect();

        if self.is_binary() {
            let p = 1.0 / (1.0 + (-logits[0]).exp());
            return vec![1.0 - p, p];
        }
        softmax(&logits)
    }
}

/// Random forest classifier: mean of the per-tree leaf distributions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestClassifier {
    pub classes: Vec<String>,
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl ForestClassifier {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.classes.len())
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        let mut totals = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = tree.leaf(features);
            let weight: f64 = leaf.iter().sum();
            if weight <= 0.0 {
                return Err(Error::Model("forest leaf has no class weight".to_string()));
            }
            for (total, value) in totals.iter_mut().zip(leaf) {
                *total += value / weight;
            }
        }
        let n_trees = self.trees.len() as f64;
        Ok(totals.into_iter().map(|t| t / n_trees).collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Logistic(LogisticClassifier),
    Forest(ForestClassifier),
}

impl ClassifierArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifierArtifact::Logistic(_) => "logistic",
            ClassifierArtifact::Forest(_) => "forest",
        }
    }

    /// Feature vector length the model was trained on
    pub fn n_features(&self) -> usize {
        match self {
            ClassifierArtifact::Logistic(m) => m.n_features(),
            ClassifierArtifact::Forest(m) => m.n_features,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.classes().is_empty() {
            return Err("classifier has no classes".to_string());
        }
        match self {
            ClassifierArtifact::Logistic(m) => m.validate(),
            ClassifierArtifact::Forest(m) => m.validate(),
        }
    }
}

impl CropClassifier for ClassifierArtifact {
    fn classes(&self) -> &[String] {
        match self {
            ClassifierArtifact::Logistic(m) => &m.classes,
            ClassifierArtifact::Forest(m) => &m.classes,
        }
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        check_width(features, self.n_features())?;
        match self {
            ClassifierArtifact::Logistic(m) => Ok(m.predict_proba(features)),
            ClassifierArtifact::Forest(m) => m.predict_proba(features),
        }
    }
}

pub(crate) fn check_width(features: &[f64], expected: usize) -> Result<()> {
    if features.len() != expected {
        return Err(Error::Model(format!(
            "expected {} features, got {}",
            expected,
            features.len()
        )));
    }
    Ok(())
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
